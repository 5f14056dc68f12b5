use std::path::PathBuf;
use std::str::FromStr;

use super::number::{parse_bounded, parse_byte, parse_word};
use super::CommandError;
use crate::processor::ram::MAX_MEMORY_SIZE;
use crate::processor::register::{Flag, RegisterName};

/// Bytes shown by `mem` without an explicit count.
pub const DEFAULT_DUMP_COUNT: usize = 0x80;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Registers,
    Stack,
    Memory { addr: usize, count: usize },
    Set { reg: RegisterName, value: u16 },
    Flag { flag: Flag, value: bool },
    Poke { addr: usize, bytes: Vec<u8> },
    Load { path: PathBuf, addr: usize },
    Save { path: PathBuf },
    Restore { path: PathBuf },
    Reset,
    Exit,
}

struct Args<'a> {
    keyword: &'a str,
    rest: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn required(&mut self, what: &'static str) -> Result<&'a str, CommandError> {
        self.rest.next().ok_or(CommandError::MissingArgument {
            command: self.keyword.to_string(),
            what,
        })
    }

    fn optional(&mut self) -> Option<&'a str> {
        self.rest.next()
    }

    fn finish(mut self) -> Result<(), CommandError> {
        match self.rest.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(()),
        }
    }
}

fn parse_address(text: &str) -> Result<usize, CommandError> {
    parse_bounded(text, (MAX_MEMORY_SIZE - 1) as u32).map(|v| v as usize)
}

fn parse_count(text: &str) -> Result<usize, CommandError> {
    parse_bounded(text, MAX_MEMORY_SIZE as u32).map(|v| v as usize)
}

/// Drops a trailing `; comment` and whole-line `#`/`;` comments.
fn strip_comment(line: &str) -> &str {
    let line = match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let line = line.trim();

    if line.starts_with('#') {
        ""
    } else {
        line
    }
}

impl Command {
    /// `Ok(None)` for lines with nothing to run.
    pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
        match line.parse() {
            Ok(command) => Ok(Some(command)),
            Err(CommandError::Empty) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = strip_comment(line).split_whitespace();
        let keyword = words.next().ok_or(CommandError::Empty)?;
        let mut args = Args {
            keyword,
            rest: words,
        };

        let command = match keyword.to_ascii_lowercase().as_str() {
            "?" | "help" => Command::Help,
            "reg" => Command::Registers,
            "stack" => Command::Stack,
            "mem" => {
                let addr = parse_address(args.required("address")?)?;
                let count = match args.optional() {
                    Some(text) => parse_count(text)?,
                    None => DEFAULT_DUMP_COUNT,
                };
                Command::Memory { addr, count }
            }
            "set" => {
                let reg: RegisterName = args.required("register")?.parse()?;
                let text = args.required("value")?;
                let value = match reg {
                    RegisterName::Byte(_) => parse_byte(text)? as u16,
                    _ => parse_word(text)?,
                };
                Command::Set { reg, value }
            }
            "flag" => {
                let flag: Flag = args.required("flag")?.parse()?;
                let value = parse_bounded(args.required("value")?, 1)? == 1;
                Command::Flag { flag, value }
            }
            "poke" => {
                let addr = parse_address(args.required("address")?)?;
                let mut bytes = vec![parse_byte(args.required("byte")?)?];
                while let Some(text) = args.optional() {
                    bytes.push(parse_byte(text)?);
                }
                Command::Poke { addr, bytes }
            }
            "load" => {
                let path = PathBuf::from(args.required("file")?);
                let addr = match args.optional() {
                    Some(text) => parse_address(text)?,
                    None => 0,
                };
                Command::Load { path, addr }
            }
            "save" => Command::Save {
                path: PathBuf::from(args.required("file")?),
            },
            "restore" => Command::Restore {
                path: PathBuf::from(args.required("file")?),
            },
            "reset" => Command::Reset,
            "exit" | "quit" | "3xit" | ":3xit" => Command::Exit,
            _ => return Err(CommandError::UnknownCommand(keyword.to_string())),
        };

        args.finish()?;
        Ok(command)
    }
}
