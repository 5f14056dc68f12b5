//! Line-oriented command interpreter for inspecting and editing a [`Machine`].

mod command;
mod number;

pub use self::command::{Command, DEFAULT_DUMP_COUNT};
pub use self::number::parse_number;

use std::io::{self, Write};

use crate::dump;
use crate::processor::ram::MemoryError;
use crate::processor::register::RegisterError;
use crate::processor::Machine;
use crate::snapshot::{self, SnapshotError};

pub const HELP: &str = "\
Commands:
  ?, help               show this summary
  reg                   show registers
  stack                 show the words between SP and FFFEh
  mem ADDR [COUNT]      dump COUNT bytes (default 80h) from ADDR
  set REG VALUE         write a register (AX..DX, AH..DL, SI, DI, BP, SP, CS..SS, IP, FLAGS)
  flag NAME 0|1         clear or set a flag (CF PF AF ZF SF TF IF DF OF)
  poke ADDR BYTE...     write bytes starting at ADDR
  load FILE [ADDR]      load a binary image at ADDR (default 0)
  save FILE             write a snapshot
  restore FILE          replace the machine with a snapshot
  reset                 reset registers and clear memory
  exit, quit            leave the monitor
Numbers are decimal unless written as 1234h or 0x1234.
";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("{command}: missing {what}")]
    MissingArgument { command: String, what: &'static str },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("value '{text}' is larger than {max:#x}")]
    ValueTooLarge { text: String, max: u32 },
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
    #[error(transparent)]
    Register(#[from] RegisterError),
}

#[derive(thiserror::Error, Debug)]
pub enum MonitorError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("{0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Monitor {
    pub machine: Machine,
}

impl Monitor {
    pub fn new(machine: Machine) -> Monitor {
        Monitor { machine }
    }

    /// Parses and runs one line of input.
    pub fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        match Command::parse_line(line)? {
            Some(command) => self.execute(&command, out),
            None => Ok(Flow::Continue),
        }
    }

    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> Result<Flow> {
        log::debug!("execute: {:?}", command);
        let machine = &mut self.machine;

        match command {
            Command::Help => out.write_all(HELP.as_bytes())?,
            Command::Registers => out.write_all(dump::registers(&machine.reg).as_bytes())?,
            Command::Stack => out.write_all(dump::stack(machine)?.as_bytes())?,
            Command::Memory { addr, count } => {
                out.write_all(dump::memory(machine, *addr, *count)?.as_bytes())?
            }
            Command::Set { reg, value } => machine.reg.set(*reg, *value),
            Command::Flag { flag, value } => machine.reg.flags.set_flag(*flag, *value),
            Command::Poke { addr, bytes } => machine.ram.load(bytes, *addr)?,
            Command::Load { path, addr } => {
                let len = machine.ram.load_file(path, 0, *addr)?;
                writeln!(out, "Loaded {} bytes at {:04X}", len, addr)?;
            }
            Command::Save { path } => {
                snapshot::save_snapshot(path, machine)?;
                writeln!(out, "Snapshot saved to {}", path.display())?;
            }
            Command::Restore { path } => {
                *machine = snapshot::load_snapshot(path)?;
                writeln!(out, "Snapshot restored from {}", path.display())?;
            }
            Command::Reset => machine.reset(),
            Command::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }
}
