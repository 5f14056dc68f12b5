use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use im8086_core::monitor::{parse_number, Flow, Monitor};
use im8086_core::snapshot::load_snapshot;
use im8086_core::{Machine, MachineConfig, MAX_MEMORY_SIZE};

#[derive(Parser, Debug)]
#[command(name = "im8086")]
#[command(about = "Interactive 8086 register and memory monitor", long_about = None)]
struct Args {
    /// Memory size in bytes (decimal, 0x… or …h)
    #[arg(long, value_parser = memory_size, default_value_t = MAX_MEMORY_SIZE)]
    memory_size: usize,

    /// Start from a saved snapshot instead of a reset machine
    #[arg(long)]
    restore: Option<PathBuf>,
}

fn memory_size(text: &str) -> Result<usize, String> {
    parse_number(text)
        .map(|size| size as usize)
        .map_err(|e| e.to_string())
}

/// Prompts for commands until EOF or an exit command; errors are reported and skipped.
fn interact<R: BufRead, W: Write>(monitor: &mut Monitor, mut input: R, out: &mut W) -> io::Result<()> {
    writeln!(out, "8086 monitor. Type ? for help.")?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match monitor.run_line(&line, out) {
            Ok(Flow::Exit) => break,
            Ok(Flow::Continue) => (),
            Err(e) => writeln!(out, "Error: {}", e)?,
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
    log::info!("env logger initialized");

    let machine = match &args.restore {
        Some(path) => load_snapshot(path)
            .with_context(|| format!("failed to restore {}", path.display()))?,
        None => Machine::with_config(&MachineConfig {
            memory_size: args.memory_size,
        })
        .context("failed to create machine")?,
    };
    let mut monitor = Monitor::new(machine);

    interact(&mut monitor, io::stdin().lock(), &mut io::stdout())?;

    Ok(())
}
