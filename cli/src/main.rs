use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use im8086_core::monitor::{parse_number, Flow, Monitor};
use im8086_core::snapshot::{load_snapshot, save_snapshot};
use im8086_core::{Machine, MachineConfig, MAX_MEMORY_SIZE};

#[derive(Parser, Debug)]
#[command(name = "im8086-cli")]
#[command(about = "Run an 8086 monitor script", long_about = None)]
struct Args {
    /// Script with one monitor command per line
    script: PathBuf,

    /// Memory size in bytes (decimal, 0x… or …h)
    #[arg(long, value_parser = memory_size, default_value_t = MAX_MEMORY_SIZE)]
    memory_size: usize,

    /// Start from a saved snapshot instead of a reset machine
    #[arg(long)]
    restore: Option<PathBuf>,

    /// Write a snapshot once the script finishes
    #[arg(long)]
    save: Option<PathBuf>,
}

fn memory_size(text: &str) -> Result<usize, String> {
    parse_number(text)
        .map(|size| size as usize)
        .map_err(|e| e.to_string())
}

/// Runs `script` line by line, stopping at the first failing line.
fn run_script<W: Write>(monitor: &mut Monitor, name: &str, script: &str, out: &mut W) -> Result<()> {
    for (idx, line) in script.lines().enumerate() {
        let flow = monitor
            .run_line(line, out)
            .with_context(|| format!("{}:{}: {}", name, idx + 1, line.trim()))?;
        if flow == Flow::Exit {
            log::info!("exit at line {}", idx + 1);
            break;
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

    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read {}", args.script.display()))?;

    let machine = match &args.restore {
        Some(path) => load_snapshot(path)
            .with_context(|| format!("failed to restore {}", path.display()))?,
        None => Machine::with_config(&MachineConfig {
            memory_size: args.memory_size,
        })
        .context("failed to create machine")?,
    };
    let mut monitor = Monitor::new(machine);

    let mut stdout = io::stdout().lock();
    run_script(&mut monitor, &args.script.display().to_string(), &script, &mut stdout)?;
    stdout.flush()?;

    if let Some(path) = &args.save {
        save_snapshot(path, &monitor.machine)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }

    Ok(())
}
