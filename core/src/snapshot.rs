use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::processor::ram::Memory;
use crate::processor::register::{Flags, Registers};
use crate::processor::Machine;

pub const SNAPSHOT_MAGIC: &str = "im8086.snapshot";
pub const SNAPSHOT_VERSION: u32 = 1;
pub const PAGE_SIZE: usize = 256;

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct RegisterState {
    ax: u16,
    bx: u16,
    cx: u16,
    dx: u16,
    si: u16,
    di: u16,
    bp: u16,
    sp: u16,
    cs: u16,
    ds: u16,
    es: u16,
    ss: u16,
    ip: u16,
    flags: u16,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct Page {
    base: u32,
    bytes: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    magic: String,
    version: u32,
    registers: RegisterState,
    memory_size: usize,
    pages: Vec<Page>,
}

impl From<&Registers> for RegisterState {
    fn from(reg: &Registers) -> Self {
        RegisterState {
            ax: reg.ax,
            bx: reg.bx,
            cx: reg.cx,
            dx: reg.dx,
            si: reg.si,
            di: reg.di,
            bp: reg.bp,
            sp: reg.sp,
            cs: reg.cs,
            ds: reg.ds,
            es: reg.es,
            ss: reg.ss,
            ip: reg.ip,
            flags: reg.flags.get(),
        }
    }
}

impl From<&RegisterState> for Registers {
    fn from(state: &RegisterState) -> Self {
        Registers {
            ax: state.ax,
            bx: state.bx,
            cx: state.cx,
            dx: state.dx,
            si: state.si,
            di: state.di,
            bp: state.bp,
            sp: state.sp,
            cs: state.cs,
            ds: state.ds,
            es: state.es,
            ss: state.ss,
            ip: state.ip,
            flags: Flags::new_with_init(state.flags),
        }
    }
}

fn capture(machine: &Machine) -> Snapshot {
    // all-zero pages are implied
    let pages = machine
        .ram
        .as_slice()
        .chunks(PAGE_SIZE)
        .enumerate()
        .filter(|(_, page)| page.iter().any(|&b| b != 0))
        .map(|(idx, page)| Page {
            base: (idx * PAGE_SIZE) as u32,
            bytes: page.to_vec(),
        })
        .collect();

    Snapshot {
        magic: SNAPSHOT_MAGIC.to_string(),
        version: SNAPSHOT_VERSION,
        registers: RegisterState::from(&machine.reg),
        memory_size: machine.ram.size(),
        pages,
    }
}

fn rebuild(snapshot: &Snapshot) -> Result<Machine> {
    if snapshot.magic != SNAPSHOT_MAGIC {
        return Err(SnapshotError::Invalid(format!(
            "unexpected magic '{}'",
            snapshot.magic
        )));
    }
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::Invalid(format!(
            "unsupported version {} (expected {SNAPSHOT_VERSION})",
            snapshot.version
        )));
    }

    let mut ram = Memory::with_size(snapshot.memory_size)
        .map_err(|e| SnapshotError::Invalid(e.to_string()))?;
    for page in &snapshot.pages {
        // the last page of an odd-sized memory is short
        let expected = snapshot
            .memory_size
            .checked_sub(page.base as usize)
            .filter(|&left| left > 0)
            .map(|left| left.min(PAGE_SIZE))
            .ok_or_else(|| {
                SnapshotError::Invalid(format!(
                    "page at {:#07x} lies beyond {:#x} bytes of memory",
                    page.base, snapshot.memory_size
                ))
            })?;
        if page.bytes.len() != expected {
            return Err(SnapshotError::Invalid(format!(
                "page at {:#07x} holds {} bytes (expected {expected})",
                page.base,
                page.bytes.len()
            )));
        }
        ram.load(&page.bytes, page.base as usize)
            .map_err(|e| SnapshotError::Invalid(e.to_string()))?;
    }

    Ok(Machine {
        reg: Registers::from(&snapshot.registers),
        ram,
    })
}

pub fn save_snapshot(path: &Path, machine: &Machine) -> Result<()> {
    let snapshot = capture(machine);
    let json = serde_json::to_vec_pretty(&snapshot)?;
    fs::write(path, json)?;
    log::info!(
        "snapshot saved to {} ({} pages)",
        path.display(),
        snapshot.pages.len()
    );

    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<Machine> {
    let json = fs::read(path)?;
    let snapshot: Snapshot = serde_json::from_slice(&json)?;
    let machine = rebuild(&snapshot)?;
    log::info!(
        "snapshot loaded from {} ({} pages)",
        path.display(),
        snapshot.pages.len()
    );

    Ok(machine)
}
