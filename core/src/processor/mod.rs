pub mod ram;
pub mod register;

use self::ram::{Memory, MemoryError, MAX_MEMORY_SIZE};
use self::register::{Registers, STACK_TOP};

/// Bytes per memory dump row.
pub const ROW_WIDTH: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    pub memory_size: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            memory_size: MAX_MEMORY_SIZE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Machine {
    pub reg: Registers,
    pub ram: Memory,
}

impl Machine {
    pub fn new() -> Machine {
        Machine {
            reg: Registers::new(),
            ram: Memory::new(),
        }
    }

    pub fn with_config(config: &MachineConfig) -> Result<Machine, MemoryError> {
        Ok(Machine {
            reg: Registers::new(),
            ram: Memory::with_size(config.memory_size)?,
        })
    }

    pub fn reset(&mut self) {
        self.reg = Registers::new();
        self.ram.clear();
        log::info!("machine reset ({:#x} bytes of memory)", self.ram.size());
    }

    /// Words from SP up to the stack top, as `(offset from SP, value)`.
    pub fn stack_words(&self) -> Result<Vec<(u16, u16)>, MemoryError> {
        let sp = self.reg.sp;
        if sp >= STACK_TOP {
            return Ok(Vec::new());
        }

        (sp..STACK_TOP)
            .step_by(2)
            .map(|addr| {
                let value = self.ram.read_word(addr as usize)?;
                Ok((addr - sp, value))
            })
            .collect()
    }

    /// `count` bytes from `addr`, split into rows of [`ROW_WIDTH`].
    pub fn memory_rows(&self, addr: usize, count: usize) -> Result<Vec<(usize, Vec<u8>)>, MemoryError> {
        let size = self.ram.size();
        let end = match addr.checked_add(count) {
            Some(end) if end <= size => end,
            _ => return Err(MemoryError::OutOfRange { addr, size }),
        };

        let bytes = &self.ram.as_slice()[addr..end];
        let rows = bytes
            .chunks(ROW_WIDTH)
            .enumerate()
            .map(|(idx, chunk)| (addr + idx * ROW_WIDTH, chunk.to_vec()))
            .collect();

        Ok(rows)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Machine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_power_on_state() {
        let mut machine = Machine::new();
        machine.reg.ax = 0xBEEF;
        machine.reg.sp = 0x1000;
        machine.reg.flags.assert_carry();
        machine.ram.write_word(0x500, 0x1234).unwrap();

        machine.reset();
        assert_eq!(machine.reg, Registers::new());
        assert_eq!(machine.ram.read_word(0x500).unwrap(), 0);
    }

    #[test]
    fn empty_stack_at_top() {
        let mut machine = Machine::new();
        assert!(machine.stack_words().unwrap().is_empty());

        machine.reg.sp = 0xFFFF;
        assert!(machine.stack_words().unwrap().is_empty());
    }

    #[test]
    fn stack_words_walk_up_to_top() {
        let mut machine = Machine::new();
        machine.reg.sp = 0xFFFA;
        machine.ram.write_word(0xFFFA, 0x1111).unwrap();
        machine.ram.write_word(0xFFFC, 0x2222).unwrap();

        let words = machine.stack_words().unwrap();
        assert_eq!(words, vec![(0, 0x1111), (2, 0x2222)]);
    }

    #[test]
    fn small_memory_cannot_hold_the_stack() {
        let mut machine = Machine::with_config(&MachineConfig { memory_size: 0x100 }).unwrap();
        machine.reg.sp = 0xFFFC;
        assert!(machine.stack_words().is_err());
    }

    #[test]
    fn memory_rows_split_by_sixteen() {
        let mut machine = Machine::new();
        machine.ram.load(&(0u8..20).collect::<Vec<_>>(), 0x200).unwrap();

        let rows = machine.memory_rows(0x200, 20).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 0x200);
        assert_eq!(rows[0].1.len(), 16);
        assert_eq!(rows[1], (0x210, vec![16, 17, 18, 19]));

        assert!(machine.memory_rows(0xFFFF0, 0x20).is_err());
        assert!(machine.memory_rows(0x10, 0).unwrap().is_empty());
    }
}
