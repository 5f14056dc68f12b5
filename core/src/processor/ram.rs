use std::fs;
use std::io;
use std::path::Path;

/// Full 8086 physical address space.
pub const MAX_MEMORY_SIZE: usize = 0x100000;

#[derive(thiserror::Error, Debug)]
pub enum MemoryError {
    #[error("address {addr:#07x} out of range (memory size {size:#x})")]
    OutOfRange { addr: usize, size: usize },
    #[error("image of {len} bytes at {at:#07x} does not fit in {size:#x} bytes of memory")]
    ImageTooLarge { at: usize, len: usize, size: usize },
    #[error("invalid memory size {0:#x}")]
    InvalidSize(usize),
    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    ram: Vec<u8>,
}

impl Memory {
    pub fn new() -> Memory {
        Memory {
            ram: vec![0; MAX_MEMORY_SIZE],
        }
    }

    pub fn with_size(size: usize) -> Result<Memory, MemoryError> {
        if size == 0 || size > MAX_MEMORY_SIZE {
            return Err(MemoryError::InvalidSize(size));
        }

        Ok(Memory { ram: vec![0; size] })
    }

    pub fn size(&self) -> usize {
        self.ram.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.ram
    }

    fn check(&self, addr: usize, len: usize) -> Result<(), MemoryError> {
        match addr.checked_add(len) {
            Some(end) if end <= self.ram.len() => Ok(()),
            _ => Err(MemoryError::OutOfRange {
                addr,
                size: self.ram.len(),
            }),
        }
    }

    pub fn read_byte(&self, addr: usize) -> Result<u8, MemoryError> {
        self.check(addr, 1)?;
        log::trace!("ram[r] addr: {:06x}", addr);

        Ok(self.ram[addr])
    }

    pub fn write_byte(&mut self, addr: usize, data: u8) -> Result<(), MemoryError> {
        self.check(addr, 1)?;
        log::debug!("ram[w] addr: {:06x}, data: {:02x}", addr, data);
        self.ram[addr] = data;

        Ok(())
    }

    /// Little-endian: low byte at `addr`.
    pub fn read_word(&self, addr: usize) -> Result<u16, MemoryError> {
        self.check(addr, 2)?;
        log::trace!("ram[r] addr: {:06x} (word)", addr);

        Ok(u16::from_le_bytes([self.ram[addr], self.ram[addr + 1]]))
    }

    pub fn write_word(&mut self, addr: usize, data: u16) -> Result<(), MemoryError> {
        self.check(addr, 2)?;
        log::debug!("ram[w] addr: {:06x}, data: {:04x}", addr, data);
        self.ram[addr..addr + 2].copy_from_slice(&data.to_le_bytes());

        Ok(())
    }

    pub fn load(&mut self, image: &[u8], at: usize) -> Result<(), MemoryError> {
        let size = self.ram.len();
        let end = at
            .checked_add(image.len())
            .filter(|&end| end <= size)
            .ok_or(MemoryError::ImageTooLarge {
                at,
                len: image.len(),
                size,
            })?;

        self.ram[at..end].copy_from_slice(image);
        log::debug!("loaded {} bytes at {:06x}", image.len(), at);

        Ok(())
    }

    /// Loads `filename` skipping its first `start_pos` bytes, placing the rest at `set_pos`.
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        filename: P,
        start_pos: usize,
        set_pos: usize,
    ) -> Result<usize, MemoryError> {
        let binaries = fs::read(filename.as_ref())?;
        let image = binaries.get(start_pos..).unwrap_or_default();
        self.load(image, set_pos)?;
        log::info!(
            "{}: {} bytes loaded at {:06x}",
            filename.as_ref().display(),
            image.len(),
            set_pos
        );

        Ok(image.len())
    }

    pub fn clear(&mut self) {
        self.ram.iter_mut().for_each(|b| *b = 0);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}
