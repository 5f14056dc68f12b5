//! Text renderings of machine state.

use std::fmt;

use crate::processor::ram::MemoryError;
use crate::processor::register::{Reg16, Reg8, Registers};
use crate::processor::Machine;

pub struct RegisterDump<'a>(pub &'a Registers);

impl fmt::Display for RegisterDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg = self.0;
        let pairs = [
            (Reg16::AX, Reg8::AH, Reg8::AL),
            (Reg16::BX, Reg8::BH, Reg8::BL),
            (Reg16::CX, Reg8::CH, Reg8::CL),
            (Reg16::DX, Reg8::DH, Reg8::DL),
        ];

        for (word, high, low) in pairs {
            writeln!(
                f,
                "{}={:04X} ({}={:02X}, {}={:02X})",
                word,
                reg.get16(word),
                high,
                reg.get8(high),
                low,
                reg.get8(low)
            )?;
        }
        writeln!(
            f,
            "SI={:04X}  DI={:04X}  BP={:04X}  SP={:04X}",
            reg.si, reg.di, reg.bp, reg.sp
        )?;
        writeln!(
            f,
            "CS={:04X}  DS={:04X}  ES={:04X}  SS={:04X}",
            reg.cs, reg.ds, reg.es, reg.ss
        )?;
        writeln!(
            f,
            "IP={:04X}  FLAGS={:04X} [{}]",
            reg.ip,
            reg.flags.get(),
            reg.flags
        )
    }
}

/// `(offset from SP, value)` pairs as read by [`Machine::stack_words`].
pub struct StackDump(pub Vec<(u16, u16)>);

impl fmt::Display for StackDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "Stack is empty");
        }

        for (offset, value) in &self.0 {
            writeln!(f, "SP+{:04X}: {:04X}", offset, value)?;
        }

        Ok(())
    }
}

pub struct MemoryDump {
    pub addr: usize,
    pub rows: Vec<(usize, Vec<u8>)>,
}

impl fmt::Display for MemoryDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory dump from {:04X}:", self.addr)?;
        for (base, bytes) in &self.rows {
            write!(f, "{:04X}:", base)?;
            for byte in bytes {
                write!(f, " {:02X}", byte)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

pub fn registers(reg: &Registers) -> String {
    RegisterDump(reg).to_string()
}

pub fn stack(machine: &Machine) -> Result<String, MemoryError> {
    Ok(StackDump(machine.stack_words()?).to_string())
}

pub fn memory(machine: &Machine, addr: usize, count: usize) -> Result<String, MemoryError> {
    let rows = machine.memory_rows(addr, count)?;

    Ok(MemoryDump { addr, rows }.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_register_dump() {
        let expected = "\
AX=0000 (AH=00, AL=00)
BX=0000 (BH=00, BL=00)
CX=0000 (CH=00, CL=00)
DX=0000 (DH=00, DL=00)
SI=0000  DI=0000  BP=0000  SP=FFFE
CS=0000  DS=0000  ES=0000  SS=0000
IP=0000  FLAGS=0000 [---------]
";
        assert_eq!(registers(&Registers::new()), expected);
    }

    #[test]
    fn register_dump_shows_halves_and_flags() {
        let mut reg = Registers::new();
        reg.bx = 0xAB12;
        reg.flags.assert_zero();
        reg.flags.assert_carry();

        let dump = registers(&reg);
        assert!(dump.contains("BX=AB12 (BH=AB, BL=12)"));
        assert!(dump.contains("FLAGS=0041 [-----Z--C]"));
    }

    #[test]
    fn dumps_render_into_any_formatter() {
        let dump = StackDump(vec![(0, 0x1234), (2, 0xABCD)]);
        assert_eq!(format!("{}", dump), "SP+0000: 1234\nSP+0002: ABCD\n");

        let dump = MemoryDump {
            addr: 0x7C00,
            rows: vec![(0x7C00, vec![0xEA, 0x05])],
        };
        assert_eq!(dump.to_string(), "Memory dump from 7C00:\n7C00: EA 05\n");
        assert_eq!(RegisterDump(&Registers::new()).to_string(), registers(&Registers::new()));
    }

    #[test]
    fn stack_dump() {
        let mut machine = Machine::new();
        assert_eq!(stack(&machine).unwrap(), "Stack is empty\n");

        machine.reg.sp = 0xFFFC;
        machine.ram.write_word(0xFFFC, 0xCAFE).unwrap();
        assert_eq!(stack(&machine).unwrap(), "SP+0000: CAFE\n");
    }

    #[test]
    fn memory_dump_rows() {
        let mut machine = Machine::new();
        machine.ram.load(&[0xDE, 0xAD, 0xBE, 0xEF], 0x10).unwrap();

        let dump = memory(&machine, 0x10, 4).unwrap();
        assert_eq!(dump, "Memory dump from 0010:\n0010: DE AD BE EF\n");

        let wide = memory(&machine, 0x10000, 1).unwrap();
        assert_eq!(wide, "Memory dump from 10000:\n10000: 00\n");
    }
}
