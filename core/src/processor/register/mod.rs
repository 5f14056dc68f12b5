mod flags;

pub use self::flags::*;

use std::fmt;
use std::str::FromStr;

/// Initial SP: the top word of a 64 KiB stack segment.
pub const STACK_TOP: u16 = 0xFFFE;

/// Errors surfaced while parsing register or flag names.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    #[error("unknown register '{0}'")]
    UnknownRegister(String),
    #[error("unknown flag '{0}'")]
    UnknownFlag(String),
}

/// Word-sized general registers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Reg16 {
    AX,
    BX,
    CX,
    DX,
    SI,
    DI,
    BP,
    SP,
}

/// Byte halves of AX/BX/CX/DX.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Reg8 {
    AL,
    AH,
    BL,
    BH,
    CL,
    CH,
    DL,
    DH,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SegReg {
    CS,
    DS,
    ES,
    SS,
}

/// Any register the register file can be addressed by.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RegisterName {
    Word(Reg16),
    Byte(Reg8),
    Segment(SegReg),
    IP,
    FLAGS,
}

impl Reg16 {
    pub const ALL: [Reg16; 8] = [
        Reg16::AX,
        Reg16::BX,
        Reg16::CX,
        Reg16::DX,
        Reg16::SI,
        Reg16::DI,
        Reg16::BP,
        Reg16::SP,
    ];
}

impl Reg8 {
    pub const ALL: [Reg8; 8] = [
        Reg8::AL,
        Reg8::AH,
        Reg8::BL,
        Reg8::BH,
        Reg8::CL,
        Reg8::CH,
        Reg8::DL,
        Reg8::DH,
    ];

    /// The word register this half belongs to.
    pub fn parent(self) -> Reg16 {
        match self {
            Reg8::AL | Reg8::AH => Reg16::AX,
            Reg8::BL | Reg8::BH => Reg16::BX,
            Reg8::CL | Reg8::CH => Reg16::CX,
            Reg8::DL | Reg8::DH => Reg16::DX,
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Reg8::AH | Reg8::BH | Reg8::CH | Reg8::DH)
    }
}

impl SegReg {
    pub const ALL: [SegReg; 4] = [SegReg::CS, SegReg::DS, SegReg::ES, SegReg::SS];
}

impl FromStr for Reg16 {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AX" => Ok(Reg16::AX),
            "BX" => Ok(Reg16::BX),
            "CX" => Ok(Reg16::CX),
            "DX" => Ok(Reg16::DX),
            "SI" => Ok(Reg16::SI),
            "DI" => Ok(Reg16::DI),
            "BP" => Ok(Reg16::BP),
            "SP" => Ok(Reg16::SP),
            _ => Err(RegisterError::UnknownRegister(s.to_string())),
        }
    }
}

impl FromStr for Reg8 {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AL" => Ok(Reg8::AL),
            "AH" => Ok(Reg8::AH),
            "BL" => Ok(Reg8::BL),
            "BH" => Ok(Reg8::BH),
            "CL" => Ok(Reg8::CL),
            "CH" => Ok(Reg8::CH),
            "DL" => Ok(Reg8::DL),
            "DH" => Ok(Reg8::DH),
            _ => Err(RegisterError::UnknownRegister(s.to_string())),
        }
    }
}

impl FromStr for SegReg {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CS" => Ok(SegReg::CS),
            "DS" => Ok(SegReg::DS),
            "ES" => Ok(SegReg::ES),
            "SS" => Ok(SegReg::SS),
            _ => Err(RegisterError::UnknownRegister(s.to_string())),
        }
    }
}

impl FromStr for RegisterName {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(reg) = s.parse::<Reg16>() {
            return Ok(RegisterName::Word(reg));
        }
        if let Ok(reg) = s.parse::<Reg8>() {
            return Ok(RegisterName::Byte(reg));
        }
        if let Ok(reg) = s.parse::<SegReg>() {
            return Ok(RegisterName::Segment(reg));
        }

        match s.to_ascii_uppercase().as_str() {
            "IP" => Ok(RegisterName::IP),
            "FLAGS" => Ok(RegisterName::FLAGS),
            _ => Err(RegisterError::UnknownRegister(s.to_string())),
        }
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for SegReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for RegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterName::Word(reg) => write!(f, "{}", reg),
            RegisterName::Byte(reg) => write!(f, "{}", reg),
            RegisterName::Segment(reg) => write!(f, "{}", reg),
            RegisterName::IP => write!(f, "IP"),
            RegisterName::FLAGS => write!(f, "FLAGS"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Registers {
    pub ax: u16,
    pub bx: u16,
    pub cx: u16,
    pub dx: u16,
    pub si: u16,
    pub di: u16,
    pub bp: u16,
    pub sp: u16,
    pub cs: u16,
    pub ds: u16,
    pub es: u16,
    pub ss: u16,
    pub ip: u16,
    pub flags: Flags,
}

impl Registers {
    /// Power-on state: everything zero except SP.
    pub fn new() -> Registers {
        Registers {
            ax: 0,
            bx: 0,
            cx: 0,
            dx: 0,
            si: 0,
            di: 0,
            bp: 0,
            sp: STACK_TOP,
            cs: 0,
            ds: 0,
            es: 0,
            ss: 0,
            ip: 0,
            flags: Flags::new(),
        }
    }

    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AX => self.ax,
            Reg16::BX => self.bx,
            Reg16::CX => self.cx,
            Reg16::DX => self.dx,
            Reg16::SI => self.si,
            Reg16::DI => self.di,
            Reg16::BP => self.bp,
            Reg16::SP => self.sp,
        }
    }

    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::AX => self.ax = value,
            Reg16::BX => self.bx = value,
            Reg16::CX => self.cx = value,
            Reg16::DX => self.dx = value,
            Reg16::SI => self.si = value,
            Reg16::DI => self.di = value,
            Reg16::BP => self.bp = value,
            Reg16::SP => self.sp = value,
        }
    }

    pub fn get8(&self, reg: Reg8) -> u8 {
        let word = self.get16(reg.parent());
        if reg.is_high() {
            (word >> 8) as u8
        } else {
            word as u8
        }
    }

    /// Writes one half; the other half of the parent word is preserved.
    pub fn set8(&mut self, reg: Reg8, value: u8) {
        let parent = reg.parent();
        let word = self.get16(parent);
        let word = if reg.is_high() {
            (word & 0x00FF) | ((value as u16) << 8)
        } else {
            (word & 0xFF00) | (value as u16)
        };

        self.set16(parent, word);
    }

    pub fn segment(&self, reg: SegReg) -> u16 {
        match reg {
            SegReg::CS => self.cs,
            SegReg::DS => self.ds,
            SegReg::ES => self.es,
            SegReg::SS => self.ss,
        }
    }

    pub fn set_segment(&mut self, reg: SegReg, value: u16) {
        match reg {
            SegReg::CS => self.cs = value,
            SegReg::DS => self.ds = value,
            SegReg::ES => self.es = value,
            SegReg::SS => self.ss = value,
        }
    }

    pub fn get(&self, name: RegisterName) -> u16 {
        match name {
            RegisterName::Word(reg) => self.get16(reg),
            RegisterName::Byte(reg) => self.get8(reg) as u16,
            RegisterName::Segment(reg) => self.segment(reg),
            RegisterName::IP => self.ip,
            RegisterName::FLAGS => self.flags.get(),
        }
    }

    /// Byte registers keep only the low byte of `value`.
    pub fn set(&mut self, name: RegisterName, value: u16) {
        match name {
            RegisterName::Word(reg) => self.set16(reg, value),
            RegisterName::Byte(reg) => self.set8(reg, value as u8),
            RegisterName::Segment(reg) => self.set_segment(reg, value),
            RegisterName::IP => self.ip = value,
            RegisterName::FLAGS => self.flags.set(value),
        }
    }

    pub fn get_by_name(&self, name: &str) -> Result<u16, RegisterError> {
        RegisterName::from_str(name).map(|reg| self.get(reg))
    }

    pub fn set_by_name(&mut self, name: &str, value: u16) -> Result<(), RegisterError> {
        let reg = RegisterName::from_str(name)?;
        self.set(reg, value);
        Ok(())
    }
}

impl Default for Registers {
    fn default() -> Self {
        Registers::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_registers_reset_to_zero() {
        let reg = Registers::new();
        assert_eq!(reg.ax, 0);
        assert_eq!(reg.bx, 0);
        assert_eq!(reg.cx, 0);
        assert_eq!(reg.dx, 0);
    }

    #[test]
    fn index_and_base_registers_reset_to_zero() {
        let reg = Registers::new();
        assert_eq!(reg.si, 0);
        assert_eq!(reg.di, 0);
        assert_eq!(reg.bp, 0);
    }

    #[test]
    fn stack_pointer_resets_below_segment_top() {
        let reg = Registers::new();
        assert_eq!(reg.sp, 0xFFFE);
        assert_eq!(reg.sp, 65534);
    }

    #[test]
    fn segments_ip_and_flags_reset_to_zero() {
        let reg = Registers::new();
        assert_eq!(reg.cs, 0);
        assert_eq!(reg.ds, 0);
        assert_eq!(reg.es, 0);
        assert_eq!(reg.ss, 0);
        assert_eq!(reg.ip, 0);
        assert_eq!(reg.flags.get(), 0x0000);
    }

    #[test]
    fn independent_instances_are_identical() {
        let mut first = Registers::new();
        let second = Registers::new();
        assert_eq!(first, second);
        assert_eq!(Registers::default(), second);

        first.ax = 0x1234;
        assert_eq!(Registers::new().ax, 0);
        assert_ne!(first, second);
    }

    #[test]
    fn byte_halves_alias_their_word() {
        let mut reg = Registers::new();
        reg.set16(Reg16::AX, 0x1234);
        assert_eq!(reg.get8(Reg8::AH), 0x12);
        assert_eq!(reg.get8(Reg8::AL), 0x34);

        reg.set8(Reg8::AL, 0xFF);
        assert_eq!(reg.ax, 0x12FF);
        reg.set8(Reg8::AH, 0x00);
        assert_eq!(reg.ax, 0x00FF);

        reg.set8(Reg8::DH, 0xAB);
        assert_eq!(reg.dx, 0xAB00);
        assert_eq!(reg.ax, 0x00FF);
    }

    #[test]
    fn names_parse_to_every_register_kind() {
        assert_eq!("ax".parse(), Ok(RegisterName::Word(Reg16::AX)));
        assert_eq!("Bl".parse(), Ok(RegisterName::Byte(Reg8::BL)));
        assert_eq!("ss".parse(), Ok(RegisterName::Segment(SegReg::SS)));
        assert_eq!("ip".parse(), Ok(RegisterName::IP));
        assert_eq!("Flags".parse(), Ok(RegisterName::FLAGS));
        assert_eq!(
            "EAX".parse::<RegisterName>(),
            Err(RegisterError::UnknownRegister("EAX".to_string()))
        );
    }

    #[test]
    fn by_name_access_routes_to_fields() {
        let mut reg = Registers::new();
        reg.set_by_name("ds", 0x2000).unwrap();
        reg.set_by_name("ch", 0x1FF).unwrap();
        reg.set_by_name("ip", 0x0100).unwrap();
        reg.set_by_name("flags", 0x0001).unwrap();

        assert_eq!(reg.ds, 0x2000);
        assert_eq!(reg.cx, 0xFF00);
        assert_eq!(reg.ip, 0x0100);
        assert!(reg.flags.carry());
        assert_eq!(reg.get_by_name("CH").unwrap(), 0xFF);
        assert_eq!(reg.get_by_name("sp").unwrap(), STACK_TOP);
        assert!(reg.set_by_name("R0", 1).is_err());
    }
}
