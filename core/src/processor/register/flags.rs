use std::fmt;
use std::str::FromStr;

use super::RegisterError;

pub const CF: u16 = 0x0001;
pub const PF: u16 = 0x0004;
pub const AF: u16 = 0x0010;
pub const ZF: u16 = 0x0040;
pub const SF: u16 = 0x0080;
pub const TF: u16 = 0x0100;
pub const IF: u16 = 0x0200;
pub const DF: u16 = 0x0400;
pub const OF: u16 = 0x0800;

/// Bits of FLAGS that carry a defined meaning on the 8086.
pub const DEFINED_MASK: u16 = CF | PF | AF | ZF | SF | TF | IF | DF | OF;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    o: bool,
    d: bool,
    i: bool,
    t: bool,
    s: bool,
    z: bool,
    a: bool,
    p: bool,
    c: bool,
}

impl Flags {
    pub fn new() -> Flags {
        Flags {
            o: false,
            d: false,
            i: false,
            t: false,
            s: false,
            z: false,
            a: false,
            p: false,
            c: false,
        }
    }

    pub fn new_with_init(word: u16) -> Flags {
        let mut flags = Flags::new();
        flags.set(word);

        flags
    }

    pub fn assert_overflow(&mut self) { self.o = true; }
    pub fn negate_overflow(&mut self) { self.o = false; }
    pub fn set_overflow(&mut self, flag: bool) { self.o = flag; }
    pub fn overflow(&self) -> bool { self.o }

    pub fn assert_direction(&mut self) { self.d = true; }
    pub fn negate_direction(&mut self) { self.d = false; }
    pub fn set_direction(&mut self, flag: bool) { self.d = flag; }
    pub fn direction(&self) -> bool { self.d }

    pub fn assert_interrupt(&mut self) { self.i = true; }
    pub fn negate_interrupt(&mut self) { self.i = false; }
    pub fn set_interrupt(&mut self, flag: bool) { self.i = flag; }
    pub fn interrupt(&self) -> bool { self.i }

    pub fn assert_trap(&mut self) { self.t = true; }
    pub fn negate_trap(&mut self) { self.t = false; }
    pub fn set_trap(&mut self, flag: bool) { self.t = flag; }
    pub fn trap(&self) -> bool { self.t }

    pub fn assert_sign(&mut self) { self.s = true; }
    pub fn negate_sign(&mut self) { self.s = false; }
    pub fn set_sign(&mut self, flag: bool) { self.s = flag; }
    pub fn sign(&self) -> bool { self.s }

    pub fn assert_zero(&mut self) { self.z = true; }
    pub fn negate_zero(&mut self) { self.z = false; }
    pub fn set_zero(&mut self, flag: bool) { self.z = flag; }
    pub fn zero(&self) -> bool { self.z }

    pub fn assert_auxiliary(&mut self) { self.a = true; }
    pub fn negate_auxiliary(&mut self) { self.a = false; }
    pub fn set_auxiliary(&mut self, flag: bool) { self.a = flag; }
    pub fn auxiliary(&self) -> bool { self.a }

    pub fn assert_parity(&mut self) { self.p = true; }
    pub fn negate_parity(&mut self) { self.p = false; }
    pub fn set_parity(&mut self, flag: bool) { self.p = flag; }
    pub fn parity(&self) -> bool { self.p }

    pub fn assert_carry(&mut self) { self.c = true; }
    pub fn negate_carry(&mut self) { self.c = false; }
    pub fn set_carry(&mut self, flag: bool) { self.c = flag; }
    pub fn carry(&self) -> bool { self.c }

    /// Read a single flag by identifier.
    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Overflow => self.o,
            Flag::Direction => self.d,
            Flag::Interrupt => self.i,
            Flag::Trap => self.t,
            Flag::Sign => self.s,
            Flag::Zero => self.z,
            Flag::Auxiliary => self.a,
            Flag::Parity => self.p,
            Flag::Carry => self.c,
        }
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::Overflow => self.o = value,
            Flag::Direction => self.d = value,
            Flag::Interrupt => self.i = value,
            Flag::Trap => self.t = value,
            Flag::Sign => self.s = value,
            Flag::Zero => self.z = value,
            Flag::Auxiliary => self.a = value,
            Flag::Parity => self.p = value,
            Flag::Carry => self.c = value,
        }
    }

    /// Pack into the FLAGS word. Reserved bits read as zero.
    pub fn get(&self) -> u16 {
        macro_rules! convert {
            ($flag: ident, $mask: expr) => {
                if self.$flag { $mask } else { 0 }
            };
        }

        convert!(o, OF)
            | convert!(d, DF)
            | convert!(i, IF)
            | convert!(t, TF)
            | convert!(s, SF)
            | convert!(z, ZF)
            | convert!(a, AF)
            | convert!(p, PF)
            | convert!(c, CF)
    }

    /// Unpack a FLAGS word. Reserved bits are dropped.
    pub fn set(&mut self, word: u16) {
        fn convert(word: u16, mask: u16) -> bool {
            (word & mask) != 0
        }

        self.o = convert(word, OF);
        self.d = convert(word, DF);
        self.i = convert(word, IF);
        self.t = convert(word, TF);
        self.s = convert(word, SF);
        self.z = convert(word, ZF);
        self.a = convert(word, AF);
        self.p = convert(word, PF);
        self.c = convert(word, CF);
    }
}

impl fmt::Display for Flags {
    // ODITSZAPC, one column per flag
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in Flag::ALL {
            let c = if self.flag(flag) { flag.letter() } else { '-' };
            write!(f, "{}", c)?;
        }

        Ok(())
    }
}

/// Flag identifiers, in the order they are printed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Flag {
    Overflow,
    Direction,
    Interrupt,
    Trap,
    Sign,
    Zero,
    Auxiliary,
    Parity,
    Carry,
}

impl Flag {
    pub const ALL: [Flag; 9] = [
        Flag::Overflow,
        Flag::Direction,
        Flag::Interrupt,
        Flag::Trap,
        Flag::Sign,
        Flag::Zero,
        Flag::Auxiliary,
        Flag::Parity,
        Flag::Carry,
    ];

    pub fn mask(self) -> u16 {
        match self {
            Flag::Overflow => OF,
            Flag::Direction => DF,
            Flag::Interrupt => IF,
            Flag::Trap => TF,
            Flag::Sign => SF,
            Flag::Zero => ZF,
            Flag::Auxiliary => AF,
            Flag::Parity => PF,
            Flag::Carry => CF,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Flag::Overflow => 'O',
            Flag::Direction => 'D',
            Flag::Interrupt => 'I',
            Flag::Trap => 'T',
            Flag::Sign => 'S',
            Flag::Zero => 'Z',
            Flag::Auxiliary => 'A',
            Flag::Parity => 'P',
            Flag::Carry => 'C',
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}F", self.letter())
    }
}

impl FromStr for Flag {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OF" => Ok(Flag::Overflow),
            "DF" => Ok(Flag::Direction),
            "IF" => Ok(Flag::Interrupt),
            "TF" => Ok(Flag::Trap),
            "SF" => Ok(Flag::Sign),
            "ZF" => Ok(Flag::Zero),
            "AF" => Ok(Flag::Auxiliary),
            "PF" => Ok(Flag::Parity),
            "CF" => Ok(Flag::Carry),
            _ => Err(RegisterError::UnknownFlag(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_flags_are_clear() {
        let flags = Flags::new();
        assert_eq!(flags.get(), 0x0000);
        assert_eq!(flags.to_string(), "---------");
    }

    #[test]
    fn each_flag_packs_at_its_bit() {
        for flag in Flag::ALL {
            let mut flags = Flags::new();
            flags.set_flag(flag, true);
            assert_eq!(flags.get(), flag.mask(), "{}", flag);
            assert!(flags.flag(flag));
        }
    }

    #[test]
    fn set_drops_reserved_bits() {
        let flags = Flags::new_with_init(0xFFFF);
        assert_eq!(flags.get(), DEFINED_MASK);
        assert_eq!(flags.get(), 0x0FD5);
        assert_eq!(flags.to_string(), "ODITSZAPC");
    }

    #[test]
    fn accessors_track_fields() {
        let mut flags = Flags::new();
        flags.assert_carry();
        flags.assert_zero();
        flags.set_direction(true);
        assert!(flags.carry() && flags.zero() && flags.direction());
        assert_eq!(flags.get(), CF | ZF | DF);
        assert_eq!(flags.to_string(), "-D---Z--C");

        flags.negate_carry();
        assert!(!flags.carry());
        assert_eq!(flags.get(), ZF | DF);
    }

    #[test]
    fn flag_names_parse_case_insensitively() {
        assert_eq!("cf".parse::<Flag>(), Ok(Flag::Carry));
        assert_eq!("Of".parse::<Flag>(), Ok(Flag::Overflow));
        assert_eq!(
            "XF".parse::<Flag>(),
            Err(RegisterError::UnknownFlag("XF".to_string()))
        );
    }
}
