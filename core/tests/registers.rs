use im8086_core::{Flag, Flags, Machine, Memory, Reg16, Reg8, RegisterName, Registers, DEFINED_MASK};
use proptest::prelude::*;

#[test]
fn power_on_state() {
    let reg = Registers::new();
    for word in Reg16::ALL {
        let expected = if word == Reg16::SP { 0xFFFE } else { 0 };
        assert_eq!(reg.get16(word), expected, "{word}");
    }
    assert_eq!(reg.get(RegisterName::IP), 0);
    assert_eq!(reg.get(RegisterName::FLAGS), 0);

    let machine = Machine::new();
    assert_eq!(machine.reg, reg);
    assert!(machine.ram.as_slice().iter().all(|&b| b == 0));
}

fn byte_register() -> impl Strategy<Value = Reg8> {
    prop::sample::select(Reg8::ALL.to_vec())
}

proptest! {
    #[test]
    fn byte_write_touches_one_half(initial in any::<u16>(), reg in byte_register(), value in any::<u8>()) {
        let mut regs = Registers::new();
        regs.set16(reg.parent(), initial);
        regs.set8(reg, value);

        let word = regs.get16(reg.parent());
        if reg.is_high() {
            prop_assert_eq!(word, (initial & 0x00FF) | ((value as u16) << 8));
        } else {
            prop_assert_eq!(word, (initial & 0xFF00) | value as u16);
        }
        prop_assert_eq!(regs.get8(reg), value);
    }

    #[test]
    fn word_write_is_seen_through_halves(value in any::<u16>()) {
        let mut regs = Registers::new();
        regs.set16(Reg16::CX, value);
        prop_assert_eq!(regs.get8(Reg8::CH), (value >> 8) as u8);
        prop_assert_eq!(regs.get8(Reg8::CL), value as u8);
    }

    #[test]
    fn flags_keep_only_defined_bits(word in any::<u16>()) {
        let flags = Flags::new_with_init(word);
        prop_assert_eq!(flags.get(), word & DEFINED_MASK);
        for flag in Flag::ALL {
            prop_assert_eq!(flags.flag(flag), word & flag.mask() != 0);
        }
    }

    #[test]
    fn words_are_stored_little_endian(addr in 0usize..0xFFFFF, value in any::<u16>()) {
        let mut ram = Memory::new();
        ram.write_word(addr, value).unwrap();
        prop_assert_eq!(ram.read_byte(addr).unwrap(), value as u8);
        prop_assert_eq!(ram.read_byte(addr + 1).unwrap(), (value >> 8) as u8);
        prop_assert_eq!(ram.read_word(addr).unwrap(), value);
    }

    #[test]
    fn out_of_range_writes_change_nothing(size in 2usize..0x400, past in 0usize..16, value in any::<u16>()) {
        let mut ram = Memory::with_size(size).unwrap();
        prop_assert!(ram.write_word(size - 1 + past, value).is_err());
        prop_assert!(ram.write_byte(size + past, value as u8).is_err());
        prop_assert!(ram.as_slice().iter().all(|&b| b == 0));
    }
}
