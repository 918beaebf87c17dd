//! Segmented (Z8001) behaviour: long PC pushes, address-operand decoding
//! and the non-segmented-mode segment substitution.

mod common;

use emu_core::{Cpu, MemoryBus};

/// CALR in segmented mode pushes a four-byte PC; RET pops it and restores
/// the full 23-bit address.
#[test]
fn segmented_call_pushes_long_pc() {
    // <<0>>0100: ld r15,#4000; calr 0200; halt.  <<0>>0200: ret t.
    let mut sys = common::z8001_with(
        0xC000,
        0,
        0x0100,
        &[0x210f, 0x4000, 0xdf83, 0x7a00],
    );
    sys.mem.borrow_mut().write_word(0x0200, 0x9e08);

    sys.cpu.run(500).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(sys.cpu.pc(), 0x0108);
    assert_eq!(sys.cpu.get_reg(15), 0x4000, "stack balanced after ret");
    assert_eq!(sys.cpu.get_reg(14), 0x0000, "stack segment untouched");

    // The frame below the stack pointer still holds the long return
    // address in stored format: marker+segment word, then the offset.
    let m = sys.mem.borrow();
    let at = |a: u32| (u16::from(m.peek(a)) << 8) | u16::from(m.peek(a + 1));
    assert_eq!(at(0x3ffc), 0x8000, "segment word with long-form marker");
    assert_eq!(at(0x3ffe), 0x0106, "return offset");
}

/// Bit 15 of the first address word selects the long form; the short form
/// packs the offset into the low byte.
#[test]
fn address_operand_short_and_long_forms() {
    // ld r1,<<03>>4242 (long form); ld r2,<<03>>0042 (short form); halt.
    let mut sys = common::z8001_with(
        0xC000,
        0,
        0x0100,
        &[0x6101, 0x8300, 0x4242, 0x6102, 0x0342, 0x7a00],
    );
    {
        let mut m = sys.mem.borrow_mut();
        m.write_word(0x03_4242, 0xCAFE);
        m.write_word(0x03_0042, 0xF00D);
    }
    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(sys.cpu.get_reg(1), 0xCAFE);
    assert_eq!(sys.cpu.get_reg(2), 0xF00D);
}

/// With SEG clear on the Z8001, effective addresses borrow the segment of
/// the current PC.
#[test]
fn nonsegmented_mode_substitutes_pc_segment() {
    // Running in segment 2 with SEG off; the one-word address 4242 lands
    // in segment 2.
    let mut sys = common::z8001_with(0x4000, 2, 0x0100, &[0x6101, 0x4242, 0x7a00]);
    sys.mem.borrow_mut().write_word(0x02_4242, 0xBEEF);

    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(sys.cpu.get_reg(1), 0xBEEF);
}

/// LDA leaves a register-format segmented address that indirect accesses
/// resolve back to the same location.
#[test]
fn lda_round_trips_through_indirection() {
    // lda rr2,<<03>>1000; ld r1,@rr2; halt.
    let mut sys = common::z8001_with(
        0xC000,
        0,
        0x0100,
        &[0x7602, 0x8300, 0x1000, 0x2121, 0x7a00],
    );
    sys.mem.borrow_mut().write_word(0x03_1000, 0xA55A);

    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(sys.cpu.get_reg(1), 0xA55A);
}
