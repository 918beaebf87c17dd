//! Register-file view invariants and stack/branch boundary behaviour.

mod common;

use emu_core::Cpu;
use proptest::prelude::*;
use zilog_z8000::{F_C, F_PV, F_S, F_Z, Z8000};

proptest! {
    /// The byte views alias the halves of the word registers exactly.
    #[test]
    fn byte_views_agree_with_words(vals in proptest::collection::vec(any::<u16>(), 16)) {
        let mut cpu = Z8000::z8002();
        for (i, v) in vals.iter().enumerate() {
            cpu.set_reg(i as u8, *v);
        }
        for n in 0..8u8 {
            prop_assert_eq!(cpu.get_reg_byte(2 * n), (cpu.get_reg(n) >> 8) as u8);
            prop_assert_eq!(cpu.get_reg_byte(2 * n + 1), cpu.get_reg(n) as u8);
        }
    }

    /// The long view is the big-endian concatenation of its word pair, and
    /// writing it round-trips through both halves.
    #[test]
    fn long_views_agree_with_words(vals in proptest::collection::vec(any::<u32>(), 8)) {
        let mut cpu = Z8000::z8002();
        for (i, v) in vals.iter().enumerate() {
            cpu.set_reg_long(2 * i as u8, *v);
        }
        for (i, v) in vals.iter().enumerate() {
            let n = 2 * i as u8;
            prop_assert_eq!(cpu.get_reg_long(n), *v);
            prop_assert_eq!(u32::from(cpu.get_reg(n)) << 16 | u32::from(cpu.get_reg(n + 1)), *v);
        }
    }

    /// Byte writes through either view leave the sibling byte alone.
    #[test]
    fn byte_writes_are_independent(high in any::<u8>(), low in any::<u8>()) {
        let mut cpu = Z8000::z8002();
        cpu.set_reg(3, 0xffff);
        cpu.set_reg_byte(6, high); // RH3
        cpu.set_reg_byte(7, low);  // RL3
        prop_assert_eq!(cpu.get_reg(3), (u16::from(high) << 8) | u16::from(low));
    }
}

/// PUSH then POP restores both the value and the stack pointer.
#[test]
fn push_pop_word_round_trip() {
    let mut sys = common::z8002_with(
        0x4000,
        0x0008,
        &[0x210f, 0x8000, 0x2101, 0x1234, 0x93f1, 0x97f2, 0x7a00],
    );
    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(sys.cpu.get_reg(2), 0x1234);
    assert_eq!(sys.cpu.get_reg(15), 0x8000, "stack pointer restored");
}

/// Pushing a long and popping it returns the same 32-bit value.
#[test]
fn push_pop_long_round_trip() {
    let mut sys = common::z8002_with(
        0x4000,
        0x0008,
        &[
            0x210f, 0x8000, // ld r15,#8000
            0x2102, 0xdead, // ld r2,#dead
            0x2103, 0xbeef, // ld r3,#beef
            0x91f2, // pushl @r15,rr2
            0x95f4, // popl rr4,@r15
            0x7a00,
        ],
    );
    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(sys.cpu.get_reg_long(4), 0xDEAD_BEEF);
    assert_eq!(sys.cpu.get_reg(15), 0x8000);
    // The stacked long sits below the restored pointer, high word first.
    let m = sys.mem.borrow();
    let at = |a: u32| (u16::from(m.peek(a)) << 8) | u16::from(m.peek(a + 1));
    assert_eq!(at(0x7ffc), 0xDEAD);
    assert_eq!(at(0x7ffe), 0xBEEF);
}

/// A byte store to an odd address updates the low half of the enclosing
/// word; an even address updates the high half.
#[test]
fn byte_stores_update_word_halves() {
    let mut sys = common::z8002_with(
        0x4000,
        0x0008,
        &[
            0xcacc, // ldb rl2,#cc
            0x2101, 0x1001, // ld r1,#1001 (odd)
            0x2e1a, // ldb @r1,rl2
            0x2104, 0x2000, // ld r4,#2000 (even)
            0x2e4a, // ldb @r4,rl2
            0x7a00,
        ],
    );
    {
        use emu_core::MemoryBus;
        let mut m = sys.mem.borrow_mut();
        m.write_word(0x1000, 0xAABB);
        m.write_word(0x2000, 0x1122);
    }
    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    let m = sys.mem.borrow();
    let at = |a: u32| (u16::from(m.peek(a)) << 8) | u16::from(m.peek(a + 1));
    assert_eq!(at(0x1000), 0xAACC, "odd write replaces the low byte");
    assert_eq!(at(0x2000), 0xCC22, "even write replaces the high byte");
}

/// LDCTL FCW round-trips the architecturally writable bits.
#[test]
fn ldctl_fcw_round_trip() {
    let mut sys = common::z8002_with(
        0x4000,
        0x0008,
        &[
            0x8df1, // setflg c,z,s,p
            0x7d12, // ldctl r1,fcw
            0x8df3, // resflg c,z,s,p
            0x7d1a, // ldctl fcw,r1
            0x7d22, // ldctl r2,fcw
            0x7a00,
        ],
    );
    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(sys.cpu.get_reg(2), sys.cpu.get_reg(1));
    let fcw = sys.cpu.get_fcw();
    assert_eq!(fcw & (F_C | F_Z | F_S | F_PV), F_C | F_Z | F_S | F_PV);
}

/// JR with displacement zero reaches the next instruction; a self-branch
/// spins until the cycle cap expires.
#[test]
fn jr_zero_and_self_loop() {
    let mut fall = common::z8002_with(0x4000, 0x0008, &[0xe800, 0x7a00]);
    fall.cpu.run(100).expect("run");
    assert!(fall.cpu.halted());

    let mut spin = common::z8002_with(0x4000, 0x0008, &[0xe8ff]);
    spin.cpu.run(120).expect("run");
    assert!(!spin.cpu.halted(), "self-branch never halts");
    assert_eq!(spin.cpu.pc(), 0x0008, "still at the branch");
}

/// DJNZ decrements to zero and falls through without touching flags.
#[test]
fn djnz_falls_through_without_flags()  {
    let mut sys = common::z8002_with(
        0x4000,
        0x0008,
        &[
            0x8d81, // setflg c
            0x2101, 0x0001, // ld r1,#1
            0xf181, // djnz r1,back
            0x7a00,
        ],
    );
    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(sys.cpu.get_reg(1), 0);
    assert!(sys.cpu.get_fcw() & F_C != 0, "carry untouched by djnz");
}

/// TESTB reports exactly the zero/sign/parity table for every byte value.
#[test]
fn testb_matches_flag_table() {
    for b in 0..=255u16 {
        let mut sys = common::z8002_with(
            0x4000,
            0x0008,
            &[0xc800 | b, 0x8c84, 0x7a00], // ldb rl0,#b; testb rl0; halt
        );
        sys.cpu.run(100).expect("run");
        let fcw = sys.cpu.get_fcw();
        assert_eq!(fcw & F_Z != 0, b == 0, "Z for {b:#04x}");
        assert_eq!(fcw & F_S != 0, b & 0x80 != 0, "S for {b:#04x}");
        assert_eq!(
            fcw & F_PV != 0,
            (b as u8).count_ones() % 2 == 0,
            "parity for {b:#04x}"
        );
    }
}
