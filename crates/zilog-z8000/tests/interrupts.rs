//! Interrupt and trap servicing: reset, privileged trap, system call,
//! IRET, NMI and the vectored/non-vectored enables.

mod common;

use emu_core::{Cpu, MemoryBus};
use zilog_z8000::{F_S_N, F_VIE, Z8000_TRAP};

/// After reset into a NOP, the PC sits past the NOP and the cycle counter
/// holds exactly its base cost.
#[test]
fn reset_step_into_nop() {
    let mut sys = common::z8002_with(0x4000, 0x0008, &[0x8d07]);
    let cycles = sys.cpu.step().expect("step");
    assert_eq!(sys.cpu.get_reg(15), 0, "stack untouched");
    assert_eq!(cycles, 7);
    assert_eq!(sys.cpu.get_cycles(), 7);
    assert!(!sys.cpu.halted());
    assert_eq!(sys.cpu.pc(), 0x000a);
}

/// HALT in normal mode takes the privileged-instruction trap: PC, FCW and
/// the offending opcode word are pushed, and execution resumes at the
/// handler loaded from the program status area.
#[test]
fn privileged_instruction_traps_in_normal_mode() {
    // PSA at 0: TRAP vector FCW at 0x08, PC at 0x0A.
    let mut sys = common::z8002_with(0x0000, 0x0100, &[0x7a00]);
    {
        let mut m = sys.mem.borrow_mut();
        m.write_word(0x08, 0x4000); // handler runs in system mode
        m.write_word(0x0a, 0x0200);
        m.write_word(0x0200, 0x8d07); // handler body: nop
    }

    // Reset entry, HALT (latches the trap), then the trap service + nop.
    sys.cpu.step().expect("halt step");
    assert!(sys.cpu.irq_pending() & Z8000_TRAP != 0);
    assert!(!sys.cpu.halted(), "trap replaces the halt");
    sys.cpu.step().expect("service step");
    assert_eq!(sys.cpu.irq_pending(), 0);

    assert_eq!(sys.cpu.pc(), 0x0202, "handler nop executed");
    assert!(sys.cpu.get_fcw() & F_S_N != 0);

    // System-mode stack now holds tag, FCW, PC (downward from 0).
    let m = sys.mem.borrow();
    let at = |a: u32| (u16::from(m.peek(a)) << 8) | u16::from(m.peek(a + 1));
    assert_eq!(sys.cpu.get_reg(15), 0xfffa);
    assert_eq!(at(0xfffa), 0x7a00, "tag is the trapping opcode");
    assert_eq!(at(0xfffc), 0x0000, "saved FCW");
    assert_eq!(at(0xfffe), 0x0102, "saved PC");
}

/// SC pushes the instruction word as the trap tag and vectors through the
/// SYSCALL slot; IRET unwinds back to the caller.
#[test]
fn syscall_and_iret_round_trip() {
    let mut sys = common::z8002_with(0x4000, 0x0100, &[0x210f, 0x8000, 0x7f2a, 0x8d07, 0x7a00]);
    {
        let mut m = sys.mem.borrow_mut();
        m.write_word(0x0c, 0x4000); // SYSCALL vector FCW
        m.write_word(0x0e, 0x0200); // SYSCALL vector PC
        m.write_word(0x0200, 0x7b00); // handler: iret
    }

    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted(), "returned from the handler and halted");

    // The handler saw the tag; the stack pointer is balanced again.
    assert_eq!(sys.cpu.get_reg(15), 0x8000);
    let m = sys.mem.borrow();
    let at = |a: u32| (u16::from(m.peek(a)) << 8) | u16::from(m.peek(a + 1));
    assert_eq!(at(0x7ffa), 0x7f2a, "SC instruction word was the tag");
}

/// A rising NMI edge interrupts a running program through the NMI vector.
#[test]
fn nmi_vectors_and_clears_halt() {
    let mut sys = common::z8002_with(0x4000, 0x0100, &[0x210f, 0x8000, 0x7a00]);
    {
        let mut m = sys.mem.borrow_mut();
        m.write_word(0x14, 0x4000); // NMI vector FCW
        m.write_word(0x16, 0x0300); // NMI vector PC
        m.write_word(0x0300, 0x8d07);
    }

    sys.cpu.run(100).expect("run to halt");
    assert!(sys.cpu.halted());

    sys.cpu.set_nmi_line(true);
    sys.cpu.step().expect("nmi service");
    assert!(!sys.cpu.halted(), "NMI clears the halt latch");
    assert_eq!(sys.cpu.pc(), 0x0302);

    // A held line does not retrigger; only a fresh edge does.
    sys.cpu.set_nmi_line(true);
    assert_eq!(sys.cpu.irq_pending(), 0);
    sys.cpu.set_nmi_line(false);
    sys.cpu.set_nmi_line(true);
    assert_ne!(sys.cpu.irq_pending(), 0);
}

/// The vectored interrupt is level-gated by FCW.VIE and reads its PC from
/// the vector jump table.
#[test]
fn vectored_interrupt_respects_enable() {
    let mut sys = common::z8002_with(0x4000, 0x0100, &[0x8d07, 0x8d07, 0x8d07, 0x8d07]);
    {
        let mut m = sys.mem.borrow_mut();
        m.write_word(0x1c, 0x4000); // VI vector FCW
        m.write_word(0x1e + 2 * 3, 0x0400); // jump table slot for vector 3
        m.write_word(0x0400, 0x7a00);
    }

    // Masked: the line is pending but not taken.
    sys.cpu.step().expect("reset entry");
    sys.cpu.set_irq_line(1, true);
    sys.cpu.step().expect("still masked");
    assert_eq!(sys.cpu.pc(), 0x0104);

    // With VIE set in the reset FCW the same line is serviced.
    let mut sys2 = common::z8002_with(0x4000 | F_VIE, 0x0100, &[0x8d07, 0x8d07]);
    {
        let mut m = sys2.mem.borrow_mut();
        m.write_word(0x1c, 0x4000);
        m.write_word(0x1e + 2 * 3, 0x0400);
        m.write_word(0x0400, 0x7a00);
    }
    sys2.cpu.set_irq_vector(3);
    sys2.cpu.step().expect("reset entry");
    sys2.cpu.set_irq_line(1, true);
    sys2.cpu.run(100).expect("service and halt");
    assert!(sys2.cpu.halted(), "handler reached through the jump table");
}

/// Undefined opcodes take the same trap path with the word preserved.
#[test]
fn undefined_opcode_traps() {
    let mut sys = common::z8002_with(0x4000, 0x0100, &[0x210f, 0x8000, 0x0c13]);
    {
        let mut m = sys.mem.borrow_mut();
        m.write_word(0x08, 0x4000);
        m.write_word(0x0a, 0x0200);
        m.write_word(0x0200, 0x7a00);
    }
    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    let m = sys.mem.borrow();
    let at = |a: u32| (u16::from(m.peek(a)) << 8) | u16::from(m.peek(a + 1));
    assert_eq!(at(0x7ffa), 0x0c13, "undefined word pushed as tag");
}
