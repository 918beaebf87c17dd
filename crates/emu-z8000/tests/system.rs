//! Whole-system smoke tests: the shared memory region, loopback I/O ports
//! and the CPU wired the way the CLI wires them.

use std::cell::RefCell;
use std::rc::Rc;

use emu_core::MemoryBus;
use emu_z8000::{IoPorts, MemoryRegion};
use zilog_z8000::Z8000;

fn boot(code: &[u16]) -> (Z8000, Rc<RefCell<MemoryRegion>>, Rc<RefCell<IoPorts>>) {
    let memory = Rc::new(RefCell::new(MemoryRegion::new(0x1_0000)));
    {
        let mut m = memory.borrow_mut();
        m.write_word(2, 0x4000);
        m.write_word(4, 0x0008);
        for (i, word) in code.iter().enumerate() {
            m.write_word(8 + 2 * i as u32, *word);
        }
    }
    let io = Rc::new(RefCell::new(IoPorts::new()));
    let mut cpu = Z8000::z8002();
    cpu.set_memory(memory.clone());
    cpu.set_io(io.clone());
    cpu.reset();
    (cpu, memory, io)
}

/// The loopback data register holds what the program wrote to it.
#[test]
fn io_loopback_round_trip() {
    let (mut cpu, _memory, _io) = boot(&[
        0x2101, 0x0000, // ld r1,#0000 (port)
        0x2102, 0xa5a5, // ld r2,#a5a5
        0x3f12, // out @r1,r2
        0x3d13, // in r3,@r1
        0x7a00,
    ]);
    cpu.run(200).expect("run");
    assert!(cpu.halted());
    assert_eq!(cpu.get_reg(3), 0xA5A5);
}

/// Undefined ports read the fixed placeholder values.
#[test]
fn undefined_port_reads_placeholder() {
    let (mut cpu, _memory, _io) = boot(&[
        0x2101, 0x0888, // ld r1,#0888
        0x3d13, // in r3,@r1
        0x7a00,
    ]);
    cpu.run(200).expect("run");
    assert_eq!(cpu.get_reg(3), 0xDEAD);
}

/// A program loaded through the region's loader runs from the reset
/// vector like the CLI path.
#[test]
fn loaded_image_runs_from_reset_vector() {
    let memory = Rc::new(RefCell::new(MemoryRegion::new(0x1_0000)));
    // Image bytes: reserved word, FCW 0x4000, PC 0x0008, then the code.
    let image: Vec<u8> = vec![
        0x00, 0x00, 0x40, 0x00, 0x00, 0x08, 0x00, 0x00, // vector + padding
        0x21, 0x01, 0x12, 0x34, // ld r1,#1234
        0x7a, 0x00, // halt
    ];
    memory.borrow_mut().load(0, &image).expect("load");

    let io = Rc::new(RefCell::new(IoPorts::new()));
    let mut cpu = Z8000::z8002();
    cpu.set_memory(memory.clone());
    cpu.set_io(io);
    cpu.reset();
    cpu.run(100).expect("run");

    assert!(cpu.halted());
    assert_eq!(cpu.get_reg(1), 0x1234);
}

/// Running without buses attached reports the misuse instead of panicking.
#[test]
fn run_without_buses_is_an_error() {
    let mut cpu = Z8000::z8002();
    assert!(cpu.run(100).is_err());
    let memory = Rc::new(RefCell::new(MemoryRegion::new(0x1_0000)));
    cpu.set_memory(memory);
    assert!(cpu.run(100).is_err(), "still missing the I/O bus");
}
