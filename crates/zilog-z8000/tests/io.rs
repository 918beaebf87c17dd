//! I/O instruction behaviour: normal vs special space, register and
//! immediate port forms, block transfers, and the privilege check.

mod common;

use zilog_z8000::{Z8000_TRAP, F_PV};

/// OUT drives the normal space; IN reads whatever the bus supplies.
#[test]
fn word_in_out_register_ports() {
    let mut sys = common::z8002_with(
        0x4000,
        0x0008,
        &[
            0x2101, 0x0040, // ld r1,#0040
            0x2102, 0xbeef, // ld r2,#beef
            0x3f12, // out @r1,r2
            0x3d13, // in r3,@r1
            0x7a00,
        ],
    );
    sys.io.borrow_mut().read_values.insert((0, 0x0040), 0x5555);
    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(sys.cpu.get_reg(3), 0x5555);
    assert_eq!(sys.io.borrow().writes, vec![(0, 0x0040, 0xbeef)]);
}

/// SIN/SOUT use the special I/O space with immediate port numbers.
#[test]
fn special_io_immediate_ports() {
    let mut sys = common::z8002_with(
        0x4000,
        0x0008,
        &[
            0x3b45, 0x0020, // sin r4,#0020
            0x3b47, 0x0020, // sout #0020,r4
            0x7a00,
        ],
    );
    sys.io.borrow_mut().read_values.insert((1, 0x0020), 0x1234);
    sys.cpu.run(200).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(sys.cpu.get_reg(4), 0x1234);
    assert_eq!(sys.io.borrow().writes, vec![(1, 0x0020, 0x1234)]);
}

/// OTIRB streams bytes from memory to one port, decrementing the counter
/// and setting PV when it runs out.
#[test]
fn otirb_streams_memory_to_port() {
    let mut sys = common::z8002_with(
        0x4000,
        0x0008,
        &[
            0x2101, 0x1000, // ld r1,#1000 (source)
            0x2102, 0x0040, // ld r2,#0040 (port)
            0x2103, 0x0004, // ld r3,#4 (count)
            0x3a12, 0x0320, // otirb @r2,@r1,r3
            0x7a00,
        ],
    );
    sys.mem.borrow_mut().load(0x1000, &[0xde, 0xad, 0xbe, 0xef]);
    sys.cpu.run(500).expect("run");
    assert!(sys.cpu.halted());
    assert_eq!(
        sys.io.borrow().writes,
        vec![
            (0, 0x0040, 0xde),
            (0, 0x0040, 0xad),
            (0, 0x0040, 0xbe),
            (0, 0x0040, 0xef),
        ]
    );
    assert_eq!(sys.cpu.get_reg(1), 0x1004, "source pointer advanced");
    assert_eq!(sys.cpu.get_reg(3), 0, "counter exhausted");
    assert!(sys.cpu.get_fcw() & F_PV != 0, "PV marks completion");
}

/// INIRB fills memory from a fixed port.
#[test]
fn inirb_fills_memory_from_port() {
    let mut sys = common::z8002_with(
        0x4000,
        0x0008,
        &[
            0x2101, 0x3000, // ld r1,#3000 (destination)
            0x2102, 0x0050, // ld r2,#0050 (port)
            0x2103, 0x0003, // ld r3,#3 (count)
            0x3a20, 0x0310, // inirb @r1,@r2,r3
            0x7a00,
        ],
    );
    sys.io.borrow_mut().read_values.insert((0, 0x0050), 0xabab);
    sys.cpu.run(500).expect("run");
    assert!(sys.cpu.halted());
    let m = sys.mem.borrow();
    assert_eq!(m.peek(0x3000), 0xab);
    assert_eq!(m.peek(0x3001), 0xab);
    assert_eq!(m.peek(0x3002), 0xab);
    assert_eq!(sys.cpu.get_reg(3), 0);
}

/// All I/O instructions are privileged; in normal mode they trap instead
/// of touching the bus.
#[test]
fn io_traps_in_normal_mode() {
    let mut sys = common::z8002_with(0x0000, 0x0100, &[0x3d13]);
    sys.cpu.step().expect("reset + in");
    assert!(sys.cpu.irq_pending() & Z8000_TRAP != 0);
    assert!(sys.io.borrow().writes.is_empty());
}
