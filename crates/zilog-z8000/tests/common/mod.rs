//! Shared test harness: flat RAM plus recording I/O ports.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use emu_core::{IoBus, IoMode, MemoryBus, SimpleBus};
use zilog_z8000::Z8000;

/// I/O bus with preloaded word values per port and a write log.
#[derive(Default)]
pub struct TestIo {
    pub read_values: HashMap<(u8, u16), u16>,
    pub writes: Vec<(u8, u16, u16)>,
}

fn mode_key(mode: IoMode) -> u8 {
    match mode {
        IoMode::Normal => 0,
        IoMode::Special => 1,
    }
}

impl TestIo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IoBus for TestIo {
    fn read_byte(&mut self, addr: u16, mode: IoMode) -> u8 {
        let word = self
            .read_values
            .get(&(mode_key(mode), addr & 0xfffe))
            .copied()
            .unwrap_or(0xffff);
        if addr & 1 != 0 {
            word as u8
        } else {
            (word >> 8) as u8
        }
    }

    fn read_word(&mut self, addr: u16, mode: IoMode) -> u16 {
        self.read_values
            .get(&(mode_key(mode), addr & 0xfffe))
            .copied()
            .unwrap_or(0xffff)
    }

    fn write_byte(&mut self, addr: u16, value: u8, mode: IoMode) {
        self.writes.push((mode_key(mode), addr, u16::from(value)));
    }

    fn write_word(&mut self, addr: u16, value: u16, mode: IoMode) {
        self.writes.push((mode_key(mode), addr, value));
    }
}

pub struct TestSystem {
    pub cpu: Z8000,
    pub mem: Rc<RefCell<SimpleBus>>,
    pub io: Rc<RefCell<TestIo>>,
}

/// Build a Z8002 with the reset vector `{fcw, pc}` and `code` at `pc`.
pub fn z8002_with(fcw: u16, pc: u16, code: &[u16]) -> TestSystem {
    let mem = Rc::new(RefCell::new(SimpleBus::new(0x1_0000)));
    {
        let mut m = mem.borrow_mut();
        m.write_word(2, fcw);
        m.write_word(4, pc);
        for (i, word) in code.iter().enumerate() {
            m.write_word(u32::from(pc) + 2 * i as u32, *word);
        }
    }
    let io = Rc::new(RefCell::new(TestIo::new()));
    let mut cpu = Z8000::z8002();
    cpu.set_memory(mem.clone());
    cpu.set_io(io.clone());
    cpu.reset();
    TestSystem { cpu, mem, io }
}

/// Build a Z8001 with the reset vector `{fcw, seg:off}` and `code` at the
/// target address.
pub fn z8001_with(fcw: u16, seg: u8, off: u16, code: &[u16]) -> TestSystem {
    let mem = Rc::new(RefCell::new(SimpleBus::new(0x80_0000)));
    {
        let mut m = mem.borrow_mut();
        m.write_word(2, fcw);
        m.write_word(4, (u16::from(seg) << 8) | 0x8000);
        m.write_word(6, off);
        let base = (u32::from(seg) << 16) | u32::from(off);
        for (i, word) in code.iter().enumerate() {
            m.write_word(base + 2 * i as u32, *word);
        }
    }
    let io = Rc::new(RefCell::new(TestIo::new()));
    let mut cpu = Z8000::z8001();
    cpu.set_memory(mem.clone());
    cpu.set_io(io.clone());
    cpu.reset();
    TestSystem { cpu, mem, io }
}
