//! Z8000 CPU state, buses, interrupt unit and execution loop.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

mod execute;

use std::cell::RefCell;
use std::rc::Rc;

use emu_core::{Cpu, IoBus, IoMode, MemoryBus};
use thiserror::Error;

use crate::disasm::disassemble;
use crate::flags::{F_NVIE, F_SEG, F_S_N, F_VIE, F_C, F_DA, F_H, F_PV, F_S, F_Z};
use crate::registers::RegisterFile;
use crate::tables::entry_for;

/// External reset request (highest priority).
pub const Z8000_RESET: u16 = 0x80;
/// Extended-instruction (EPU) trap.
pub const Z8000_EPU: u16 = 0x40;
/// Privileged-instruction trap.
pub const Z8000_TRAP: u16 = 0x20;
/// System-call trap (SC instruction).
pub const Z8000_SYSCALL: u16 = 0x10;
/// Segmentation trap.
pub const Z8000_SEGTRAP: u16 = 0x08;
/// Non-maskable interrupt.
pub const Z8000_NMI: u16 = 0x04;
/// Non-vectored interrupt, gated by FCW.NVIE.
pub const Z8000_NVI: u16 = 0x02;
/// Vectored interrupt, gated by FCW.VIE (lowest priority).
pub const Z8000_VI: u16 = 0x01;

// Program status area offsets before the vector multiplier is applied.
const VEC_EPU: u32 = 0x0004;
const VEC_TRAP: u32 = 0x0008;
const VEC_SYSCALL: u32 = 0x000c;
const VEC_SEGTRAP: u32 = 0x0010;
const VEC_NMI: u32 = 0x0014;
const VEC_NVI: u32 = 0x0018;
const VEC_VI: u32 = 0x001c;
const VEC_00: u32 = 0x001e;

/// CPU family member being emulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Non-segmented, 16-bit address space, word-sized PC pushes.
    Z8002,
    /// Segmented, 23-bit address space, long-format PC pushes.
    Z8001,
}

/// Raised when `run`/`step` are called without the required buses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachError {
    #[error("no program memory attached to CPU")]
    Memory,
    #[error("no I/O bus attached to CPU")]
    Io,
}

/// Register snapshot for observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub r: [u16; 16],
    pub pc: u32,
    pub fcw: u16,
    pub refresh: u16,
    pub psap_seg: u16,
    pub psap_off: u16,
    pub nsp_seg: u16,
    pub nsp_off: u16,
}

pub(crate) type MemHandle = Rc<RefCell<dyn MemoryBus>>;
pub(crate) type IoHandle = Rc<RefCell<dyn IoBus>>;

/// Memory role selector for bus accesses.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Space {
    Program,
    Data,
    Stack,
}

/// Destination of a read-modify-write operand.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target {
    Reg(u8),
    Mem(u32),
}

/// A Z8000-family CPU core.
pub struct Z8000 {
    variant: Variant,
    pub(crate) regs: RegisterFile,
    pub(crate) pc: u32,
    ppc: u32,
    pub(crate) fcw: u16,
    pub(crate) psap_seg: u16,
    pub(crate) psap_off: u16,
    pub(crate) nsp_seg: u16,
    pub(crate) nsp_off: u16,
    pub(crate) refresh: u16,
    pub(crate) irq_req: u16,
    irq_vec: u16,
    nmi_state: bool,
    irq_state: [bool; 2],
    pub(crate) mi: bool,
    pub(crate) halt: bool,
    pub(crate) op: [u32; 4],
    op_valid: u8,
    icount: i64,
    total_cycles: i64,
    program: Option<MemHandle>,
    data: Option<MemHandle>,
    stack: Option<MemHandle>,
    io: Option<IoHandle>,
    trace: bool,
    reg_trace: bool,
}

impl Z8000 {
    /// Create a CPU of the given family variant.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            regs: RegisterFile::default(),
            pc: 0,
            ppc: 0,
            fcw: 0,
            psap_seg: 0,
            psap_off: 0,
            nsp_seg: 0,
            nsp_off: 0,
            refresh: 0,
            irq_req: 0,
            irq_vec: 0,
            nmi_state: false,
            irq_state: [false; 2],
            mi: false,
            halt: false,
            op: [0; 4],
            op_valid: 0,
            icount: 0,
            total_cycles: 0,
            program: None,
            data: None,
            stack: None,
            io: None,
            trace: false,
            reg_trace: false,
        }
    }

    /// Create a non-segmented Z8002.
    #[must_use]
    pub fn z8002() -> Self {
        Self::new(Variant::Z8002)
    }

    /// Create a segmented Z8001.
    #[must_use]
    pub fn z8001() -> Self {
        Self::new(Variant::Z8001)
    }

    // -----------------------------------------------------------------------
    // Bus attachment
    // -----------------------------------------------------------------------

    /// Attach one memory bus to all three roles (program, data, stack).
    pub fn set_memory(&mut self, bus: MemHandle) {
        self.program = Some(bus.clone());
        self.data = Some(bus.clone());
        self.stack = Some(bus);
    }

    /// Attach the program memory bus.
    pub fn set_program_memory(&mut self, bus: MemHandle) {
        self.program = Some(bus);
    }

    /// Attach the data memory bus. Falls back to program memory when unset.
    pub fn set_data_memory(&mut self, bus: MemHandle) {
        self.data = Some(bus);
    }

    /// Attach the stack memory bus. Falls back to program memory when unset.
    pub fn set_stack_memory(&mut self, bus: MemHandle) {
        self.stack = Some(bus);
    }

    /// Attach the I/O bus.
    pub fn set_io(&mut self, bus: IoHandle) {
        self.io = Some(bus);
    }

    fn ensure_attached(&self) -> Result<(), AttachError> {
        if self.program.is_none() {
            return Err(AttachError::Memory);
        }
        if self.io.is_none() {
            return Err(AttachError::Io);
        }
        Ok(())
    }

    fn bus(&self, space: Space) -> MemHandle {
        let slot = match space {
            Space::Program => &self.program,
            Space::Data => &self.data,
            Space::Stack => &self.stack,
        };
        slot.as_ref()
            .or(self.program.as_ref())
            .expect("memory bus not attached")
            .clone()
    }

    // -----------------------------------------------------------------------
    // Control API
    // -----------------------------------------------------------------------

    /// Latch a reset request; serviced at the next `step`/`run`.
    pub fn reset(&mut self) {
        self.clear_internal_state();
        self.irq_req |= Z8000_RESET;
        self.refresh &= 0x7fff;
        self.halt = false;
        self.mi = false;
    }

    fn clear_internal_state(&mut self) {
        self.regs.clear();
        self.op = [0; 4];
        self.op_valid = 0;
        self.ppc = 0;
        self.pc = 0;
        self.psap_seg = 0;
        self.psap_off = 0;
        self.fcw = 0;
        self.refresh = 0;
        self.nsp_seg = 0;
        self.nsp_off = 0;
        self.irq_req = 0;
        self.irq_vec = 0;
        self.nmi_state = false;
        self.irq_state = [false; 2];
        self.halt = false;
        self.total_cycles = 0;
    }

    /// Execute a single instruction; returns the cycles consumed.
    ///
    /// # Errors
    ///
    /// Fails if no program memory or I/O bus is attached.
    pub fn step(&mut self) -> Result<i32, AttachError> {
        self.ensure_attached()?;

        if self.irq_req != 0 {
            self.interrupt();
        }
        if self.halt {
            return Ok(0);
        }

        self.ppc = self.pc;
        self.op[0] = u32::from(self.rdop());
        self.op_valid = 1;
        self.bump_refresh();

        if self.trace {
            self.trace_instruction();
        }

        let exec = entry_for(self.op[0] as u16);
        let cycles = i32::from(exec.cycles);
        self.total_cycles += i64::from(cycles);
        (exec.handler)(self);
        self.op_valid = 0;

        if self.reg_trace {
            self.dump_regs();
        }
        Ok(cycles)
    }

    /// Run until the cycle budget is exhausted or the CPU halts with no
    /// pending request; returns the cycles consumed.
    ///
    /// # Errors
    ///
    /// Fails if no program memory or I/O bus is attached.
    pub fn run(&mut self, max_cycles: i64) -> Result<i64, AttachError> {
        self.ensure_attached()?;

        self.icount = if max_cycles < 0 { 1_000_000 } else { max_cycles };
        let start = self.total_cycles;

        loop {
            if self.irq_req != 0 {
                self.interrupt();
            }

            self.ppc = self.pc;

            if self.halt {
                self.icount = 0;
            } else {
                self.op[0] = u32::from(self.rdop());
                self.op_valid = 1;
                self.bump_refresh();

                if self.trace {
                    self.trace_instruction();
                }

                let exec = entry_for(self.op[0] as u16);
                self.icount -= i64::from(exec.cycles);
                self.total_cycles += i64::from(exec.cycles);
                (exec.handler)(self);
                self.op_valid = 0;

                if self.reg_trace {
                    self.dump_regs();
                }
            }

            if self.icount <= 0 || self.halt {
                break;
            }
        }
        Ok(self.total_cycles - start)
    }

    fn bump_refresh(&mut self) {
        if self.refresh & 0x8000 != 0 {
            self.refresh = (self.refresh & 0xff00) | (self.refresh.wrapping_add(1) & 0x00ff);
        }
    }

    /// Total cycles executed since the last reset.
    #[must_use]
    pub fn get_cycles(&self) -> i64 {
        self.total_cycles
    }

    /// True while the HALT latch is set.
    #[must_use]
    pub fn halted(&self) -> bool {
        self.halt
    }

    /// Enable or disable instruction tracing.
    pub fn set_trace(&mut self, enable: bool) {
        self.trace = enable;
    }

    /// Enable or disable the per-instruction register dump.
    pub fn set_reg_trace(&mut self, enable: bool) {
        self.reg_trace = enable;
    }

    /// Drive the NMI input; a rising edge latches the request.
    pub fn set_nmi_line(&mut self, state: bool) {
        if state && !self.nmi_state {
            self.irq_req |= Z8000_NMI;
        }
        self.nmi_state = state;
    }

    /// Drive an interrupt line: 0 = NVI, 1 = VI. Level sensitive, gated by
    /// the corresponding FCW enable bit.
    pub fn set_irq_line(&mut self, line: usize, state: bool) {
        let (bit, enable) = match line {
            0 => (Z8000_NVI, F_NVIE),
            _ => (Z8000_VI, F_VIE),
        };
        self.irq_state[line & 1] = state;
        if state {
            if self.fcw & enable != 0 {
                self.irq_req |= bit;
            }
        } else {
            self.irq_req &= !bit;
        }
    }

    /// Set the vector placed on the bus for the next vectored interrupt.
    pub fn set_irq_vector(&mut self, vec: u16) {
        self.irq_vec = vec;
    }

    /// Pending interrupt/trap request bits.
    #[must_use]
    pub fn irq_pending(&self) -> u16 {
        self.irq_req
    }

    /// The flag/control word.
    #[must_use]
    pub fn get_fcw(&self) -> u16 {
        self.fcw
    }

    /// Word register R`n`.
    #[must_use]
    pub fn get_reg(&self, n: u8) -> u16 {
        self.regs.w(n)
    }

    /// Set word register R`n`.
    pub fn set_reg(&mut self, n: u8, value: u16) {
        self.regs.set_w(n, value);
    }

    /// Byte register at view index `k` (RH0, RL0, RH1, RL1, ...).
    #[must_use]
    pub fn get_reg_byte(&self, k: u8) -> u8 {
        self.regs.b(k)
    }

    /// Set byte register at view index `k`.
    pub fn set_reg_byte(&mut self, k: u8, value: u8) {
        self.regs.set_b(k, value);
    }

    /// Long register RR`n` (`n` even).
    #[must_use]
    pub fn get_reg_long(&self, n: u8) -> u32 {
        self.regs.l(n)
    }

    /// Set long register RR`n`.
    pub fn set_reg_long(&mut self, n: u8, value: u32) {
        self.regs.set_l(n, value);
    }

    /// Print the architectural registers to stdout.
    pub fn dump_regs(&self) {
        match self.variant {
            Variant::Z8002 => {
                println!("\n=== Z8002 Registers ===");
                println!(
                    "PC={:04X}  FCW={:04X}  PSAP={:04X}  NSP={:04X}",
                    self.pc & 0xffff,
                    self.fcw,
                    self.psap_off,
                    self.nsp_off
                );
                println!("Flags: {}", self.flags_string(false));
            }
            Variant::Z8001 => {
                println!("\n=== Z8001 Registers ===");
                println!(
                    "PC=<<{:02X}>>{:04X}  FCW={:04X}  PSAP=<<{:02X}>>{:04X}  NSP=<<{:02X}>>{:04X}",
                    (self.pc >> 16) & 0x7f,
                    self.pc & 0xffff,
                    self.fcw,
                    self.psap_seg & 0x7f,
                    self.psap_off,
                    self.nsp_seg & 0x7f,
                    self.nsp_off
                );
                println!("Flags: {}", self.flags_string(true));
            }
        }
        println!();
        let r = self.regs.words();
        for i in (0..16).step_by(4) {
            println!(
                "R{:<2}={:04X}  R{:<2}={:04X}  R{:<2}={:04X}  R{:<2}={:04X}",
                i,
                r[i],
                i + 1,
                r[i + 1],
                i + 2,
                r[i + 2],
                i + 3,
                r[i + 3]
            );
        }
    }

    fn flags_string(&self, seg: bool) -> String {
        let mut s = String::new();
        if seg {
            s.push(if self.fcw & F_SEG != 0 { 'G' } else { '-' });
        }
        s.push(if self.fcw & F_C != 0 { 'C' } else { '-' });
        s.push(if self.fcw & F_Z != 0 { 'Z' } else { '-' });
        s.push(if self.fcw & F_S != 0 { 'S' } else { '-' });
        s.push(if self.fcw & F_PV != 0 { 'V' } else { '-' });
        s.push(if self.fcw & F_DA != 0 { 'D' } else { '-' });
        s.push(if self.fcw & F_H != 0 { 'H' } else { '-' });
        s
    }

    // -----------------------------------------------------------------------
    // Address arithmetic
    // -----------------------------------------------------------------------

    pub(crate) fn segmented_mode(&self) -> bool {
        self.variant == Variant::Z8001 && self.fcw & F_SEG != 0
    }

    pub(crate) fn is_segmented_variant(&self) -> bool {
        self.variant == Variant::Z8001
    }

    fn vector_mult(&self) -> u32 {
        match self.variant {
            Variant::Z8002 => 1,
            Variant::Z8001 => 2,
        }
    }

    /// Add to an address, preserving the segment and wrapping the offset.
    pub(crate) fn addr_add(addr: u32, addend: u32) -> u32 {
        (addr & 0xffff_0000) | (addr.wrapping_add(addend) & 0xffff)
    }

    /// Subtract from an address, preserving the segment.
    pub(crate) fn addr_sub(addr: u32, subtrahend: u32) -> u32 {
        (addr & 0xffff_0000) | (addr.wrapping_sub(subtrahend) & 0xffff)
    }

    /// Register format `(seg << 8) << 16 | offset` to internal
    /// `(seg << 16) | offset`.
    pub(crate) fn segmented_addr(addr: u32) -> u32 {
        (addr & 0xffff) | ((addr >> 8) & 0x7f_0000)
    }

    /// Internal address to the stored long format with the long-form marker.
    pub(crate) fn make_segmented_addr(addr: u32) -> u32 {
        ((addr << 8) & 0x7f00_0000) | (addr & 0xffff) | 0x8000_0000
    }

    /// In non-segmented mode on the segmented variant, effective addresses
    /// take their segment from the current PC.
    fn adjust_addr_for_nonseg_mode(&self, addr: u32) -> u32 {
        match self.variant {
            Variant::Z8002 => addr,
            Variant::Z8001 => {
                if self.fcw & F_SEG == 0 {
                    (addr & 0xffff) | (self.pc & 0x7f_0000)
                } else {
                    addr
                }
            }
        }
    }

    /// Effective address held in register `n`: RR`n` in segmented mode,
    /// R`n` otherwise.
    pub(crate) fn addr_from_reg(&self, n: u8) -> u32 {
        if self.segmented_mode() {
            Self::segmented_addr(self.regs.l(n))
        } else {
            u32::from(self.regs.w(n))
        }
    }

    // -----------------------------------------------------------------------
    // Memory and I/O access
    // -----------------------------------------------------------------------

    pub(crate) fn rdmem_b(&mut self, space: Space, addr: u32) -> u8 {
        let addr = self.adjust_addr_for_nonseg_mode(addr);
        self.bus(space).borrow_mut().read_byte(addr)
    }

    pub(crate) fn rdmem_w(&mut self, space: Space, addr: u32) -> u16 {
        let addr = self.adjust_addr_for_nonseg_mode(addr) & !1;
        self.bus(space).borrow_mut().read_word(addr)
    }

    pub(crate) fn rdmem_l(&mut self, space: Space, addr: u32) -> u32 {
        let addr = self.adjust_addr_for_nonseg_mode(addr) & !1;
        let hi = self.bus(space).borrow_mut().read_word(addr);
        let lo = self
            .bus(space)
            .borrow_mut()
            .read_word(Self::addr_add(addr, 2));
        (u32::from(hi) << 16) | u32::from(lo)
    }

    pub(crate) fn wrmem_b(&mut self, space: Space, addr: u32, value: u8) {
        let addr = self.adjust_addr_for_nonseg_mode(addr);
        let word = u16::from(value) | (u16::from(value) << 8);
        let mask = if addr & 1 != 0 { 0x00ff } else { 0xff00 };
        self.bus(space)
            .borrow_mut()
            .write_word_masked(addr & !1, word, mask);
    }

    pub(crate) fn wrmem_w(&mut self, space: Space, addr: u32, value: u16) {
        let addr = self.adjust_addr_for_nonseg_mode(addr) & !1;
        self.bus(space).borrow_mut().write_word(addr, value);
    }

    pub(crate) fn wrmem_l(&mut self, space: Space, addr: u32, value: u32) {
        let addr = self.adjust_addr_for_nonseg_mode(addr) & !1;
        self.bus(space)
            .borrow_mut()
            .write_word(addr, (value >> 16) as u16);
        self.bus(space)
            .borrow_mut()
            .write_word(Self::addr_add(addr, 2), value as u16);
    }

    pub(crate) fn rdport_b(&mut self, mode: IoMode, addr: u16) -> u8 {
        self.io
            .as_ref()
            .expect("I/O bus not attached")
            .clone()
            .borrow_mut()
            .read_byte(addr, mode)
    }

    pub(crate) fn rdport_w(&mut self, mode: IoMode, addr: u16) -> u16 {
        self.io
            .as_ref()
            .expect("I/O bus not attached")
            .clone()
            .borrow_mut()
            .read_word(addr, mode)
    }

    pub(crate) fn wrport_b(&mut self, mode: IoMode, addr: u16, value: u8) {
        self.io
            .as_ref()
            .expect("I/O bus not attached")
            .clone()
            .borrow_mut()
            .write_byte(addr, value, mode);
    }

    pub(crate) fn wrport_w(&mut self, mode: IoMode, addr: u16, value: u16) {
        self.io
            .as_ref()
            .expect("I/O bus not attached")
            .clone()
            .borrow_mut()
            .write_word(addr, value, mode);
    }

    // -----------------------------------------------------------------------
    // Opcode and operand fetch
    // -----------------------------------------------------------------------

    fn rdop(&mut self) -> u16 {
        let word = self.bus(Space::Program).borrow_mut().read_word(self.pc & !1);
        self.pc = self.pc.wrapping_add(2);
        word
    }

    /// Fetch operand word `n` on first use; idempotent within an instruction.
    pub(crate) fn get_operand(&mut self, n: usize) -> u16 {
        debug_assert!(
            (0..n).all(|i| self.op_valid & (1 << i) != 0),
            "operand {n} fetched out of order"
        );
        if self.op_valid & (1 << n) == 0 {
            self.op[n] = u32::from(self.rdop());
            self.op_valid |= 1 << n;
        }
        self.op[n] as u16
    }

    /// Fetch operand word `n` as a direct address, decoding the segmented
    /// short/long forms.
    pub(crate) fn get_addr_operand(&mut self, n: usize) -> u32 {
        debug_assert!((0..n).all(|i| self.op_valid & (1 << i) != 0));
        if self.op_valid & (1 << n) == 0 {
            let seg = u32::from(self.rdop());
            let addr = if self.segmented_mode() {
                if seg & 0x8000 != 0 {
                    ((seg & 0x7f00) << 8) | u32::from(self.rdop())
                } else {
                    ((seg & 0x7f00) << 8) | (seg & 0xff)
                }
            } else {
                seg
            };
            self.op[n] = addr;
            self.op_valid |= 1 << n;
        }
        self.op[n]
    }

    /// Like `get_addr_operand` but preserves the raw register-format
    /// encoding (used by LDA so the marker word round-trips).
    pub(crate) fn get_raw_addr_operand(&mut self, n: usize) -> u32 {
        debug_assert!((0..n).all(|i| self.op_valid & (1 << i) != 0));
        if self.op_valid & (1 << n) == 0 {
            let seg = u32::from(self.rdop());
            let addr = if self.segmented_mode() {
                if seg & 0x8000 != 0 {
                    (seg << 16) | u32::from(self.rdop())
                } else {
                    (seg << 16) | (seg & 0xff)
                }
            } else {
                seg
            };
            self.op[n] = addr;
            self.op_valid |= 1 << n;
        }
        self.op[n]
    }

    fn next_index(&self) -> usize {
        self.op_valid.trailing_ones() as usize
    }

    /// Fetch the next operand word in stream order.
    pub(crate) fn next_operand(&mut self) -> u16 {
        let n = self.next_index();
        self.get_operand(n)
    }

    /// Fetch the next operand as an address.
    pub(crate) fn next_addr_operand(&mut self) -> u32 {
        let n = self.next_index();
        self.get_addr_operand(n)
    }

    /// Fetch the next operand as a raw-format address.
    pub(crate) fn next_raw_addr_operand(&mut self) -> u32 {
        let n = self.next_index();
        self.get_raw_addr_operand(n)
    }

    // -----------------------------------------------------------------------
    // Field extraction and operand resolution
    // -----------------------------------------------------------------------

    /// The instruction's first word.
    pub(crate) fn op0(&self) -> u16 {
        self.op[0] as u16
    }

    /// Addressing mode from the opcode word: 0 = IR/IM, 1 = DA/X, 2 = R.
    pub(crate) fn mode(&self) -> u16 {
        (self.op[0] >> 14) as u16
    }

    /// Source / designator field, opcode bits 7..4.
    pub(crate) fn src_field(&self) -> u8 {
        ((self.op[0] >> 4) & 15) as u8
    }

    /// Destination field, opcode bits 3..0.
    pub(crate) fn dst_field(&self) -> u8 {
        (self.op[0] & 15) as u8
    }

    /// Nibble `n` (0 = most significant) of operand word `word`.
    pub(crate) fn nib(&self, word: usize, n: usize) -> u8 {
        ((self.op[word] >> (12 - 4 * n)) & 15) as u8
    }

    /// Byte register by architectural number: 0..7 = RH0..RH7,
    /// 8..15 = RL0..RL7.
    pub(crate) fn rb(&self, n: u8) -> u8 {
        self.regs.b(((n & 7) << 1) | ((n >> 3) & 1))
    }

    /// Set byte register by architectural number.
    pub(crate) fn set_rb(&mut self, n: u8, value: u8) {
        self.regs.set_b(((n & 7) << 1) | ((n >> 3) & 1), value);
    }

    /// Effective address of a DA/X operand; the designator field supplies
    /// the index register when non-zero.
    fn da_x_addr(&mut self, index_field: u8) -> u32 {
        let addr = self.next_addr_operand();
        if index_field != 0 {
            Self::addr_add(addr, u32::from(self.regs.w(index_field)))
        } else {
            addr
        }
    }

    /// Resolve the designator field (bits 7..4) as a read-modify-write
    /// target under the opcode's addressing mode.
    pub(crate) fn dst_target(&mut self) -> Target {
        let reg = self.src_field();
        match self.mode() {
            2 => Target::Reg(reg),
            0 => Target::Mem(self.addr_from_reg(reg)),
            _ => Target::Mem(self.da_x_addr(reg)),
        }
    }

    /// Resolve a second target from the destination field (bits 3..0); the
    /// pop and store forms place the movable operand there.
    pub(crate) fn low_target(&mut self) -> Target {
        let reg = self.dst_field();
        match self.mode() {
            2 => Target::Reg(reg),
            0 => Target::Mem(self.addr_from_reg(reg)),
            _ => Target::Mem(self.da_x_addr(reg)),
        }
    }

    pub(crate) fn read_t_b(&mut self, t: Target) -> u8 {
        match t {
            Target::Reg(n) => self.rb(n),
            Target::Mem(a) => self.rdmem_b(Space::Data, a),
        }
    }

    pub(crate) fn write_t_b(&mut self, t: Target, v: u8) {
        match t {
            Target::Reg(n) => self.set_rb(n, v),
            Target::Mem(a) => self.wrmem_b(Space::Data, a, v),
        }
    }

    pub(crate) fn read_t_w(&mut self, t: Target) -> u16 {
        match t {
            Target::Reg(n) => self.regs.w(n),
            Target::Mem(a) => self.rdmem_w(Space::Data, a),
        }
    }

    pub(crate) fn write_t_w(&mut self, t: Target, v: u16) {
        match t {
            Target::Reg(n) => self.regs.set_w(n, v),
            Target::Mem(a) => self.wrmem_w(Space::Data, a, v),
        }
    }

    pub(crate) fn read_t_l(&mut self, t: Target) -> u32 {
        match t {
            Target::Reg(n) => self.regs.l(n),
            Target::Mem(a) => self.rdmem_l(Space::Data, a),
        }
    }

    pub(crate) fn write_t_l(&mut self, t: Target, v: u32) {
        match t {
            Target::Reg(n) => self.regs.set_l(n, v),
            Target::Mem(a) => self.wrmem_l(Space::Data, a, v),
        }
    }

    /// Source value for the standard two-operand byte forms (register,
    /// indirect, immediate, direct, indexed).
    pub(crate) fn src_value_b(&mut self) -> u8 {
        let src = self.src_field();
        match self.mode() {
            2 => self.rb(src),
            0 => {
                if src == 0 {
                    self.next_operand() as u8
                } else {
                    let a = self.addr_from_reg(src);
                    self.rdmem_b(Space::Data, a)
                }
            }
            _ => {
                let a = self.da_x_addr(src);
                self.rdmem_b(Space::Data, a)
            }
        }
    }

    /// Source value for the standard two-operand word forms.
    pub(crate) fn src_value_w(&mut self) -> u16 {
        let src = self.src_field();
        match self.mode() {
            2 => self.regs.w(src),
            0 => {
                if src == 0 {
                    self.next_operand()
                } else {
                    let a = self.addr_from_reg(src);
                    self.rdmem_w(Space::Data, a)
                }
            }
            _ => {
                let a = self.da_x_addr(src);
                self.rdmem_w(Space::Data, a)
            }
        }
    }

    /// Source value for the standard two-operand long forms.
    pub(crate) fn src_value_l(&mut self) -> u32 {
        let src = self.src_field();
        match self.mode() {
            2 => self.regs.l(src),
            0 => {
                if src == 0 {
                    let hi = self.next_operand();
                    let lo = self.next_operand();
                    (u32::from(hi) << 16) | u32::from(lo)
                } else {
                    let a = self.addr_from_reg(src);
                    self.rdmem_l(Space::Data, a)
                }
            }
            _ => {
                let a = self.da_x_addr(src);
                self.rdmem_l(Space::Data, a)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Stack
    // -----------------------------------------------------------------------

    /// Stack pointer register number under the current mode.
    pub(crate) fn sp(&self) -> u8 {
        if self.segmented_mode() {
            14
        } else {
            15
        }
    }

    /// Push a word through pointer register `reg` (predecrement).
    pub(crate) fn push_w_reg(&mut self, reg: u8, value: u16) {
        if self.segmented_mode() {
            let v = Self::addr_sub(self.regs.l(reg), 2);
            self.regs.set_l(reg, v);
        } else {
            let v = self.regs.w(reg).wrapping_sub(2);
            self.regs.set_w(reg, v);
        }
        let addr = self.addr_from_reg(reg);
        self.wrmem_w(Space::Stack, addr, value);
    }

    /// Pop a word through pointer register `reg` (postincrement).
    pub(crate) fn pop_w_reg(&mut self, reg: u8) -> u16 {
        let addr = self.addr_from_reg(reg);
        let value = self.rdmem_w(Space::Stack, addr);
        if self.segmented_mode() {
            let v = Self::addr_add(self.regs.l(reg), 2);
            self.regs.set_l(reg, v);
        } else {
            let v = self.regs.w(reg).wrapping_add(2);
            self.regs.set_w(reg, v);
        }
        value
    }

    /// Push a long through pointer register `reg`.
    pub(crate) fn push_l_reg(&mut self, reg: u8, value: u32) {
        if self.segmented_mode() {
            let v = Self::addr_sub(self.regs.l(reg), 4);
            self.regs.set_l(reg, v);
        } else {
            let v = self.regs.w(reg).wrapping_sub(4);
            self.regs.set_w(reg, v);
        }
        let addr = self.addr_from_reg(reg);
        self.wrmem_l(Space::Stack, addr, value);
    }

    /// Pop a long through pointer register `reg`.
    pub(crate) fn pop_l_reg(&mut self, reg: u8) -> u32 {
        let addr = self.addr_from_reg(reg);
        let value = self.rdmem_l(Space::Stack, addr);
        if self.segmented_mode() {
            let v = Self::addr_add(self.regs.l(reg), 4);
            self.regs.set_l(reg, v);
        } else {
            let v = self.regs.w(reg).wrapping_add(4);
            self.regs.set_w(reg, v);
        }
        value
    }

    pub(crate) fn push_w(&mut self, value: u16) {
        let sp = self.sp();
        self.push_w_reg(sp, value);
    }

    pub(crate) fn pop_w(&mut self) -> u16 {
        let sp = self.sp();
        self.pop_w_reg(sp)
    }

    pub(crate) fn push_l(&mut self, value: u32) {
        let sp = self.sp();
        self.push_l_reg(sp, value);
    }

    pub(crate) fn pop_l(&mut self) -> u32 {
        let sp = self.sp();
        self.pop_l_reg(sp)
    }

    /// Push the PC: one word on the Z8002, a segmented long on the Z8001.
    pub(crate) fn push_pc(&mut self) {
        match self.variant {
            Variant::Z8002 => self.push_w(self.pc as u16),
            Variant::Z8001 => {
                let long = Self::make_segmented_addr(self.pc);
                self.push_l(long);
            }
        }
    }

    /// Pop a PC pushed by `push_pc`.
    pub(crate) fn pop_pc(&mut self) -> u32 {
        match self.variant {
            Variant::Z8002 => u32::from(self.pop_w()),
            Variant::Z8001 => {
                let long = self.pop_l();
                Self::segmented_addr(long)
            }
        }
    }

    // -----------------------------------------------------------------------
    // FCW and privilege
    // -----------------------------------------------------------------------

    /// Install a new FCW, swapping the stack pointer with the normal-mode
    /// shadow on a system/normal transition and re-latching any interrupt
    /// lines the new enables expose.
    pub(crate) fn change_fcw(&mut self, fcw: u16) {
        let mut fcw = fcw;
        if self.variant == Variant::Z8002 {
            fcw &= !F_SEG;
        }
        if (fcw ^ self.fcw) & F_S_N != 0 {
            let tmp = self.regs.w(15);
            self.regs.set_w(15, self.nsp_off);
            self.nsp_off = tmp;
            if self.variant == Variant::Z8001 {
                let tmp = self.regs.w(14);
                self.regs.set_w(14, self.nsp_seg);
                self.nsp_seg = tmp;
            }
        }
        self.fcw = fcw;
        if fcw & F_NVIE != 0 && self.irq_state[0] {
            self.irq_req |= Z8000_NVI;
        }
        if fcw & F_VIE != 0 && self.irq_state[1] {
            self.irq_req |= Z8000_VI;
        }
    }

    pub(crate) fn system_mode(&self) -> bool {
        self.fcw & F_S_N != 0
    }

    /// Latch the privileged-instruction trap; `op[0]` stays valid for the
    /// service routine.
    pub(crate) fn privileged_trap(&mut self) {
        self.irq_req |= Z8000_TRAP;
    }

    /// Charge extra cycles beyond the table's base cost.
    pub(crate) fn charge(&mut self, cycles: i32) {
        self.icount -= i64::from(cycles);
        self.total_cycles += i64::from(cycles);
    }

    // -----------------------------------------------------------------------
    // Interrupt / trap unit
    // -----------------------------------------------------------------------

    fn f_seg_variant(&self) -> u16 {
        match self.variant {
            Variant::Z8002 => 0,
            Variant::Z8001 => F_SEG,
        }
    }

    fn psa_addr(&self) -> u32 {
        match self.variant {
            Variant::Z8002 => u32::from(self.psap_off),
            Variant::Z8001 => {
                Self::segmented_addr((u32::from(self.psap_seg) << 16) | u32::from(self.psap_off))
            }
        }
    }

    fn vec_fcw(&mut self, vec: u32) -> u16 {
        let base = self.psa_addr() + vec * self.vector_mult();
        match self.variant {
            Variant::Z8002 => self.rdmem_w(Space::Program, base),
            Variant::Z8001 => self.rdmem_w(Space::Program, base + 2),
        }
    }

    fn vec_pc(&mut self, vec: u32) -> u32 {
        let base = self.psa_addr() + vec * self.vector_mult();
        match self.variant {
            Variant::Z8002 => u32::from(self.rdmem_w(Space::Program, base + 2)),
            Variant::Z8001 => {
                let long = self.rdmem_l(Space::Program, base + 4);
                Self::segmented_addr(long)
            }
        }
    }

    fn read_irq_vector(&mut self) -> u32 {
        let base = self.psa_addr() + VEC_00 * self.vector_mult() + 2 * u32::from(self.irq_vec & 0xff);
        match self.variant {
            Variant::Z8002 => u32::from(self.rdmem_w(Space::Program, base)),
            Variant::Z8001 => {
                let long = self.rdmem_l(Space::Program, base);
                Self::segmented_addr(long)
            }
        }
    }

    fn reset_pc(&mut self) -> u32 {
        match self.variant {
            Variant::Z8002 => u32::from(self.rdmem_w(Space::Program, 4)),
            Variant::Z8001 => {
                let long = self.rdmem_l(Space::Program, 4);
                Self::segmented_addr(long)
            }
        }
    }

    /// Enter the interrupt context for an internal trap or external
    /// interrupt: force system (and segmented) mode, push PC, FCW and the
    /// tag word.
    fn save_context(&mut self, fcw: u16, tag: u16) {
        self.change_fcw(fcw | F_S_N | self.f_seg_variant());
        self.push_pc();
        self.push_w(fcw);
        self.push_w(tag);
    }

    /// Service the highest-priority pending cause.
    fn interrupt(&mut self) {
        let fcw = self.fcw;

        if self.irq_req & Z8000_RESET != 0 {
            self.irq_req &= Z8000_NVI | Z8000_VI;
            let new_fcw = self.rdmem_w(Space::Program, 2);
            self.change_fcw(new_fcw);
            self.pc = self.reset_pc();
        } else if self.irq_req & Z8000_EPU != 0 {
            self.save_context(fcw, self.op[0] as u16);
            self.irq_req &= !Z8000_EPU;
            let f = self.vec_fcw(VEC_EPU);
            self.change_fcw(f);
            self.pc = self.vec_pc(VEC_EPU);
        } else if self.irq_req & Z8000_TRAP != 0 {
            self.save_context(fcw, self.op[0] as u16);
            self.irq_req &= !Z8000_TRAP;
            let f = self.vec_fcw(VEC_TRAP);
            self.change_fcw(f);
            self.pc = self.vec_pc(VEC_TRAP);
        } else if self.irq_req & Z8000_SYSCALL != 0 {
            self.save_context(fcw, self.op[0] as u16);
            self.irq_req &= !Z8000_SYSCALL;
            let f = self.vec_fcw(VEC_SYSCALL);
            self.change_fcw(f);
            self.pc = self.vec_pc(VEC_SYSCALL);
        } else if self.irq_req & Z8000_SEGTRAP != 0 {
            self.save_context(fcw, self.irq_vec);
            self.irq_req &= !Z8000_SEGTRAP;
            let f = self.vec_fcw(VEC_SEGTRAP);
            self.change_fcw(f);
            self.pc = self.vec_pc(VEC_SEGTRAP);
        } else if self.irq_req & Z8000_NMI != 0 {
            self.halt = false;
            self.save_context(fcw, self.irq_vec);
            self.irq_req &= !Z8000_NMI;
            let f = self.vec_fcw(VEC_NMI);
            self.change_fcw(f);
            self.pc = self.vec_pc(VEC_NMI);
        } else if self.irq_req & Z8000_NVI != 0 && fcw & F_NVIE != 0 {
            self.halt = false;
            self.save_context(fcw, self.irq_vec);
            self.pc = self.vec_pc(VEC_NVI);
            self.irq_req &= !Z8000_NVI;
            let f = self.vec_fcw(VEC_NVI);
            self.change_fcw(f);
        } else if self.irq_req & Z8000_VI != 0 && fcw & F_VIE != 0 {
            self.halt = false;
            self.save_context(fcw, self.irq_vec);
            self.pc = self.read_irq_vector();
            self.irq_req &= !Z8000_VI;
            let f = self.vec_fcw(VEC_VI);
            self.change_fcw(f);
        }
    }

    // -----------------------------------------------------------------------
    // Trace
    // -----------------------------------------------------------------------

    fn trace_instruction(&mut self) {
        let seg = self.segmented_mode();
        let pc = self.ppc;
        let prog = self.bus(Space::Program);
        let mut read = |addr: u32| prog.borrow_mut().read_word(addr);
        let (text, words) = disassemble(pc, seg, &mut read);

        let mut line = if seg && pc >> 16 != 0 {
            format!("<<{:X}>>{:04X}:", (pc >> 16) & 0x7f, pc & 0xffff)
        } else {
            format!("PC={:04X}:", pc & 0xffff)
        };
        for i in 0..words {
            line.push_str(&format!(" {:04X}", read(pc + 2 * i)));
        }
        for _ in words..3 {
            line.push_str("     ");
        }
        line.push_str("  ");
        line.push_str(&text);
        println!("{line}");
    }
}

impl Cpu for Z8000 {
    type Registers = Registers;

    fn pc(&self) -> u32 {
        self.pc
    }

    fn registers(&self) -> Registers {
        Registers {
            r: self.regs.words(),
            pc: self.pc,
            fcw: self.fcw,
            refresh: self.refresh,
            psap_seg: self.psap_seg,
            psap_off: self.psap_off,
            nsp_seg: self.nsp_seg,
            nsp_off: self.nsp_off,
        }
    }

    fn is_halted(&self) -> bool {
        self.halt
    }

    fn reset(&mut self) {
        Z8000::reset(self);
    }
}
