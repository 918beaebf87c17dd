//! Instruction execution for the Z8000.
//!
//! Handlers decode their addressing mode from bits 15..14 of the opcode
//! word, so one handler serves the register, indirect, immediate, direct
//! and indexed rows of the dispatch table. Operand words are pulled from
//! the program stream on first use.

#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use emu_core::IoMode;

use crate::dab::{DAB_C, DAB_DA, DAB_H, DAB_TABLE};
use crate::flags::{cc_true, F_C, F_DA, F_H, F_PV, F_S, F_Z, FLAGS_MASK, ZSP};

use super::{Space, Target, Z8000};

const CZSV: u16 = F_C | F_Z | F_S | F_PV;
const CZSVDH: u16 = F_C | F_Z | F_S | F_PV | F_DA | F_H;
const ZSV: u16 = F_Z | F_S | F_PV;
const ZS: u16 = F_Z | F_S;

impl Z8000 {
    // =========================================================================
    // Flag and ALU helpers
    // =========================================================================

    pub(super) fn set_flags(&mut self, clear: u16, set: u16) {
        self.fcw = (self.fcw & !clear) | set;
    }

    fn set_zsp_b(&mut self, v: u8) {
        self.set_flags(ZSV, ZSP[usize::from(v)]);
    }

    fn set_zs_w(&mut self, v: u16) {
        let mut f = 0;
        if v == 0 {
            f |= F_Z;
        }
        if v & 0x8000 != 0 {
            f |= F_S;
        }
        self.set_flags(ZS, f);
    }

    fn set_zs_l(&mut self, v: u32) {
        let mut f = 0;
        if v == 0 {
            f |= F_Z;
        }
        if v & 0x8000_0000 != 0 {
            f |= F_S;
        }
        self.set_flags(ZS, f);
    }

    fn alu_add_b(&mut self, d: u8, s: u8, carry_in: bool) -> u8 {
        let cin = u16::from(carry_in);
        let wide = u16::from(d) + u16::from(s) + cin;
        let r = wide as u8;
        let mut f = 0;
        if wide > 0xff {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x80 != 0 {
            f |= F_S;
        }
        if (!(d ^ s) & (d ^ r)) & 0x80 != 0 {
            f |= F_PV;
        }
        if (d & 0x0f) + (s & 0x0f) + cin as u8 > 0x0f {
            f |= F_H;
        }
        self.set_flags(CZSVDH, f);
        r
    }

    fn alu_sub_b(&mut self, d: u8, s: u8, borrow_in: bool) -> u8 {
        let bin = i16::from(borrow_in);
        let wide = i16::from(d) - i16::from(s) - bin;
        let r = wide as u8;
        let mut f = F_DA;
        if wide < 0 {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x80 != 0 {
            f |= F_S;
        }
        if ((d ^ s) & (d ^ r)) & 0x80 != 0 {
            f |= F_PV;
        }
        if i16::from(d & 0x0f) - i16::from(s & 0x0f) - bin < 0 {
            f |= F_H;
        }
        self.set_flags(CZSVDH, f);
        r
    }

    fn alu_add_w(&mut self, d: u16, s: u16, carry_in: bool) -> u16 {
        let wide = u32::from(d) + u32::from(s) + u32::from(carry_in);
        let r = wide as u16;
        let mut f = 0;
        if wide > 0xffff {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x8000 != 0 {
            f |= F_S;
        }
        if (!(d ^ s) & (d ^ r)) & 0x8000 != 0 {
            f |= F_PV;
        }
        self.set_flags(CZSV, f);
        r
    }

    fn alu_sub_w(&mut self, d: u16, s: u16, borrow_in: bool) -> u16 {
        let wide = i32::from(d) - i32::from(s) - i32::from(borrow_in);
        let r = wide as u16;
        let mut f = 0;
        if wide < 0 {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x8000 != 0 {
            f |= F_S;
        }
        if ((d ^ s) & (d ^ r)) & 0x8000 != 0 {
            f |= F_PV;
        }
        self.set_flags(CZSV, f);
        r
    }

    fn alu_add_l(&mut self, d: u32, s: u32) -> u32 {
        let wide = u64::from(d) + u64::from(s);
        let r = wide as u32;
        let mut f = 0;
        if wide > 0xffff_ffff {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x8000_0000 != 0 {
            f |= F_S;
        }
        if (!(d ^ s) & (d ^ r)) & 0x8000_0000 != 0 {
            f |= F_PV;
        }
        self.set_flags(CZSV, f);
        r
    }

    fn alu_sub_l(&mut self, d: u32, s: u32) -> u32 {
        let wide = i64::from(d) - i64::from(s);
        let r = wide as u32;
        let mut f = 0;
        if wide < 0 {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x8000_0000 != 0 {
            f |= F_S;
        }
        if ((d ^ s) & (d ^ r)) & 0x8000_0000 != 0 {
            f |= F_PV;
        }
        self.set_flags(CZSV, f);
        r
    }

    fn alu_inc_b(&mut self, d: u8, n: u8) -> u8 {
        let r = d.wrapping_add(n);
        let mut f = 0;
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x80 != 0 {
            f |= F_S;
        }
        if (!(d ^ n) & (d ^ r)) & 0x80 != 0 {
            f |= F_PV;
        }
        self.set_flags(ZSV, f);
        r
    }

    fn alu_dec_b(&mut self, d: u8, n: u8) -> u8 {
        let r = d.wrapping_sub(n);
        let mut f = 0;
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x80 != 0 {
            f |= F_S;
        }
        if ((d ^ n) & (d ^ r)) & 0x80 != 0 {
            f |= F_PV;
        }
        self.set_flags(ZSV, f);
        r
    }

    fn alu_inc_w(&mut self, d: u16, n: u16) -> u16 {
        let r = d.wrapping_add(n);
        let mut f = 0;
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x8000 != 0 {
            f |= F_S;
        }
        if (!(d ^ n) & (d ^ r)) & 0x8000 != 0 {
            f |= F_PV;
        }
        self.set_flags(ZSV, f);
        r
    }

    fn alu_dec_w(&mut self, d: u16, n: u16) -> u16 {
        let r = d.wrapping_sub(n);
        let mut f = 0;
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x8000 != 0 {
            f |= F_S;
        }
        if ((d ^ n) & (d ^ r)) & 0x8000 != 0 {
            f |= F_PV;
        }
        self.set_flags(ZSV, f);
        r
    }

    fn check_privileged(&mut self) -> bool {
        if self.system_mode() {
            true
        } else {
            self.privileged_trap();
            false
        }
    }

    fn advance_reg_ptr(&mut self, reg: u8, delta: i32) {
        if self.segmented_mode() {
            let v = if delta >= 0 {
                Self::addr_add(self.regs.l(reg), delta as u32)
            } else {
                Self::addr_sub(self.regs.l(reg), (-delta) as u32)
            };
            self.regs.set_l(reg, v);
        } else {
            let v = (i32::from(self.regs.w(reg)) + delta) as u16;
            self.regs.set_w(reg, v);
        }
    }

    /// Decrement a string counter register; true when it reaches zero.
    fn dec_counter(&mut self, reg: u8) -> bool {
        let v = self.regs.w(reg).wrapping_sub(1);
        self.regs.set_w(reg, v);
        v == 0
    }

    /// Rewind the PC over a two-word block instruction so the repeat form
    /// refetches at the next instruction boundary.
    fn rewind_block(&mut self) {
        self.pc = Self::addr_sub(self.pc, 4);
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    pub(crate) fn add_b(&mut self) {
        let s = self.src_value_b();
        let d = self.dst_field();
        let r = self.alu_add_b(self.rb(d), s, false);
        self.set_rb(d, r);
    }

    pub(crate) fn add_w(&mut self) {
        let s = self.src_value_w();
        let d = self.dst_field();
        let r = self.alu_add_w(self.regs.w(d), s, false);
        self.regs.set_w(d, r);
    }

    pub(crate) fn add_l(&mut self) {
        let s = self.src_value_l();
        let d = self.dst_field() & 14;
        let r = self.alu_add_l(self.regs.l(d), s);
        self.regs.set_l(d, r);
    }

    pub(crate) fn adc_b(&mut self) {
        let carry = self.fcw & F_C != 0;
        let s = self.src_value_b();
        let d = self.dst_field();
        let r = self.alu_add_b(self.rb(d), s, carry);
        self.set_rb(d, r);
    }

    pub(crate) fn adc_w(&mut self) {
        let carry = self.fcw & F_C != 0;
        let s = self.src_value_w();
        let d = self.dst_field();
        let r = self.alu_add_w(self.regs.w(d), s, carry);
        self.regs.set_w(d, r);
    }

    pub(crate) fn sub_b(&mut self) {
        let s = self.src_value_b();
        let d = self.dst_field();
        let r = self.alu_sub_b(self.rb(d), s, false);
        self.set_rb(d, r);
    }

    pub(crate) fn sub_w(&mut self) {
        let s = self.src_value_w();
        let d = self.dst_field();
        let r = self.alu_sub_w(self.regs.w(d), s, false);
        self.regs.set_w(d, r);
    }

    pub(crate) fn sub_l(&mut self) {
        let s = self.src_value_l();
        let d = self.dst_field() & 14;
        let r = self.alu_sub_l(self.regs.l(d), s);
        self.regs.set_l(d, r);
    }

    pub(crate) fn sbc_b(&mut self) {
        let borrow = self.fcw & F_C != 0;
        let s = self.src_value_b();
        let d = self.dst_field();
        let r = self.alu_sub_b(self.rb(d), s, borrow);
        self.set_rb(d, r);
    }

    pub(crate) fn sbc_w(&mut self) {
        let borrow = self.fcw & F_C != 0;
        let s = self.src_value_w();
        let d = self.dst_field();
        let r = self.alu_sub_w(self.regs.w(d), s, borrow);
        self.regs.set_w(d, r);
    }

    pub(crate) fn cp_b(&mut self) {
        let s = self.src_value_b();
        let d = self.dst_field();
        self.alu_sub_b(self.rb(d), s, false);
    }

    pub(crate) fn cp_w(&mut self) {
        let s = self.src_value_w();
        let d = self.dst_field();
        self.alu_sub_w(self.regs.w(d), s, false);
    }

    pub(crate) fn cp_l(&mut self) {
        let s = self.src_value_l();
        let d = self.dst_field() & 14;
        self.alu_sub_l(self.regs.l(d), s);
    }

    pub(crate) fn mult_w(&mut self) {
        let s = self.src_value_w();
        let d = self.dst_field() & 14;
        let product = i32::from(self.regs.w(d + 1) as i16) * i32::from(s as i16);
        self.regs.set_l(d, product as u32);
        let mut f = 0;
        if !(-0x8000..0x8000).contains(&product) {
            f |= F_C;
        }
        if product == 0 {
            f |= F_Z;
        }
        if product < 0 {
            f |= F_S;
        }
        self.set_flags(CZSV, f);
        self.charge(60);
    }

    pub(crate) fn mult_l(&mut self) {
        let s = self.src_value_l();
        let d = self.dst_field() & 12;
        let product = i64::from(self.regs.l(d + 2) as i32) * i64::from(s as i32);
        self.regs.set_q(d, product as u64);
        let mut f = 0;
        if !(-0x8000_0000_i64..0x8000_0000).contains(&product) {
            f |= F_C;
        }
        if product == 0 {
            f |= F_Z;
        }
        if product < 0 {
            f |= F_S;
        }
        self.set_flags(CZSV, f);
        self.charge(270);
    }

    pub(crate) fn div_w(&mut self) {
        let s = self.src_value_w();
        let d = self.dst_field() & 14;
        let dividend = self.regs.l(d) as i32;
        let divisor = i32::from(s as i16);
        if divisor == 0 {
            self.set_flags(CZSV, F_Z | F_PV);
        } else {
            let quotient = dividend / divisor;
            let remainder = dividend % divisor;
            if !(-0x8000..0x8000).contains(&quotient) {
                self.set_flags(CZSV, F_PV);
            } else {
                self.regs.set_w(d, remainder as u16);
                self.regs.set_w(d + 1, quotient as u16);
                let mut f = 0;
                if quotient == 0 {
                    f |= F_Z;
                }
                if quotient < 0 {
                    f |= F_S;
                }
                self.set_flags(CZSV, f);
            }
        }
        self.charge(90);
    }

    pub(crate) fn div_l(&mut self) {
        let s = self.src_value_l();
        let d = self.dst_field() & 12;
        let dividend = self.regs.q(d) as i64;
        let divisor = i64::from(s as i32);
        if divisor == 0 {
            self.set_flags(CZSV, F_Z | F_PV);
        } else {
            let quotient = dividend / divisor;
            let remainder = dividend % divisor;
            if !(-0x8000_0000_i64..0x8000_0000).contains(&quotient) {
                self.set_flags(CZSV, F_PV);
            } else {
                self.regs.set_l(d, remainder as u32);
                self.regs.set_l(d + 2, quotient as u32);
                let mut f = 0;
                if quotient == 0 {
                    f |= F_Z;
                }
                if quotient < 0 {
                    f |= F_S;
                }
                self.set_flags(CZSV, f);
            }
        }
        self.charge(720);
    }

    pub(crate) fn inc_b(&mut self) {
        let n = self.dst_field() + 1;
        let t = self.dst_target();
        let v = self.read_t_b(t);
        let r = self.alu_inc_b(v, n);
        self.write_t_b(t, r);
    }

    pub(crate) fn inc_w(&mut self) {
        let n = u16::from(self.dst_field()) + 1;
        let t = self.dst_target();
        let v = self.read_t_w(t);
        let r = self.alu_inc_w(v, n);
        self.write_t_w(t, r);
    }

    pub(crate) fn dec_b(&mut self) {
        let n = self.dst_field() + 1;
        let t = self.dst_target();
        let v = self.read_t_b(t);
        let r = self.alu_dec_b(v, n);
        self.write_t_b(t, r);
    }

    pub(crate) fn dec_w(&mut self) {
        let n = u16::from(self.dst_field()) + 1;
        let t = self.dst_target();
        let v = self.read_t_w(t);
        let r = self.alu_dec_w(v, n);
        self.write_t_w(t, r);
    }

    pub(crate) fn neg_b(&mut self) {
        let t = self.dst_target();
        let v = self.read_t_b(t);
        let r = v.wrapping_neg();
        let mut f = F_DA;
        if v != 0 {
            f |= F_C;
        }
        if v == 0x80 {
            f |= F_PV;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x80 != 0 {
            f |= F_S;
        }
        self.set_flags(CZSVDH, f | if v & 0x0f != 0 { F_H } else { 0 });
        self.write_t_b(t, r);
    }

    pub(crate) fn neg_w(&mut self) {
        let t = self.dst_target();
        let v = self.read_t_w(t);
        let r = v.wrapping_neg();
        let mut f = 0;
        if v != 0 {
            f |= F_C;
        }
        if v == 0x8000 {
            f |= F_PV;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x8000 != 0 {
            f |= F_S;
        }
        self.set_flags(CZSV, f);
        self.write_t_w(t, r);
    }

    pub(crate) fn exts_b(&mut self) {
        let d = self.src_field();
        let w = self.regs.w(d);
        let ext = if w & 0x80 != 0 { 0xff00 } else { 0 };
        self.regs.set_w(d, ext | (w & 0xff));
    }

    pub(crate) fn exts_w(&mut self) {
        let d = self.src_field() & 14;
        let ext = if self.regs.w(d + 1) & 0x8000 != 0 { 0xffff } else { 0 };
        self.regs.set_w(d, ext);
    }

    pub(crate) fn exts_l(&mut self) {
        let d = self.src_field() & 12;
        let ext = if self.regs.l(d + 2) & 0x8000_0000 != 0 {
            0xffff_ffff
        } else {
            0
        };
        self.regs.set_l(d, ext);
    }

    pub(crate) fn dab(&mut self) {
        let d = self.src_field();
        let mut idx = usize::from(self.rb(d));
        if self.fcw & F_C != 0 {
            idx |= DAB_C;
        }
        if self.fcw & F_H != 0 {
            idx |= DAB_H;
        }
        if self.fcw & F_DA != 0 {
            idx |= DAB_DA;
        }
        let (r, carry) = DAB_TABLE[idx];
        self.set_rb(d, r);
        let mut f = 0;
        if carry {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x80 != 0 {
            f |= F_S;
        }
        self.set_flags(F_C | F_Z | F_S, f);
    }

    pub(crate) fn rrdb(&mut self) {
        let a = self.src_field();
        let b = self.dst_field();
        let va = self.rb(a);
        let vb = self.rb(b);
        let new_a = ((vb & 0x0f) << 4) | (va >> 4);
        let new_b = (vb & 0xf0) | (va & 0x0f);
        self.set_rb(a, new_a);
        self.set_rb(b, new_b);
        self.set_flags(F_Z, if new_b == 0 { F_Z } else { 0 });
    }

    pub(crate) fn rldb(&mut self) {
        let a = self.src_field();
        let b = self.dst_field();
        let va = self.rb(a);
        let vb = self.rb(b);
        let new_a = (va << 4) | (vb & 0x0f);
        let new_b = (vb & 0xf0) | (va >> 4);
        self.set_rb(a, new_a);
        self.set_rb(b, new_b);
        self.set_flags(F_Z, if new_b == 0 { F_Z } else { 0 });
    }

    // =========================================================================
    // Logical
    // =========================================================================

    pub(crate) fn and_b(&mut self) {
        let s = self.src_value_b();
        let d = self.dst_field();
        let r = self.rb(d) & s;
        self.set_rb(d, r);
        self.set_zsp_b(r);
    }

    pub(crate) fn and_w(&mut self) {
        let s = self.src_value_w();
        let d = self.dst_field();
        let r = self.regs.w(d) & s;
        self.regs.set_w(d, r);
        self.set_zs_w(r);
    }

    pub(crate) fn or_b(&mut self) {
        let s = self.src_value_b();
        let d = self.dst_field();
        let r = self.rb(d) | s;
        self.set_rb(d, r);
        self.set_zsp_b(r);
    }

    pub(crate) fn or_w(&mut self) {
        let s = self.src_value_w();
        let d = self.dst_field();
        let r = self.regs.w(d) | s;
        self.regs.set_w(d, r);
        self.set_zs_w(r);
    }

    pub(crate) fn xor_b(&mut self) {
        let s = self.src_value_b();
        let d = self.dst_field();
        let r = self.rb(d) ^ s;
        self.set_rb(d, r);
        self.set_zsp_b(r);
    }

    pub(crate) fn xor_w(&mut self) {
        let s = self.src_value_w();
        let d = self.dst_field();
        let r = self.regs.w(d) ^ s;
        self.regs.set_w(d, r);
        self.set_zs_w(r);
    }

    pub(crate) fn com_b(&mut self) {
        let t = self.dst_target();
        let r = !self.read_t_b(t);
        self.write_t_b(t, r);
        self.set_zsp_b(r);
    }

    pub(crate) fn com_w(&mut self) {
        let t = self.dst_target();
        let r = !self.read_t_w(t);
        self.write_t_w(t, r);
        self.set_zs_w(r);
    }

    pub(crate) fn test_b(&mut self) {
        let t = self.dst_target();
        let v = self.read_t_b(t);
        self.set_zsp_b(v);
    }

    pub(crate) fn test_w(&mut self) {
        let t = self.dst_target();
        let v = self.read_t_w(t);
        self.set_zs_w(v);
    }

    pub(crate) fn test_l(&mut self) {
        let t = self.dst_target();
        let v = self.read_t_l(t);
        self.set_zs_l(v);
    }

    pub(crate) fn tset_b(&mut self) {
        let t = self.dst_target();
        let v = self.read_t_b(t);
        self.set_flags(F_S, if v & 0x80 != 0 { F_S } else { 0 });
        self.write_t_b(t, 0xff);
    }

    pub(crate) fn tset_w(&mut self) {
        let t = self.dst_target();
        let v = self.read_t_w(t);
        self.set_flags(F_S, if v & 0x8000 != 0 { F_S } else { 0 });
        self.write_t_w(t, 0xffff);
    }

    pub(crate) fn clr_b(&mut self) {
        let t = self.dst_target();
        self.write_t_b(t, 0);
    }

    pub(crate) fn clr_w(&mut self) {
        let t = self.dst_target();
        self.write_t_w(t, 0);
    }

    /// CPB dst,#imm8 from the single-operand groups.
    pub(crate) fn cp_t_b(&mut self) {
        let t = self.dst_target();
        let imm = self.next_operand() as u8;
        let v = self.read_t_b(t);
        self.alu_sub_b(v, imm, false);
    }

    /// CP dst,#imm16 from the single-operand groups.
    pub(crate) fn cp_t_w(&mut self) {
        let t = self.dst_target();
        let imm = self.next_operand();
        let v = self.read_t_w(t);
        self.alu_sub_w(v, imm, false);
    }

    /// LDB dst,#imm8 from the single-operand groups.
    pub(crate) fn ld_t_b(&mut self) {
        let t = self.dst_target();
        let imm = self.next_operand() as u8;
        self.write_t_b(t, imm);
    }

    /// LD dst,#imm16 from the single-operand groups.
    pub(crate) fn ld_t_w(&mut self) {
        let t = self.dst_target();
        let imm = self.next_operand();
        self.write_t_w(t, imm);
    }

    // =========================================================================
    // Bit operations
    // =========================================================================

    pub(crate) fn bit_b(&mut self) {
        let bit = self.dst_field() & 7;
        let t = self.dst_target();
        let v = self.read_t_b(t);
        self.set_flags(F_Z, if v & (1 << bit) == 0 { F_Z } else { 0 });
    }

    pub(crate) fn bit_w(&mut self) {
        let bit = self.dst_field();
        let t = self.dst_target();
        let v = self.read_t_w(t);
        self.set_flags(F_Z, if v & (1 << bit) == 0 { F_Z } else { 0 });
    }

    pub(crate) fn res_b(&mut self) {
        let bit = self.dst_field() & 7;
        let t = self.dst_target();
        let v = self.read_t_b(t);
        self.write_t_b(t, v & !(1 << bit));
    }

    pub(crate) fn res_w(&mut self) {
        let bit = self.dst_field();
        let t = self.dst_target();
        let v = self.read_t_w(t);
        self.write_t_w(t, v & !(1u16 << bit));
    }

    pub(crate) fn set_b(&mut self) {
        let bit = self.dst_field() & 7;
        let t = self.dst_target();
        let v = self.read_t_b(t);
        self.write_t_b(t, v | (1 << bit));
    }

    pub(crate) fn set_w(&mut self) {
        let bit = self.dst_field();
        let t = self.dst_target();
        let v = self.read_t_w(t);
        self.write_t_w(t, v | (1u16 << bit));
    }

    pub(crate) fn bit_b_dyn(&mut self) {
        let bit = self.regs.w(self.dst_field()) & 7;
        let w2 = self.next_operand();
        let d = ((w2 >> 8) & 15) as u8;
        let v = self.rb(d);
        self.set_flags(F_Z, if v & (1 << bit) == 0 { F_Z } else { 0 });
    }

    pub(crate) fn bit_w_dyn(&mut self) {
        let bit = self.regs.w(self.dst_field()) & 15;
        let w2 = self.next_operand();
        let d = ((w2 >> 8) & 15) as u8;
        let v = self.regs.w(d);
        self.set_flags(F_Z, if v & (1 << bit) == 0 { F_Z } else { 0 });
    }

    pub(crate) fn res_b_dyn(&mut self) {
        let bit = self.regs.w(self.dst_field()) & 7;
        let w2 = self.next_operand();
        let d = ((w2 >> 8) & 15) as u8;
        let v = self.rb(d);
        self.set_rb(d, v & !(1 << bit));
    }

    pub(crate) fn res_w_dyn(&mut self) {
        let bit = self.regs.w(self.dst_field()) & 15;
        let w2 = self.next_operand();
        let d = ((w2 >> 8) & 15) as u8;
        let v = self.regs.w(d);
        self.regs.set_w(d, v & !(1u16 << bit));
    }

    pub(crate) fn set_b_dyn(&mut self) {
        let bit = self.regs.w(self.dst_field()) & 7;
        let w2 = self.next_operand();
        let d = ((w2 >> 8) & 15) as u8;
        let v = self.rb(d);
        self.set_rb(d, v | (1 << bit));
    }

    pub(crate) fn set_w_dyn(&mut self) {
        let bit = self.regs.w(self.dst_field()) & 15;
        let w2 = self.next_operand();
        let d = ((w2 >> 8) & 15) as u8;
        let v = self.regs.w(d);
        self.regs.set_w(d, v | (1u16 << bit));
    }

    pub(crate) fn tcc_b(&mut self) {
        let cc = self.dst_field();
        let d = self.src_field();
        if cc_true(self.fcw, cc) {
            let v = self.rb(d);
            self.set_rb(d, v | 1);
        }
    }

    pub(crate) fn tcc_w(&mut self) {
        let cc = self.dst_field();
        let d = self.src_field();
        if cc_true(self.fcw, cc) {
            let v = self.regs.w(d);
            self.regs.set_w(d, v | 1);
        }
    }

    // =========================================================================
    // Shifts and rotates
    // =========================================================================

    fn rotate_flags_b(&mut self, r: u8, old: u8, carry: bool) {
        let mut f = 0;
        if carry {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x80 != 0 {
            f |= F_S;
        }
        if (r ^ old) & 0x80 != 0 {
            f |= F_PV;
        }
        self.set_flags(CZSV, f);
    }

    fn rotate_flags_w(&mut self, r: u16, old: u16, carry: bool) {
        let mut f = 0;
        if carry {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x8000 != 0 {
            f |= F_S;
        }
        if (r ^ old) & 0x8000 != 0 {
            f |= F_PV;
        }
        self.set_flags(CZSV, f);
    }

    fn rotate_count(&self) -> u32 {
        1 + u32::from((self.op0() >> 1) & 1)
    }

    pub(crate) fn rl_b(&mut self) {
        let d = self.src_field();
        let mut v = self.rb(d);
        let old = v;
        let mut carry = false;
        for _ in 0..self.rotate_count() {
            carry = v & 0x80 != 0;
            v = (v << 1) | u8::from(carry);
        }
        self.set_rb(d, v);
        self.rotate_flags_b(v, old, carry);
    }

    pub(crate) fn rl_w(&mut self) {
        let d = self.src_field();
        let mut v = self.regs.w(d);
        let old = v;
        let mut carry = false;
        for _ in 0..self.rotate_count() {
            carry = v & 0x8000 != 0;
            v = (v << 1) | u16::from(carry);
        }
        self.regs.set_w(d, v);
        self.rotate_flags_w(v, old, carry);
    }

    pub(crate) fn rlc_b(&mut self) {
        let d = self.src_field();
        let mut v = self.rb(d);
        let old = v;
        let mut carry = self.fcw & F_C != 0;
        for _ in 0..self.rotate_count() {
            let out = v & 0x80 != 0;
            v = (v << 1) | u8::from(carry);
            carry = out;
        }
        self.set_rb(d, v);
        self.rotate_flags_b(v, old, carry);
    }

    pub(crate) fn rlc_w(&mut self) {
        let d = self.src_field();
        let mut v = self.regs.w(d);
        let old = v;
        let mut carry = self.fcw & F_C != 0;
        for _ in 0..self.rotate_count() {
            let out = v & 0x8000 != 0;
            v = (v << 1) | u16::from(carry);
            carry = out;
        }
        self.regs.set_w(d, v);
        self.rotate_flags_w(v, old, carry);
    }

    pub(crate) fn rr_b(&mut self) {
        let d = self.src_field();
        let mut v = self.rb(d);
        let old = v;
        let mut carry = false;
        for _ in 0..self.rotate_count() {
            carry = v & 1 != 0;
            v = (v >> 1) | (u8::from(carry) << 7);
        }
        self.set_rb(d, v);
        self.rotate_flags_b(v, old, carry);
    }

    pub(crate) fn rr_w(&mut self) {
        let d = self.src_field();
        let mut v = self.regs.w(d);
        let old = v;
        let mut carry = false;
        for _ in 0..self.rotate_count() {
            carry = v & 1 != 0;
            v = (v >> 1) | (u16::from(carry) << 15);
        }
        self.regs.set_w(d, v);
        self.rotate_flags_w(v, old, carry);
    }

    pub(crate) fn rrc_b(&mut self) {
        let d = self.src_field();
        let mut v = self.rb(d);
        let old = v;
        let mut carry = self.fcw & F_C != 0;
        for _ in 0..self.rotate_count() {
            let out = v & 1 != 0;
            v = (v >> 1) | (u8::from(carry) << 7);
            carry = out;
        }
        self.set_rb(d, v);
        self.rotate_flags_b(v, old, carry);
    }

    pub(crate) fn rrc_w(&mut self) {
        let d = self.src_field();
        let mut v = self.regs.w(d);
        let old = v;
        let mut carry = self.fcw & F_C != 0;
        for _ in 0..self.rotate_count() {
            let out = v & 1 != 0;
            v = (v >> 1) | (u16::from(carry) << 15);
            carry = out;
        }
        self.regs.set_w(d, v);
        self.rotate_flags_w(v, old, carry);
    }

    /// Shift a value left (positive count) or right (negative), logical or
    /// arithmetic, tracking the last bit shifted out and any sign change.
    fn shift(value: u32, width: u32, count: i32, arithmetic: bool) -> (u32, bool, bool) {
        let sign_bit = 1u32 << (width - 1);
        let mask = if width == 32 { u32::MAX } else { (1u32 << width) - 1 };
        let mut v = value & mask;
        let mut carry = false;
        let mut overflow = false;
        let sign0 = v & sign_bit;
        if count >= 0 {
            for _ in 0..count.min(64) {
                carry = v & sign_bit != 0;
                v = (v << 1) & mask;
                if v & sign_bit != sign0 {
                    overflow = true;
                }
            }
        } else {
            for _ in 0..(-count).min(64) {
                carry = v & 1 != 0;
                let fill = if arithmetic { v & sign_bit } else { 0 };
                v = (v >> 1) | fill;
            }
        }
        (v, carry, overflow)
    }

    fn shift_result_b(&mut self, d: u8, count: i32, arithmetic: bool) {
        let (r, carry, overflow) = Self::shift(u32::from(self.rb(d)), 8, count, arithmetic);
        let r = r as u8;
        self.set_rb(d, r);
        let mut f = 0;
        if carry {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x80 != 0 {
            f |= F_S;
        }
        if arithmetic && overflow {
            f |= F_PV;
        }
        self.set_flags(CZSV, f);
        self.charge(3 * count.unsigned_abs().min(64) as i32);
    }

    fn shift_result_w(&mut self, d: u8, count: i32, arithmetic: bool) {
        let (r, carry, overflow) = Self::shift(u32::from(self.regs.w(d)), 16, count, arithmetic);
        let r = r as u16;
        self.regs.set_w(d, r);
        let mut f = 0;
        if carry {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x8000 != 0 {
            f |= F_S;
        }
        if arithmetic && overflow {
            f |= F_PV;
        }
        self.set_flags(CZSV, f);
        self.charge(3 * count.unsigned_abs().min(64) as i32);
    }

    fn shift_result_l(&mut self, d: u8, count: i32, arithmetic: bool) {
        let d = d & 14;
        let (r, carry, overflow) = Self::shift(self.regs.l(d), 32, count, arithmetic);
        self.regs.set_l(d, r);
        let mut f = 0;
        if carry {
            f |= F_C;
        }
        if r == 0 {
            f |= F_Z;
        }
        if r & 0x8000_0000 != 0 {
            f |= F_S;
        }
        if arithmetic && overflow {
            f |= F_PV;
        }
        self.set_flags(CZSV, f);
        self.charge(3 * count.unsigned_abs().min(64) as i32);
    }

    pub(crate) fn sll_b(&mut self) {
        let d = self.src_field();
        let count = i32::from(self.next_operand() as i16);
        self.shift_result_b(d, count, false);
    }

    pub(crate) fn sll_w(&mut self) {
        let d = self.src_field();
        let count = i32::from(self.next_operand() as i16);
        self.shift_result_w(d, count, false);
    }

    pub(crate) fn sll_l(&mut self) {
        let d = self.src_field();
        let count = i32::from(self.next_operand() as i16);
        self.shift_result_l(d, count, false);
    }

    pub(crate) fn sla_b(&mut self) {
        let d = self.src_field();
        let count = i32::from(self.next_operand() as i16);
        self.shift_result_b(d, count, true);
    }

    pub(crate) fn sla_w(&mut self) {
        let d = self.src_field();
        let count = i32::from(self.next_operand() as i16);
        self.shift_result_w(d, count, true);
    }

    pub(crate) fn sla_l(&mut self) {
        let d = self.src_field();
        let count = i32::from(self.next_operand() as i16);
        self.shift_result_l(d, count, true);
    }

    pub(crate) fn sdl_b(&mut self) {
        let d = self.src_field();
        let w2 = self.next_operand();
        let count = i32::from(self.regs.w(((w2 >> 8) & 15) as u8) as i16);
        self.shift_result_b(d, count, false);
    }

    pub(crate) fn sdl_w(&mut self) {
        let d = self.src_field();
        let w2 = self.next_operand();
        let count = i32::from(self.regs.w(((w2 >> 8) & 15) as u8) as i16);
        self.shift_result_w(d, count, false);
    }

    pub(crate) fn sdl_l(&mut self) {
        let d = self.src_field();
        let w2 = self.next_operand();
        let count = i32::from(self.regs.w(((w2 >> 8) & 15) as u8) as i16);
        self.shift_result_l(d, count, false);
    }

    pub(crate) fn sda_b(&mut self) {
        let d = self.src_field();
        let w2 = self.next_operand();
        let count = i32::from(self.regs.w(((w2 >> 8) & 15) as u8) as i16);
        self.shift_result_b(d, count, true);
    }

    pub(crate) fn sda_w(&mut self) {
        let d = self.src_field();
        let w2 = self.next_operand();
        let count = i32::from(self.regs.w(((w2 >> 8) & 15) as u8) as i16);
        self.shift_result_w(d, count, true);
    }

    pub(crate) fn sda_l(&mut self) {
        let d = self.src_field();
        let w2 = self.next_operand();
        let count = i32::from(self.regs.w(((w2 >> 8) & 15) as u8) as i16);
        self.shift_result_l(d, count, true);
    }

    // =========================================================================
    // Data movement
    // =========================================================================

    pub(crate) fn ld_b(&mut self) {
        let v = self.src_value_b();
        let d = self.dst_field();
        self.set_rb(d, v);
    }

    pub(crate) fn ld_w(&mut self) {
        let v = self.src_value_w();
        let d = self.dst_field();
        self.regs.set_w(d, v);
    }

    pub(crate) fn ld_l(&mut self) {
        let v = self.src_value_l();
        let d = self.dst_field() & 14;
        self.regs.set_l(d, v);
    }

    /// Short-form LDB rbd,#imm8 (opcodes 0xC000..0xCFFF).
    pub(crate) fn ldb_short(&mut self) {
        let d = self.nib(0, 1);
        let v = self.op0() as u8;
        self.set_rb(d, v);
    }

    pub(crate) fn st_b(&mut self) {
        let t = self.dst_target();
        let v = self.rb(self.dst_field());
        self.write_t_b(t, v);
    }

    pub(crate) fn st_w(&mut self) {
        let t = self.dst_target();
        let v = self.regs.w(self.dst_field());
        self.write_t_w(t, v);
    }

    pub(crate) fn st_l(&mut self) {
        let t = self.dst_target();
        let v = self.regs.l(self.dst_field() & 14);
        self.write_t_l(t, v);
    }

    /// Base-displacement address, or PC-relative when the base field is 0.
    fn ba_addr(&mut self) -> u32 {
        let base = self.src_field();
        let disp = u32::from(self.next_operand());
        if base == 0 {
            Self::addr_add(self.pc, disp)
        } else {
            Self::addr_add(self.addr_from_reg(base), disp)
        }
    }

    /// Base-index address from the second operand word.
    fn bx_addr(&mut self) -> u32 {
        let base = self.src_field();
        let w2 = self.next_operand();
        let idx = ((w2 >> 8) & 15) as u8;
        Self::addr_add(self.addr_from_reg(base), u32::from(self.regs.w(idx)))
    }

    pub(crate) fn ld_ba_b(&mut self) {
        let d = self.dst_field();
        let a = self.ba_addr();
        let v = self.rdmem_b(Space::Data, a);
        self.set_rb(d, v);
    }

    pub(crate) fn ld_ba_w(&mut self) {
        let d = self.dst_field();
        let a = self.ba_addr();
        let v = self.rdmem_w(Space::Data, a);
        self.regs.set_w(d, v);
    }

    pub(crate) fn ld_ba_l(&mut self) {
        let d = self.dst_field() & 14;
        let a = self.ba_addr();
        let v = self.rdmem_l(Space::Data, a);
        self.regs.set_l(d, v);
    }

    pub(crate) fn st_ba_b(&mut self) {
        let a = self.ba_addr();
        let v = self.rb(self.dst_field());
        self.wrmem_b(Space::Data, a, v);
    }

    pub(crate) fn st_ba_w(&mut self) {
        let a = self.ba_addr();
        let v = self.regs.w(self.dst_field());
        self.wrmem_w(Space::Data, a, v);
    }

    pub(crate) fn st_ba_l(&mut self) {
        let a = self.ba_addr();
        let v = self.regs.l(self.dst_field() & 14);
        self.wrmem_l(Space::Data, a, v);
    }

    pub(crate) fn ld_bx_b(&mut self) {
        let d = self.dst_field();
        let a = self.bx_addr();
        let v = self.rdmem_b(Space::Data, a);
        self.set_rb(d, v);
    }

    pub(crate) fn ld_bx_w(&mut self) {
        let d = self.dst_field();
        let a = self.bx_addr();
        let v = self.rdmem_w(Space::Data, a);
        self.regs.set_w(d, v);
    }

    pub(crate) fn ld_bx_l(&mut self) {
        let d = self.dst_field() & 14;
        let a = self.bx_addr();
        let v = self.rdmem_l(Space::Data, a);
        self.regs.set_l(d, v);
    }

    pub(crate) fn st_bx_b(&mut self) {
        let a = self.bx_addr();
        let v = self.rb(self.dst_field());
        self.wrmem_b(Space::Data, a, v);
    }

    pub(crate) fn st_bx_w(&mut self) {
        let a = self.bx_addr();
        let v = self.regs.w(self.dst_field());
        self.wrmem_w(Space::Data, a, v);
    }

    pub(crate) fn st_bx_l(&mut self) {
        let a = self.bx_addr();
        let v = self.regs.l(self.dst_field() & 14);
        self.wrmem_l(Space::Data, a, v);
    }

    pub(crate) fn lda(&mut self) {
        let d = self.dst_field();
        let src = self.src_field();
        let mut addr = self.next_raw_addr_operand();
        if src != 0 {
            addr = Self::addr_add(addr, u32::from(self.regs.w(src)));
        }
        if self.segmented_mode() {
            self.regs.set_l(d & 14, addr);
        } else {
            self.regs.set_w(d, addr as u16);
        }
    }

    /// LDA rd,rs(#disp16), or LDAR rd,disp16 when the base field is 0.
    pub(crate) fn lda_ba(&mut self) {
        let d = self.dst_field();
        let src = self.src_field();
        let disp = u32::from(self.next_operand());
        if self.segmented_mode() {
            let addr = if src == 0 {
                Self::make_segmented_addr(Self::addr_add(self.pc, disp))
            } else {
                Self::addr_add(self.regs.l(src), disp)
            };
            self.regs.set_l(d & 14, addr);
        } else {
            let base = if src == 0 {
                self.pc as u16
            } else {
                self.regs.w(src)
            };
            self.regs.set_w(d, base.wrapping_add(disp as u16));
        }
    }

    pub(crate) fn lda_bx(&mut self) {
        let d = self.dst_field();
        let src = self.src_field();
        let w2 = self.next_operand();
        let idx = u32::from(self.regs.w(((w2 >> 8) & 15) as u8));
        if self.segmented_mode() {
            let addr = Self::addr_add(self.regs.l(src), idx);
            self.regs.set_l(d & 14, addr);
        } else {
            let addr = self.regs.w(src).wrapping_add(idx as u16);
            self.regs.set_w(d, addr);
        }
    }

    pub(crate) fn ldk(&mut self) {
        let d = self.src_field();
        let v = u16::from(self.dst_field());
        self.regs.set_w(d, v);
    }

    pub(crate) fn ex_b(&mut self) {
        let t = self.dst_target();
        let d = self.dst_field();
        let tmp = self.read_t_b(t);
        let v = self.rb(d);
        self.write_t_b(t, v);
        self.set_rb(d, tmp);
    }

    pub(crate) fn ex_w(&mut self) {
        let t = self.dst_target();
        let d = self.dst_field();
        let tmp = self.read_t_w(t);
        let v = self.regs.w(d);
        self.write_t_w(t, v);
        self.regs.set_w(d, tmp);
    }

    /// LDM rd,src,#n — load `n` registers from ascending words, wrapping
    /// within R0..R15.
    pub(crate) fn ldm_load(&mut self) {
        let w2 = self.next_operand();
        let start = ((w2 >> 8) & 15) as u8;
        let count = (w2 & 15) + 1;
        let t = self.dst_target();
        let mut addr = match t {
            Target::Mem(a) => a,
            Target::Reg(_) => return, // register mode is not a valid LDM encoding
        };
        for i in 0..count {
            let reg = (start + i as u8) & 15;
            let v = self.rdmem_w(Space::Data, addr);
            self.regs.set_w(reg, v);
            addr = Self::addr_add(addr, 2);
        }
        self.charge(3 * i32::from(count));
    }

    /// LDM dst,rs,#n — store `n` registers.
    pub(crate) fn ldm_store(&mut self) {
        let w2 = self.next_operand();
        let start = ((w2 >> 8) & 15) as u8;
        let count = (w2 & 15) + 1;
        let t = self.dst_target();
        let mut addr = match t {
            Target::Mem(a) => a,
            Target::Reg(_) => return,
        };
        for i in 0..count {
            let reg = (start + i as u8) & 15;
            let v = self.regs.w(reg);
            self.wrmem_w(Space::Data, addr, v);
            addr = Self::addr_add(addr, 2);
        }
        self.charge(3 * i32::from(count));
    }

    // =========================================================================
    // Stack operations
    // =========================================================================

    pub(crate) fn push_w_op(&mut self) {
        let ptr = self.src_field();
        let t = self.low_target();
        let v = self.read_t_w(t);
        self.push_w_reg(ptr, v);
    }

    pub(crate) fn push_imm_op(&mut self) {
        let ptr = self.src_field();
        let v = self.next_operand();
        self.push_w_reg(ptr, v);
    }

    pub(crate) fn push_l_op(&mut self) {
        let ptr = self.src_field();
        let t = self.low_target();
        let v = self.read_t_l(t);
        self.push_l_reg(ptr, v);
    }

    pub(crate) fn pop_w_op(&mut self) {
        let ptr = self.src_field();
        let t = self.low_target();
        let v = self.pop_w_reg(ptr);
        self.write_t_w(t, v);
    }

    pub(crate) fn pop_l_op(&mut self) {
        let ptr = self.src_field();
        let t = self.low_target();
        let v = self.pop_l_reg(ptr);
        self.write_t_l(t, v);
    }

    // =========================================================================
    // Branch, call, return
    // =========================================================================

    pub(crate) fn jr_cc(&mut self) {
        let cc = self.nib(0, 1);
        let disp = i32::from(self.op0() as u8 as i8);
        if cc_true(self.fcw, cc) {
            self.pc = Self::addr_add(self.pc, (disp * 2) as u32);
        }
    }

    pub(crate) fn jp_cc(&mut self) {
        let cc = self.dst_field();
        let reg = self.src_field();
        let ea = match self.mode() {
            0 => self.addr_from_reg(reg),
            _ => {
                let mut a = self.next_addr_operand();
                if reg != 0 {
                    a = Self::addr_add(a, u32::from(self.regs.w(reg)));
                }
                a
            }
        };
        if cc_true(self.fcw, cc) {
            self.pc = ea;
            self.charge(3);
        }
    }

    pub(crate) fn djnz(&mut self) {
        let d = self.nib(0, 1);
        let disp = u32::from(self.op0() & 0x7f);
        let taken = if self.op0() & 0x80 != 0 {
            let v = self.regs.w(d).wrapping_sub(1);
            self.regs.set_w(d, v);
            v != 0
        } else {
            let v = self.rb(d).wrapping_sub(1);
            self.set_rb(d, v);
            v != 0
        };
        if taken {
            self.pc = Self::addr_sub(self.pc, 2 * disp);
        }
    }

    pub(crate) fn calr(&mut self) {
        let mut disp = i32::from(self.op0() & 0xfff);
        if disp & 0x800 != 0 {
            disp -= 0x1000;
        }
        self.push_pc();
        self.pc = Self::addr_sub(self.pc, (2 * disp) as u32);
    }

    pub(crate) fn call_op(&mut self) {
        let reg = self.src_field();
        let ea = match self.mode() {
            0 => self.addr_from_reg(reg),
            _ => {
                let mut a = self.next_addr_operand();
                if reg != 0 {
                    a = Self::addr_add(a, u32::from(self.regs.w(reg)));
                }
                a
            }
        };
        self.push_pc();
        self.pc = ea;
    }

    pub(crate) fn ret_cc(&mut self) {
        let cc = self.dst_field();
        if cc_true(self.fcw, cc) {
            self.pc = self.pop_pc();
        }
    }

    pub(crate) fn sc(&mut self) {
        self.irq_req |= super::Z8000_SYSCALL;
    }

    // =========================================================================
    // Privileged and system control
    // =========================================================================

    pub(crate) fn halt(&mut self) {
        if !self.check_privileged() {
            return;
        }
        self.halt = true;
    }

    pub(crate) fn iret(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let _tag = self.pop_w();
        let fcw = self.pop_w();
        self.pc = self.pop_pc();
        self.change_fcw(fcw);
    }

    pub(crate) fn di(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let mut fcw = self.fcw;
        if self.op0() & 1 == 0 {
            fcw &= !crate::flags::F_VIE;
        }
        if self.op0() & 2 == 0 {
            fcw &= !crate::flags::F_NVIE;
        }
        self.change_fcw(fcw);
    }

    pub(crate) fn ei(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let mut fcw = self.fcw;
        if self.op0() & 1 == 0 {
            fcw |= crate::flags::F_VIE;
        }
        if self.op0() & 2 == 0 {
            fcw |= crate::flags::F_NVIE;
        }
        self.change_fcw(fcw);
    }

    pub(crate) fn ldctl_from(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let d = self.src_field();
        let v = match self.dst_field() & 7 {
            2 => self.fcw,
            3 => self.refresh,
            4 => self.psap_seg,
            5 => self.psap_off,
            6 => self.nsp_seg,
            _ => self.nsp_off,
        };
        self.regs.set_w(d, v);
    }

    pub(crate) fn ldctl_to(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let v = self.regs.w(self.src_field());
        match self.dst_field() & 7 {
            2 => self.change_fcw(v),
            3 => self.refresh = v,
            4 => self.psap_seg = v,
            5 => self.psap_off = v,
            6 => self.nsp_seg = v,
            _ => self.nsp_off = v,
        }
    }

    pub(crate) fn ldctlb_from(&mut self) {
        let d = self.src_field();
        let v = (self.fcw & FLAGS_MASK) as u8;
        self.set_rb(d, v);
    }

    pub(crate) fn ldctlb_to(&mut self) {
        let v = u16::from(self.rb(self.src_field()));
        self.fcw = (self.fcw & 0xff00) | (v & FLAGS_MASK);
    }

    pub(crate) fn setflg(&mut self) {
        self.fcw |= self.op0() & 0x00f0;
    }

    pub(crate) fn resflg(&mut self) {
        self.fcw &= !(self.op0() & 0x00f0);
    }

    pub(crate) fn comflg(&mut self) {
        self.fcw ^= self.op0() & 0x00f0;
    }

    pub(crate) fn nop(&mut self) {}

    pub(crate) fn ldps(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let reg = self.src_field();
        let addr = match self.mode() {
            0 => self.addr_from_reg(reg),
            _ => {
                let mut a = self.next_addr_operand();
                if reg != 0 {
                    a = Self::addr_add(a, u32::from(self.regs.w(reg)));
                }
                a
            }
        };
        if self.is_segmented_variant() {
            let fcw = self.rdmem_w(Space::Data, Self::addr_add(addr, 2));
            let long = self.rdmem_l(Space::Data, Self::addr_add(addr, 4));
            self.pc = Self::segmented_addr(long);
            self.change_fcw(fcw);
        } else {
            let fcw = self.rdmem_w(Space::Data, addr);
            let pc = self.rdmem_w(Space::Data, Self::addr_add(addr, 2));
            self.pc = u32::from(pc);
            self.change_fcw(fcw);
        }
    }

    pub(crate) fn mset(&mut self) {
        if !self.check_privileged() {
            return;
        }
        self.mi = true;
    }

    pub(crate) fn mres(&mut self) {
        if !self.check_privileged() {
            return;
        }
        self.mi = false;
    }

    pub(crate) fn mbit(&mut self) {
        if !self.check_privileged() {
            return;
        }
        self.set_flags(F_S, if self.mi { F_S } else { 0 });
    }

    pub(crate) fn mreq(&mut self) {
        if !self.check_privileged() {
            return;
        }
        if self.mi {
            self.set_flags(F_Z | F_S, F_S);
        } else {
            self.mi = true;
            self.set_flags(F_Z | F_S, F_Z);
        }
    }

    /// Extended (EPU) instructions latch the EPU trap unconditionally; the
    /// FCW EPU bit is not consulted.
    pub(crate) fn extended(&mut self) {
        self.irq_req |= super::Z8000_EPU;
    }

    /// Undefined opcodes take the privileged-instruction trap path with the
    /// first opcode word preserved for the handler.
    pub(crate) fn undefined(&mut self) {
        self.privileged_trap();
    }

    // =========================================================================
    // I/O
    // =========================================================================

    pub(crate) fn in_b(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let port = self.regs.w(self.src_field());
        let v = self.rdport_b(IoMode::Normal, port);
        let d = self.dst_field();
        self.set_rb(d, v);
    }

    pub(crate) fn in_w(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let port = self.regs.w(self.src_field());
        let v = self.rdport_w(IoMode::Normal, port);
        let d = self.dst_field();
        self.regs.set_w(d, v);
    }

    pub(crate) fn out_b(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let port = self.regs.w(self.src_field());
        let v = self.rb(self.dst_field());
        self.wrport_b(IoMode::Normal, port, v);
    }

    pub(crate) fn out_w(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let port = self.regs.w(self.src_field());
        let v = self.regs.w(self.dst_field());
        self.wrport_w(IoMode::Normal, port, v);
    }

    fn imm_io_mode(&self) -> IoMode {
        if self.op0() & 1 != 0 {
            IoMode::Special
        } else {
            IoMode::Normal
        }
    }

    pub(crate) fn in_imm_b(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let mode = self.imm_io_mode();
        let d = self.src_field();
        let port = self.next_operand();
        let v = self.rdport_b(mode, port);
        self.set_rb(d, v);
    }

    pub(crate) fn in_imm_w(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let mode = self.imm_io_mode();
        let d = self.src_field();
        let port = self.next_operand();
        let v = self.rdport_w(mode, port);
        self.regs.set_w(d, v);
    }

    pub(crate) fn out_imm_b(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let mode = self.imm_io_mode();
        let s = self.src_field();
        let port = self.next_operand();
        let v = self.rb(s);
        self.wrport_b(mode, port, v);
    }

    pub(crate) fn out_imm_w(&mut self) {
        if !self.check_privileged() {
            return;
        }
        let mode = self.imm_io_mode();
        let s = self.src_field();
        let port = self.next_operand();
        let v = self.regs.w(s);
        self.wrport_w(mode, port, v);
    }

    /// Block input: INIB/INDB/SINIB/SINDB and their repeat forms, byte and
    /// word selected by the table entry.
    fn block_io_in(&mut self, word: bool) {
        if !self.check_privileged() {
            return;
        }
        let sub = self.dst_field();
        let mode = if sub & 1 != 0 { IoMode::Special } else { IoMode::Normal };
        let step: i32 = if sub & 8 != 0 { -1 } else { 1 };
        let port_reg = self.src_field();
        let w2 = self.next_operand();
        let counter = ((w2 >> 8) & 15) as u8;
        let dst_ptr = ((w2 >> 4) & 15) as u8;
        let repeat = w2 & 8 == 0;

        let port = self.regs.w(port_reg);
        let daddr = self.addr_from_reg(dst_ptr);
        if word {
            let v = self.rdport_w(mode, port);
            self.wrmem_w(Space::Data, daddr, v);
            self.advance_reg_ptr(dst_ptr, step * 2);
        } else {
            let v = self.rdport_b(mode, port);
            self.wrmem_b(Space::Data, daddr, v);
            self.advance_reg_ptr(dst_ptr, step);
        }
        let done = self.dec_counter(counter);
        self.set_flags(F_PV, if done { F_PV } else { 0 });
        if repeat && !done {
            self.rewind_block();
        }
    }

    /// Block output: OTIB/OTDB/SOTIB/SOTDB and their repeat forms.
    fn block_io_out(&mut self, word: bool) {
        if !self.check_privileged() {
            return;
        }
        let sub = self.dst_field();
        let mode = if sub & 1 != 0 { IoMode::Special } else { IoMode::Normal };
        let step: i32 = if sub & 8 != 0 { -1 } else { 1 };
        let src_ptr = self.src_field();
        let w2 = self.next_operand();
        let counter = ((w2 >> 8) & 15) as u8;
        let port_reg = ((w2 >> 4) & 15) as u8;
        let repeat = w2 & 8 == 0;

        let port = self.regs.w(port_reg);
        let saddr = self.addr_from_reg(src_ptr);
        if word {
            let v = self.rdmem_w(Space::Data, saddr);
            self.wrport_w(mode, port, v);
            self.advance_reg_ptr(src_ptr, step * 2);
        } else {
            let v = self.rdmem_b(Space::Data, saddr);
            self.wrport_b(mode, port, v);
            self.advance_reg_ptr(src_ptr, step);
        }
        let done = self.dec_counter(counter);
        self.set_flags(F_PV, if done { F_PV } else { 0 });
        if repeat && !done {
            self.rewind_block();
        }
    }

    pub(crate) fn block_io_in_b(&mut self) {
        self.block_io_in(false);
    }

    pub(crate) fn block_io_in_w(&mut self) {
        self.block_io_in(true);
    }

    pub(crate) fn block_io_out_b(&mut self) {
        self.block_io_out(false);
    }

    pub(crate) fn block_io_out_w(&mut self) {
        self.block_io_out(true);
    }

    // =========================================================================
    // Block memory and string operations
    // =========================================================================

    /// LDI/LDD and repeat forms: move one element, advance both pointers,
    /// decrement the counter. The repeat forms rewind the PC so interrupts
    /// are honoured at instruction boundaries.
    fn ld_string(&mut self, word: bool) {
        let sub = self.dst_field();
        let step: i32 = if sub & 8 != 0 { -1 } else { 1 };
        let src_ptr = self.src_field();
        let w2 = self.next_operand();
        let counter = ((w2 >> 8) & 15) as u8;
        let dst_ptr = ((w2 >> 4) & 15) as u8;
        let repeat = w2 & 8 == 0;

        let saddr = self.addr_from_reg(src_ptr);
        let daddr = self.addr_from_reg(dst_ptr);
        if word {
            let v = self.rdmem_w(Space::Data, saddr);
            self.wrmem_w(Space::Data, daddr, v);
            self.advance_reg_ptr(src_ptr, step * 2);
            self.advance_reg_ptr(dst_ptr, step * 2);
        } else {
            let v = self.rdmem_b(Space::Data, saddr);
            self.wrmem_b(Space::Data, daddr, v);
            self.advance_reg_ptr(src_ptr, step);
            self.advance_reg_ptr(dst_ptr, step);
        }
        let done = self.dec_counter(counter);
        self.set_flags(F_PV, if done { F_PV } else { 0 });
        if repeat && !done {
            self.rewind_block();
        }
    }

    pub(crate) fn ld_string_b(&mut self) {
        self.ld_string(false);
    }

    pub(crate) fn ld_string_w(&mut self) {
        self.ld_string(true);
    }

    /// CPI/CPD and repeat forms: compare a register against the source
    /// string; Z reports the condition-code verdict, PV counter exhaustion.
    fn cp_string(&mut self, word: bool) {
        let sub = self.dst_field();
        let step: i32 = if sub & 8 != 0 { -1 } else { 1 };
        let repeat = sub & 4 != 0;
        let src_ptr = self.src_field();
        let w2 = self.next_operand();
        let counter = ((w2 >> 8) & 15) as u8;
        let cmp_reg = ((w2 >> 4) & 15) as u8;
        let cc = (w2 & 15) as u8;

        let saddr = self.addr_from_reg(src_ptr);
        if word {
            let v = self.rdmem_w(Space::Data, saddr);
            self.alu_sub_w(self.regs.w(cmp_reg), v, false);
            self.advance_reg_ptr(src_ptr, step * 2);
        } else {
            let v = self.rdmem_b(Space::Data, saddr);
            self.alu_sub_b(self.rb(cmp_reg), v, false);
            self.advance_reg_ptr(src_ptr, step);
        }
        let matched = cc_true(self.fcw, cc);
        self.set_flags(F_Z, if matched { F_Z } else { 0 });
        let done = self.dec_counter(counter);
        self.set_flags(F_PV, if done { F_PV } else { 0 });
        if repeat && !matched && !done {
            self.rewind_block();
        }
    }

    pub(crate) fn cp_string_b(&mut self) {
        self.cp_string(false);
    }

    pub(crate) fn cp_string_w(&mut self) {
        self.cp_string(true);
    }

    /// CPSI/CPSD and repeat forms: compare two strings element-wise.
    fn cps_string(&mut self, word: bool) {
        let sub = self.dst_field();
        let step: i32 = if sub & 8 != 0 { -1 } else { 1 };
        let repeat = sub & 4 != 0;
        let src_ptr = self.src_field();
        let w2 = self.next_operand();
        let counter = ((w2 >> 8) & 15) as u8;
        let dst_ptr = ((w2 >> 4) & 15) as u8;
        let cc = (w2 & 15) as u8;

        let saddr = self.addr_from_reg(src_ptr);
        let daddr = self.addr_from_reg(dst_ptr);
        if word {
            let s = self.rdmem_w(Space::Data, saddr);
            let d = self.rdmem_w(Space::Data, daddr);
            self.alu_sub_w(d, s, false);
            self.advance_reg_ptr(src_ptr, step * 2);
            self.advance_reg_ptr(dst_ptr, step * 2);
        } else {
            let s = self.rdmem_b(Space::Data, saddr);
            let d = self.rdmem_b(Space::Data, daddr);
            self.alu_sub_b(d, s, false);
            self.advance_reg_ptr(src_ptr, step);
            self.advance_reg_ptr(dst_ptr, step);
        }
        let matched = cc_true(self.fcw, cc);
        self.set_flags(F_Z, if matched { F_Z } else { 0 });
        let done = self.dec_counter(counter);
        self.set_flags(F_PV, if done { F_PV } else { 0 });
        if repeat && !matched && !done {
            self.rewind_block();
        }
    }

    pub(crate) fn cps_string_b(&mut self) {
        self.cps_string(false);
    }

    pub(crate) fn cps_string_w(&mut self) {
        self.cps_string(true);
    }

    /// TRIB/TRDB and repeat forms: translate the destination byte in place
    /// through the table.
    pub(crate) fn translate(&mut self) {
        let sub = self.dst_field();
        let step: i32 = if sub & 8 != 0 { -1 } else { 1 };
        let repeat = sub & 4 != 0;
        let dst_ptr = self.src_field();
        let w2 = self.next_operand();
        let counter = ((w2 >> 8) & 15) as u8;
        let table_reg = ((w2 >> 4) & 15) as u8;

        let daddr = self.addr_from_reg(dst_ptr);
        let b = self.rdmem_b(Space::Data, daddr);
        let taddr = Self::addr_add(self.addr_from_reg(table_reg), u32::from(b));
        let t = self.rdmem_b(Space::Data, taddr);
        self.wrmem_b(Space::Data, daddr, t);
        self.advance_reg_ptr(dst_ptr, step);
        let done = self.dec_counter(counter);
        self.set_flags(F_PV, if done { F_PV } else { 0 });
        if repeat && !done {
            self.rewind_block();
        }
    }

    /// TRTIB/TRTDB and repeat forms: test the translation of the source
    /// byte; the translated byte lands in RH1 and Z reports whether it was
    /// zero. The repeat forms scan until a non-zero entry.
    pub(crate) fn translate_test(&mut self) {
        let sub = self.dst_field();
        let step: i32 = if sub & 8 != 0 { -1 } else { 1 };
        let repeat = sub & 4 != 0;
        let src_ptr = self.src_field();
        let w2 = self.next_operand();
        let counter = ((w2 >> 8) & 15) as u8;
        let table_reg = ((w2 >> 4) & 15) as u8;

        let saddr = self.addr_from_reg(src_ptr);
        let b = self.rdmem_b(Space::Data, saddr);
        let taddr = Self::addr_add(self.addr_from_reg(table_reg), u32::from(b));
        let t = self.rdmem_b(Space::Data, taddr);
        self.set_rb(1, t); // RH1 receives the translation
        self.set_flags(F_Z, if t == 0 { F_Z } else { 0 });
        self.advance_reg_ptr(src_ptr, step);
        let done = self.dec_counter(counter);
        self.set_flags(F_PV, if done { F_PV } else { 0 });
        if repeat && t == 0 && !done {
            self.rewind_block();
        }
    }
}
