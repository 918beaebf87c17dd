//! Z8000 opcode dispatch table.
//!
//! The authoring table lists opcode ranges with their handler, size in
//! words, base cycle cost and disassembly pattern. At first use a flat
//! 64K-entry index is built over it; where ranges overlap, the later entry
//! wins. Entry 0 is the catch-all for undefined encodings.
//!
//! Disassembly patterns use `%` placeholders decoded in `disasm.rs`:
//! `%bN`/`%wN`/`%lN`/`%qN` register fields at nibble `N`, `%@N` indirect
//! register, `%rN` address register, `%iN`/`%pN` nibble immediates, `%cN`
//! condition codes, `%#b`/`%#w`/`%#l`/`%#i` trailing immediates, `%a`
//! address operands, `%xN` optional index suffix, `%dN` displacement
//! targets, and a few one-offs (`%s`, `%f`, `%v`, `%?`, `%D`).

use once_cell::sync::Lazy;

use crate::cpu::Z8000;

pub(crate) type Handler = fn(&mut Z8000);

pub(crate) struct OpEntry {
    pub beg: u16,
    pub end: u16,
    pub step: u16,
    pub span: u16,
    pub size: u8,
    pub cycles: u8,
    pub handler: Handler,
    pub dasm: &'static str,
}

const fn op(
    beg: u16,
    end: u16,
    step: u16,
    size: u8,
    cycles: u8,
    handler: Handler,
    dasm: &'static str,
) -> OpEntry {
    OpEntry { beg, end, step, span: 1, size, cycles, handler, dasm }
}

const fn op_span(
    beg: u16,
    end: u16,
    step: u16,
    span: u16,
    size: u8,
    cycles: u8,
    handler: Handler,
    dasm: &'static str,
) -> OpEntry {
    OpEntry { beg, end, step, span, size, cycles, handler, dasm }
}

#[rustfmt::skip]
static TABLE: &[OpEntry] = &[
    // Catch-all: undefined encodings take the trap path.
    op(0x0000, 0xffff, 1, 1, 7, Z8000::undefined, "rsvd"),

    // --- Byte/word arithmetic and logic, IR/IM column ---------------------
    op(0x0000, 0x000f, 1, 2,  7, Z8000::add_b, "addb %b3,%#b"),
    op(0x0010, 0x00ff, 1, 1,  7, Z8000::add_b, "addb %b3,%@2"),
    op(0x0100, 0x010f, 1, 2,  7, Z8000::add_w, "add %w3,%#w"),
    op(0x0110, 0x01ff, 1, 1,  7, Z8000::add_w, "add %w3,%@2"),
    op(0x0200, 0x020f, 1, 2,  7, Z8000::sub_b, "subb %b3,%#b"),
    op(0x0210, 0x02ff, 1, 1,  7, Z8000::sub_b, "subb %b3,%@2"),
    op(0x0300, 0x030f, 1, 2,  7, Z8000::sub_w, "sub %w3,%#w"),
    op(0x0310, 0x03ff, 1, 1,  7, Z8000::sub_w, "sub %w3,%@2"),
    op(0x0400, 0x040f, 1, 2,  7, Z8000::or_b,  "orb %b3,%#b"),
    op(0x0410, 0x04ff, 1, 1,  7, Z8000::or_b,  "orb %b3,%@2"),
    op(0x0500, 0x050f, 1, 2,  7, Z8000::or_w,  "or %w3,%#w"),
    op(0x0510, 0x05ff, 1, 1,  7, Z8000::or_w,  "or %w3,%@2"),
    op(0x0600, 0x060f, 1, 2,  7, Z8000::and_b, "andb %b3,%#b"),
    op(0x0610, 0x06ff, 1, 1,  7, Z8000::and_b, "andb %b3,%@2"),
    op(0x0700, 0x070f, 1, 2,  7, Z8000::and_w, "and %w3,%#w"),
    op(0x0710, 0x07ff, 1, 1,  7, Z8000::and_w, "and %w3,%@2"),
    op(0x0800, 0x080f, 1, 2,  7, Z8000::xor_b, "xorb %b3,%#b"),
    op(0x0810, 0x08ff, 1, 1,  7, Z8000::xor_b, "xorb %b3,%@2"),
    op(0x0900, 0x090f, 1, 2,  7, Z8000::xor_w, "xor %w3,%#w"),
    op(0x0910, 0x09ff, 1, 1,  7, Z8000::xor_w, "xor %w3,%@2"),
    op(0x0a00, 0x0a0f, 1, 2,  7, Z8000::cp_b,  "cpb %b3,%#b"),
    op(0x0a10, 0x0aff, 1, 1,  7, Z8000::cp_b,  "cpb %b3,%@2"),
    op(0x0b00, 0x0b0f, 1, 2,  7, Z8000::cp_w,  "cp %w3,%#w"),
    op(0x0b10, 0x0bff, 1, 1,  7, Z8000::cp_w,  "cp %w3,%@2"),

    // --- Single-operand byte group, indirect --------------------------------
    op(0x0c10, 0x0cf0, 0x10, 1, 12, Z8000::com_b,  "comb %@2"),
    op(0x0c11, 0x0cf1, 0x10, 2, 11, Z8000::cp_t_b, "cpb %@2,%#b"),
    op(0x0c12, 0x0cf2, 0x10, 1, 12, Z8000::neg_b,  "negb %@2"),
    op(0x0c14, 0x0cf4, 0x10, 1,  8, Z8000::test_b, "testb %@2"),
    op(0x0c15, 0x0cf5, 0x10, 2, 11, Z8000::ld_t_b, "ldb %@2,%#b"),
    op(0x0c16, 0x0cf6, 0x10, 1, 11, Z8000::tset_b, "tsetb %@2"),
    op(0x0c18, 0x0cf8, 0x10, 1,  8, Z8000::clr_b,  "clrb %@2"),

    // --- Single-operand word group, indirect --------------------------------
    op(0x0d10, 0x0df0, 0x10, 1, 12, Z8000::com_w,      "com %@2"),
    op(0x0d11, 0x0df1, 0x10, 2, 11, Z8000::cp_t_w,     "cp %@2,%#w"),
    op(0x0d12, 0x0df2, 0x10, 1, 12, Z8000::neg_w,      "neg %@2"),
    op(0x0d14, 0x0df4, 0x10, 1,  8, Z8000::test_w,     "test %@2"),
    op(0x0d15, 0x0df5, 0x10, 2, 11, Z8000::ld_t_w,     "ld %@2,%#w"),
    op(0x0d16, 0x0df6, 0x10, 1, 11, Z8000::tset_w,     "tset %@2"),
    op(0x0d18, 0x0df8, 0x10, 1,  8, Z8000::clr_w,      "clr %@2"),
    op(0x0d19, 0x0df9, 0x10, 2, 12, Z8000::push_imm_op, "push %@2,%#w"),

    // --- Extended (EPU) instruction blocks ----------------------------------
    op(0x0e00, 0x0fff, 1, 1, 10, Z8000::extended, "epu"),
    op(0x4e00, 0x4fff, 1, 1, 10, Z8000::extended, "epu"),
    op(0x8e00, 0x8fff, 1, 1, 10, Z8000::extended, "epu"),

    // --- Long and multiply/divide column, IR/IM -----------------------------
    op(0x1000, 0x100f, 1, 3, 14, Z8000::cp_l,      "cpl %l3,%#l"),
    op(0x1010, 0x10ff, 1, 1, 14, Z8000::cp_l,      "cpl %l3,%@2"),
    op(0x1110, 0x11ff, 1, 1, 12, Z8000::push_l_op, "pushl %@2,%@3"),
    op(0x1200, 0x120f, 1, 3, 14, Z8000::sub_l,     "subl %l3,%#l"),
    op(0x1210, 0x12ff, 1, 1, 14, Z8000::sub_l,     "subl %l3,%@2"),
    op(0x1310, 0x13ff, 1, 1,  9, Z8000::push_w_op, "push %@2,%@3"),
    op(0x1400, 0x140f, 1, 3, 11, Z8000::ld_l,      "ldl %l3,%#l"),
    op(0x1410, 0x14ff, 1, 1, 11, Z8000::ld_l,      "ldl %l3,%@2"),
    op(0x1510, 0x15ff, 1, 1, 12, Z8000::pop_l_op,  "popl %@3,%@2"),
    op(0x1600, 0x160f, 1, 3, 14, Z8000::add_l,     "addl %l3,%#l"),
    op(0x1610, 0x16ff, 1, 1, 14, Z8000::add_l,     "addl %l3,%@2"),
    op(0x1710, 0x17ff, 1, 1,  8, Z8000::pop_w_op,  "pop %@3,%@2"),
    op(0x1800, 0x180f, 1, 3, 12, Z8000::mult_l,    "multl %q3,%#l"),
    op(0x1810, 0x18ff, 1, 1, 12, Z8000::mult_l,    "multl %q3,%@2"),
    op(0x1900, 0x190f, 1, 2, 10, Z8000::mult_w,    "mult %l3,%#w"),
    op(0x1910, 0x19ff, 1, 1, 10, Z8000::mult_w,    "mult %l3,%@2"),
    op(0x1a00, 0x1a0f, 1, 3, 12, Z8000::div_l,     "divl %q3,%#l"),
    op(0x1a10, 0x1aff, 1, 1, 12, Z8000::div_l,     "divl %q3,%@2"),
    op(0x1b00, 0x1b0f, 1, 2, 10, Z8000::div_w,     "div %l3,%#w"),
    op(0x1b10, 0x1bff, 1, 1, 10, Z8000::div_w,     "div %l3,%@2"),

    // --- LDM / TESTL group --------------------------------------------------
    op(0x1c11, 0x1cf1, 0x10, 2, 11, Z8000::ldm_load,  "ldm %w5,%@2,#%p7"),
    op(0x1c18, 0x1cf8, 0x10, 1, 13, Z8000::test_l,    "testl %@2"),
    op(0x1c19, 0x1cf9, 0x10, 2, 11, Z8000::ldm_store, "ldm %@2,%w5,#%p7"),
    op(0x1d10, 0x1dff, 1,    1, 11, Z8000::st_l,      "ldl %@2,%l3"),

    // --- Jump and call, indirect --------------------------------------------
    op(0x1e10, 0x1eff, 1,    1, 10, Z8000::jp_cc,   "jp %c3,%@2"),
    op(0x1f10, 0x1ff0, 0x10, 1, 10, Z8000::call_op, "call %@2"),

    // --- Byte/word loads and stores, IR/IM ----------------------------------
    op(0x2000, 0x200f, 1, 2, 7, Z8000::ld_b, "ldb %b3,%#b"),
    op(0x2010, 0x20ff, 1, 1, 7, Z8000::ld_b, "ldb %b3,%@2"),
    op(0x2100, 0x210f, 1, 2, 7, Z8000::ld_w, "ld %w3,%#w"),
    op(0x2110, 0x21ff, 1, 1, 7, Z8000::ld_w, "ld %w3,%@2"),

    // --- Bit operations, dynamic and indirect static ------------------------
    op(0x2200, 0x220f, 1,    2, 10, Z8000::res_b_dyn, "resb %b5,%w3"),
    op(0x2210, 0x22ff, 1,    1, 11, Z8000::res_b,     "resb %@2,#%i3"),
    op(0x2300, 0x230f, 1,    2, 10, Z8000::res_w_dyn, "res %w5,%w3"),
    op(0x2310, 0x23ff, 1,    1, 11, Z8000::res_w,     "res %@2,#%i3"),
    op(0x2400, 0x240f, 1,    2, 10, Z8000::set_b_dyn, "setb %b5,%w3"),
    op(0x2410, 0x24ff, 1,    1, 11, Z8000::set_b,     "setb %@2,#%i3"),
    op(0x2500, 0x250f, 1,    2, 10, Z8000::set_w_dyn, "set %w5,%w3"),
    op(0x2510, 0x25ff, 1,    1, 11, Z8000::set_w,     "set %@2,#%i3"),
    op(0x2600, 0x260f, 1,    2, 10, Z8000::bit_b_dyn, "bitb %b5,%w3"),
    op(0x2610, 0x26ff, 1,    1,  8, Z8000::bit_b,     "bitb %@2,#%i3"),
    op(0x2700, 0x270f, 1,    2, 10, Z8000::bit_w_dyn, "bit %w5,%w3"),
    op(0x2710, 0x27ff, 1,    1,  8, Z8000::bit_w,     "bit %@2,#%i3"),

    // --- Increment/decrement, indirect --------------------------------------
    op(0x2810, 0x28ff, 1, 1, 11, Z8000::inc_b, "incb %@2,#%p3"),
    op(0x2910, 0x29ff, 1, 1, 11, Z8000::inc_w, "inc %@2,#%p3"),
    op(0x2a10, 0x2aff, 1, 1, 11, Z8000::dec_b, "decb %@2,#%p3"),
    op(0x2b10, 0x2bff, 1, 1, 11, Z8000::dec_w, "dec %@2,#%p3"),

    // --- Exchange and stores, indirect --------------------------------------
    op(0x2c10, 0x2cff, 1, 1, 12, Z8000::ex_b, "exb %b3,%@2"),
    op(0x2d10, 0x2dff, 1, 1, 12, Z8000::ex_w, "ex %w3,%@2"),
    op(0x2e10, 0x2eff, 1, 1,  8, Z8000::st_b, "ldb %@2,%b3"),
    op(0x2f10, 0x2fff, 1, 1,  8, Z8000::st_w, "ld %@2,%w3"),

    // --- Base-displacement and PC-relative forms ----------------------------
    op(0x3000, 0x300f, 1, 2, 14, Z8000::ld_ba_b, "ldrb %b3,%D"),
    op(0x3010, 0x30ff, 1, 2, 14, Z8000::ld_ba_b, "ldb %b3,%r2(%#w)"),
    op(0x3100, 0x310f, 1, 2, 14, Z8000::ld_ba_w, "ldr %w3,%D"),
    op(0x3110, 0x31ff, 1, 2, 14, Z8000::ld_ba_w, "ld %w3,%r2(%#w)"),
    op(0x3200, 0x320f, 1, 2, 14, Z8000::st_ba_b, "ldrb %D,%b3"),
    op(0x3210, 0x32ff, 1, 2, 14, Z8000::st_ba_b, "ldb %r2(%#w),%b3"),
    op(0x3300, 0x330f, 1, 2, 14, Z8000::st_ba_w, "ldr %D,%w3"),
    op(0x3310, 0x33ff, 1, 2, 14, Z8000::st_ba_w, "ld %r2(%#w),%w3"),
    op(0x3400, 0x340f, 1, 2, 15, Z8000::lda_ba,  "ldar %r3,%D"),
    op(0x3410, 0x34ff, 1, 2, 15, Z8000::lda_ba,  "lda %r3,%r2(%#w)"),
    op(0x3500, 0x350f, 1, 2, 17, Z8000::ld_ba_l, "ldrl %l3,%D"),
    op(0x3510, 0x35ff, 1, 2, 17, Z8000::ld_ba_l, "ldl %l3,%r2(%#w)"),
    op(0x3700, 0x370f, 1, 2, 17, Z8000::st_ba_l, "ldrl %D,%l3"),
    op(0x3710, 0x37ff, 1, 2, 17, Z8000::st_ba_l, "ldl %r2(%#w),%l3"),

    // --- LDPS ----------------------------------------------------------------
    op(0x3910, 0x39f0, 0x10, 1, 12, Z8000::ldps, "ldps %@2"),
    op(0x7900, 0x79f0, 0x10, 2, 16, Z8000::ldps, "ldps %a%x2"),

    // --- Special and block I/O, byte ----------------------------------------
    op(0x3a10, 0x3af0, 0x10, 2, 21, Z8000::block_io_in_b,  "ini%?b %@6,%@2,%w5"),
    op(0x3a11, 0x3af1, 0x10, 2, 21, Z8000::block_io_in_b,  "sini%?b %@6,%@2,%w5"),
    op(0x3a12, 0x3af2, 0x10, 2, 21, Z8000::block_io_out_b, "oti%?b %@6,%@2,%w5"),
    op(0x3a13, 0x3af3, 0x10, 2, 21, Z8000::block_io_out_b, "soti%?b %@6,%@2,%w5"),
    op(0x3a04, 0x3af4, 0x10, 2, 12, Z8000::in_imm_b,       "inb %b2,%#w"),
    op(0x3a05, 0x3af5, 0x10, 2, 12, Z8000::in_imm_b,       "sinb %b2,%#w"),
    op(0x3a06, 0x3af6, 0x10, 2, 12, Z8000::out_imm_b,      "outb %#w,%b2"),
    op(0x3a07, 0x3af7, 0x10, 2, 12, Z8000::out_imm_b,      "soutb %#w,%b2"),
    op(0x3a18, 0x3af8, 0x10, 2, 21, Z8000::block_io_in_b,  "ind%?b %@6,%@2,%w5"),
    op(0x3a19, 0x3af9, 0x10, 2, 21, Z8000::block_io_in_b,  "sind%?b %@6,%@2,%w5"),
    op(0x3a1a, 0x3afa, 0x10, 2, 21, Z8000::block_io_out_b, "otd%?b %@6,%@2,%w5"),
    op(0x3a1b, 0x3afb, 0x10, 2, 21, Z8000::block_io_out_b, "sotd%?b %@6,%@2,%w5"),

    // --- Special and block I/O, word ----------------------------------------
    op(0x3b10, 0x3bf0, 0x10, 2, 21, Z8000::block_io_in_w,  "ini%? %@6,%@2,%w5"),
    op(0x3b11, 0x3bf1, 0x10, 2, 21, Z8000::block_io_in_w,  "sini%? %@6,%@2,%w5"),
    op(0x3b12, 0x3bf2, 0x10, 2, 21, Z8000::block_io_out_w, "oti%? %@6,%@2,%w5"),
    op(0x3b13, 0x3bf3, 0x10, 2, 21, Z8000::block_io_out_w, "soti%? %@6,%@2,%w5"),
    op(0x3b04, 0x3bf4, 0x10, 2, 12, Z8000::in_imm_w,       "in %w2,%#w"),
    op(0x3b05, 0x3bf5, 0x10, 2, 12, Z8000::in_imm_w,       "sin %w2,%#w"),
    op(0x3b06, 0x3bf6, 0x10, 2, 12, Z8000::out_imm_w,      "out %#w,%w2"),
    op(0x3b07, 0x3bf7, 0x10, 2, 12, Z8000::out_imm_w,      "sout %#w,%w2"),
    op(0x3b18, 0x3bf8, 0x10, 2, 21, Z8000::block_io_in_w,  "ind%? %@6,%@2,%w5"),
    op(0x3b19, 0x3bf9, 0x10, 2, 21, Z8000::block_io_in_w,  "sind%? %@6,%@2,%w5"),
    op(0x3b1a, 0x3bfa, 0x10, 2, 21, Z8000::block_io_out_w, "otd%? %@6,%@2,%w5"),
    op(0x3b1b, 0x3bfb, 0x10, 2, 21, Z8000::block_io_out_w, "sotd%? %@6,%@2,%w5"),

    // --- Register-pointer I/O ------------------------------------------------
    op(0x3c00, 0x3cff, 1, 1, 10, Z8000::in_b,  "inb %b3,%@2"),
    op(0x3d00, 0x3dff, 1, 1, 10, Z8000::in_w,  "in %w3,%@2"),
    op(0x3e00, 0x3eff, 1, 1, 10, Z8000::out_b, "outb %@2,%b3"),
    op(0x3f00, 0x3fff, 1, 1, 10, Z8000::out_w, "out %@2,%w3"),

    // --- Byte/word arithmetic and logic, DA/X column ------------------------
    op(0x4000, 0x400f, 1, 2,  9, Z8000::add_b, "addb %b3,%a"),
    op(0x4010, 0x40ff, 1, 2, 10, Z8000::add_b, "addb %b3,%a(%w2)"),
    op(0x4100, 0x410f, 1, 2,  9, Z8000::add_w, "add %w3,%a"),
    op(0x4110, 0x41ff, 1, 2, 10, Z8000::add_w, "add %w3,%a(%w2)"),
    op(0x4200, 0x420f, 1, 2,  9, Z8000::sub_b, "subb %b3,%a"),
    op(0x4210, 0x42ff, 1, 2, 10, Z8000::sub_b, "subb %b3,%a(%w2)"),
    op(0x4300, 0x430f, 1, 2,  9, Z8000::sub_w, "sub %w3,%a"),
    op(0x4310, 0x43ff, 1, 2, 10, Z8000::sub_w, "sub %w3,%a(%w2)"),
    op(0x4400, 0x440f, 1, 2,  9, Z8000::or_b,  "orb %b3,%a"),
    op(0x4410, 0x44ff, 1, 2, 10, Z8000::or_b,  "orb %b3,%a(%w2)"),
    op(0x4500, 0x450f, 1, 2,  9, Z8000::or_w,  "or %w3,%a"),
    op(0x4510, 0x45ff, 1, 2, 10, Z8000::or_w,  "or %w3,%a(%w2)"),
    op(0x4600, 0x460f, 1, 2,  9, Z8000::and_b, "andb %b3,%a"),
    op(0x4610, 0x46ff, 1, 2, 10, Z8000::and_b, "andb %b3,%a(%w2)"),
    op(0x4700, 0x470f, 1, 2,  9, Z8000::and_w, "and %w3,%a"),
    op(0x4710, 0x47ff, 1, 2, 10, Z8000::and_w, "and %w3,%a(%w2)"),
    op(0x4800, 0x480f, 1, 2,  9, Z8000::xor_b, "xorb %b3,%a"),
    op(0x4810, 0x48ff, 1, 2, 10, Z8000::xor_b, "xorb %b3,%a(%w2)"),
    op(0x4900, 0x490f, 1, 2,  9, Z8000::xor_w, "xor %w3,%a"),
    op(0x4910, 0x49ff, 1, 2, 10, Z8000::xor_w, "xor %w3,%a(%w2)"),
    op(0x4a00, 0x4a0f, 1, 2,  9, Z8000::cp_b,  "cpb %b3,%a"),
    op(0x4a10, 0x4aff, 1, 2, 10, Z8000::cp_b,  "cpb %b3,%a(%w2)"),
    op(0x4b00, 0x4b0f, 1, 2,  9, Z8000::cp_w,  "cp %w3,%a"),
    op(0x4b10, 0x4bff, 1, 2, 10, Z8000::cp_w,  "cp %w3,%a(%w2)"),

    // --- Single-operand byte group, direct/indexed --------------------------
    op(0x4c00, 0x4c00, 1,    2, 15, Z8000::com_b,  "comb %a"),
    op(0x4c10, 0x4cf0, 0x10, 2, 16, Z8000::com_b,  "comb %a(%w2)"),
    op(0x4c01, 0x4c01, 1,    3, 15, Z8000::cp_t_b, "cpb %a,%#b"),
    op(0x4c11, 0x4cf1, 0x10, 3, 16, Z8000::cp_t_b, "cpb %a(%w2),%#b"),
    op(0x4c02, 0x4c02, 1,    2, 15, Z8000::neg_b,  "negb %a"),
    op(0x4c12, 0x4cf2, 0x10, 2, 16, Z8000::neg_b,  "negb %a(%w2)"),
    op(0x4c04, 0x4c04, 1,    2, 11, Z8000::test_b, "testb %a"),
    op(0x4c14, 0x4cf4, 0x10, 2, 12, Z8000::test_b, "testb %a(%w2)"),
    op(0x4c05, 0x4c05, 1,    3, 14, Z8000::ld_t_b, "ldb %a,%#b"),
    op(0x4c15, 0x4cf5, 0x10, 3, 15, Z8000::ld_t_b, "ldb %a(%w2),%#b"),
    op(0x4c06, 0x4c06, 1,    2, 14, Z8000::tset_b, "tsetb %a"),
    op(0x4c16, 0x4cf6, 0x10, 2, 15, Z8000::tset_b, "tsetb %a(%w2)"),
    op(0x4c08, 0x4c08, 1,    2, 11, Z8000::clr_b,  "clrb %a"),
    op(0x4c18, 0x4cf8, 0x10, 2, 12, Z8000::clr_b,  "clrb %a(%w2)"),

    // --- Single-operand word group, direct/indexed --------------------------
    op(0x4d00, 0x4d00, 1,    2, 15, Z8000::com_w,  "com %a"),
    op(0x4d10, 0x4df0, 0x10, 2, 16, Z8000::com_w,  "com %a(%w2)"),
    op(0x4d01, 0x4d01, 1,    3, 15, Z8000::cp_t_w, "cp %a,%#w"),
    op(0x4d11, 0x4df1, 0x10, 3, 16, Z8000::cp_t_w, "cp %a(%w2),%#w"),
    op(0x4d02, 0x4d02, 1,    2, 15, Z8000::neg_w,  "neg %a"),
    op(0x4d12, 0x4df2, 0x10, 2, 16, Z8000::neg_w,  "neg %a(%w2)"),
    op(0x4d04, 0x4d04, 1,    2, 11, Z8000::test_w, "test %a"),
    op(0x4d14, 0x4df4, 0x10, 2, 12, Z8000::test_w, "test %a(%w2)"),
    op(0x4d05, 0x4d05, 1,    3, 14, Z8000::ld_t_w, "ld %a,%#w"),
    op(0x4d15, 0x4df5, 0x10, 3, 15, Z8000::ld_t_w, "ld %a(%w2),%#w"),
    op(0x4d06, 0x4d06, 1,    2, 14, Z8000::tset_w, "tset %a"),
    op(0x4d16, 0x4df6, 0x10, 2, 15, Z8000::tset_w, "tset %a(%w2)"),
    op(0x4d08, 0x4d08, 1,    2, 11, Z8000::clr_w,  "clr %a"),
    op(0x4d18, 0x4df8, 0x10, 2, 12, Z8000::clr_w,  "clr %a(%w2)"),

    // --- Long column, DA/X --------------------------------------------------
    op(0x5000, 0x500f, 1,    2, 15, Z8000::cp_l,      "cpl %l3,%a"),
    op(0x5010, 0x50ff, 1,    2, 16, Z8000::cp_l,      "cpl %l3,%a(%w2)"),
    op(0x5110, 0x51ff, 1,    2, 20, Z8000::push_l_op, "pushl %@2,%a%x3"),
    op(0x5200, 0x520f, 1,    2, 15, Z8000::sub_l,     "subl %l3,%a"),
    op(0x5210, 0x52ff, 1,    2, 16, Z8000::sub_l,     "subl %l3,%a(%w2)"),
    op(0x5310, 0x53ff, 1,    2, 13, Z8000::push_w_op, "push %@2,%a%x3"),
    op(0x5400, 0x540f, 1,    2, 12, Z8000::ld_l,      "ldl %l3,%a"),
    op(0x5410, 0x54ff, 1,    2, 13, Z8000::ld_l,      "ldl %l3,%a(%w2)"),
    op(0x5510, 0x55ff, 1,    2, 19, Z8000::pop_l_op,  "popl %a%x3,%@2"),
    op(0x5600, 0x560f, 1,    2, 15, Z8000::add_l,     "addl %l3,%a"),
    op(0x5610, 0x56ff, 1,    2, 16, Z8000::add_l,     "addl %l3,%a(%w2)"),
    op(0x5710, 0x57ff, 1,    2, 13, Z8000::pop_w_op,  "pop %a%x3,%@2"),
    op(0x5800, 0x580f, 1,    2, 13, Z8000::mult_l,    "multl %q3,%a"),
    op(0x5810, 0x58ff, 1,    2, 14, Z8000::mult_l,    "multl %q3,%a(%w2)"),
    op(0x5900, 0x590f, 1,    2, 11, Z8000::mult_w,    "mult %l3,%a"),
    op(0x5910, 0x59ff, 1,    2, 12, Z8000::mult_w,    "mult %l3,%a(%w2)"),
    op(0x5a00, 0x5a0f, 1,    2, 13, Z8000::div_l,     "divl %q3,%a"),
    op(0x5a10, 0x5aff, 1,    2, 14, Z8000::div_l,     "divl %q3,%a(%w2)"),
    op(0x5b00, 0x5b0f, 1,    2, 11, Z8000::div_w,     "div %l3,%a"),
    op(0x5b10, 0x5bff, 1,    2, 12, Z8000::div_w,     "div %l3,%a(%w2)"),
    op(0x5c01, 0x5cf1, 0x10, 3, 14, Z8000::ldm_load,  "ldm %w5,%a%x2,#%p7"),
    op(0x5c08, 0x5c08, 1,    2, 16, Z8000::test_l,    "testl %a"),
    op(0x5c18, 0x5cf8, 0x10, 2, 17, Z8000::test_l,    "testl %a(%w2)"),
    op(0x5c09, 0x5cf9, 0x10, 3, 14, Z8000::ldm_store, "ldm %a%x2,%w5,#%p7"),
    op(0x5d00, 0x5dff, 1,    2, 14, Z8000::st_l,      "ldl %a%x2,%l3"),
    op(0x5e00, 0x5eff, 1,    2,  8, Z8000::jp_cc,     "jp %c3,%a%x2"),
    op(0x5f00, 0x5ff0, 0x10, 2, 12, Z8000::call_op,   "call %a%x2"),

    // --- Byte/word loads and stores, DA/X -----------------------------------
    op(0x6000, 0x600f, 1, 2,  9, Z8000::ld_b, "ldb %b3,%a"),
    op(0x6010, 0x60ff, 1, 2, 10, Z8000::ld_b, "ldb %b3,%a(%w2)"),
    op(0x6100, 0x610f, 1, 2,  9, Z8000::ld_w, "ld %w3,%a"),
    op(0x6110, 0x61ff, 1, 2, 10, Z8000::ld_w, "ld %w3,%a(%w2)"),
    op(0x6200, 0x620f, 1, 2, 13, Z8000::res_b, "resb %a,#%i3"),
    op(0x6210, 0x62ff, 1, 2, 14, Z8000::res_b, "resb %a(%w2),#%i3"),
    op(0x6300, 0x630f, 1, 2, 13, Z8000::res_w, "res %a,#%i3"),
    op(0x6310, 0x63ff, 1, 2, 14, Z8000::res_w, "res %a(%w2),#%i3"),
    op(0x6400, 0x640f, 1, 2, 13, Z8000::set_b, "setb %a,#%i3"),
    op(0x6410, 0x64ff, 1, 2, 14, Z8000::set_b, "setb %a(%w2),#%i3"),
    op(0x6500, 0x650f, 1, 2, 13, Z8000::set_w, "set %a,#%i3"),
    op(0x6510, 0x65ff, 1, 2, 14, Z8000::set_w, "set %a(%w2),#%i3"),
    op(0x6600, 0x660f, 1, 2, 10, Z8000::bit_b, "bitb %a,#%i3"),
    op(0x6610, 0x66ff, 1, 2, 11, Z8000::bit_b, "bitb %a(%w2),#%i3"),
    op(0x6700, 0x670f, 1, 2, 10, Z8000::bit_w, "bit %a,#%i3"),
    op(0x6710, 0x67ff, 1, 2, 11, Z8000::bit_w, "bit %a(%w2),#%i3"),
    op(0x6800, 0x680f, 1, 2, 13, Z8000::inc_b, "incb %a,#%p3"),
    op(0x6810, 0x68ff, 1, 2, 14, Z8000::inc_b, "incb %a(%w2),#%p3"),
    op(0x6900, 0x690f, 1, 2, 13, Z8000::inc_w, "inc %a,#%p3"),
    op(0x6910, 0x69ff, 1, 2, 14, Z8000::inc_w, "inc %a(%w2),#%p3"),
    op(0x6a00, 0x6a0f, 1, 2, 13, Z8000::dec_b, "decb %a,#%p3"),
    op(0x6a10, 0x6aff, 1, 2, 14, Z8000::dec_b, "decb %a(%w2),#%p3"),
    op(0x6b00, 0x6b0f, 1, 2, 13, Z8000::dec_w, "dec %a,#%p3"),
    op(0x6b10, 0x6bff, 1, 2, 14, Z8000::dec_w, "dec %a(%w2),#%p3"),
    op(0x6c00, 0x6cff, 1, 2, 15, Z8000::ex_b,  "exb %b3,%a%x2"),
    op(0x6d00, 0x6dff, 1, 2, 15, Z8000::ex_w,  "ex %w3,%a%x2"),
    op(0x6e00, 0x6eff, 1, 2, 11, Z8000::st_b,  "ldb %a%x2,%b3"),
    op(0x6f00, 0x6fff, 1, 2, 11, Z8000::st_w,  "ld %a%x2,%w3"),

    // --- Base-index forms ---------------------------------------------------
    op(0x7010, 0x70ff, 1, 2, 14, Z8000::ld_bx_b, "ldb %b3,%r2(%w5)"),
    op(0x7110, 0x71ff, 1, 2, 14, Z8000::ld_bx_w, "ld %w3,%r2(%w5)"),
    op(0x7210, 0x72ff, 1, 2, 14, Z8000::st_bx_b, "ldb %r2(%w5),%b3"),
    op(0x7310, 0x73ff, 1, 2, 14, Z8000::st_bx_w, "ld %r2(%w5),%w3"),
    op(0x7410, 0x74ff, 1, 2, 15, Z8000::lda_bx,  "lda %r3,%r2(%w5)"),
    op(0x7510, 0x75ff, 1, 2, 17, Z8000::ld_bx_l, "ldl %l3,%r2(%w5)"),
    op(0x7600, 0x760f, 1, 2, 12, Z8000::lda,     "lda %r3,%a"),
    op(0x7610, 0x76ff, 1, 2, 13, Z8000::lda,     "lda %r3,%a(%w2)"),
    op(0x7710, 0x77ff, 1, 2, 17, Z8000::st_bx_l, "ldl %r2(%w5),%l3"),

    // --- System control ------------------------------------------------------
    op(0x7a00, 0x7a00, 1,    1,  8, Z8000::halt, "halt"),
    op(0x7b00, 0x7b00, 1,    1, 13, Z8000::iret, "iret"),
    op(0x7b08, 0x7b08, 1,    1,  5, Z8000::mset, "mset"),
    op(0x7b09, 0x7b09, 1,    1,  5, Z8000::mres, "mres"),
    op(0x7b0a, 0x7b0a, 1,    1,  7, Z8000::mbit, "mbit"),
    op(0x7b0d, 0x7bfd, 0x10, 1, 12, Z8000::mreq, "mreq %w2"),
    op(0x7c00, 0x7c03, 1,    1,  7, Z8000::di,   "di %v"),
    op(0x7c04, 0x7c07, 1,    1,  7, Z8000::ei,   "ei %v"),
    op(0x7d02, 0x7df2, 0x10, 1,  7, Z8000::ldctl_from, "ldctl %w2,fcw"),
    op(0x7d03, 0x7df3, 0x10, 1,  7, Z8000::ldctl_from, "ldctl %w2,refresh"),
    op(0x7d04, 0x7df4, 0x10, 1,  7, Z8000::ldctl_from, "ldctl %w2,psapseg"),
    op(0x7d05, 0x7df5, 0x10, 1,  7, Z8000::ldctl_from, "ldctl %w2,psapoff"),
    op(0x7d06, 0x7df6, 0x10, 1,  7, Z8000::ldctl_from, "ldctl %w2,nspseg"),
    op(0x7d07, 0x7df7, 0x10, 1,  7, Z8000::ldctl_from, "ldctl %w2,nspoff"),
    op(0x7d0a, 0x7dfa, 0x10, 1,  7, Z8000::ldctl_to,   "ldctl fcw,%w2"),
    op(0x7d0b, 0x7dfb, 0x10, 1,  7, Z8000::ldctl_to,   "ldctl refresh,%w2"),
    op(0x7d0c, 0x7dfc, 0x10, 1,  7, Z8000::ldctl_to,   "ldctl psapseg,%w2"),
    op(0x7d0d, 0x7dfd, 0x10, 1,  7, Z8000::ldctl_to,   "ldctl psapoff,%w2"),
    op(0x7d0e, 0x7dfe, 0x10, 1,  7, Z8000::ldctl_to,   "ldctl nspseg,%w2"),
    op(0x7d0f, 0x7dff, 0x10, 1,  7, Z8000::ldctl_to,   "ldctl nspoff,%w2"),
    op(0x7f00, 0x7fff, 1,    1, 33, Z8000::sc,          "sc #%s"),

    // --- Byte/word arithmetic and logic, register column --------------------
    op(0x8000, 0x80ff, 1, 1, 4, Z8000::add_b, "addb %b3,%b2"),
    op(0x8100, 0x81ff, 1, 1, 4, Z8000::add_w, "add %w3,%w2"),
    op(0x8200, 0x82ff, 1, 1, 4, Z8000::sub_b, "subb %b3,%b2"),
    op(0x8300, 0x83ff, 1, 1, 4, Z8000::sub_w, "sub %w3,%w2"),
    op(0x8400, 0x84ff, 1, 1, 4, Z8000::or_b,  "orb %b3,%b2"),
    op(0x8500, 0x85ff, 1, 1, 4, Z8000::or_w,  "or %w3,%w2"),
    op(0x8600, 0x86ff, 1, 1, 4, Z8000::and_b, "andb %b3,%b2"),
    op(0x8700, 0x87ff, 1, 1, 4, Z8000::and_w, "and %w3,%w2"),
    op(0x8800, 0x88ff, 1, 1, 4, Z8000::xor_b, "xorb %b3,%b2"),
    op(0x8900, 0x89ff, 1, 1, 4, Z8000::xor_w, "xor %w3,%w2"),
    op(0x8a00, 0x8aff, 1, 1, 4, Z8000::cp_b,  "cpb %b3,%b2"),
    op(0x8b00, 0x8bff, 1, 1, 4, Z8000::cp_w,  "cp %w3,%w2"),

    // --- Single-operand byte group, register --------------------------------
    op(0x8c00, 0x8cf0, 0x10, 1, 7, Z8000::com_b,       "comb %b2"),
    op(0x8c01, 0x8cf1, 0x10, 1, 7, Z8000::ldctlb_from, "ldctlb %b2,flags"),
    op(0x8c02, 0x8cf2, 0x10, 1, 7, Z8000::neg_b,       "negb %b2"),
    op(0x8c04, 0x8cf4, 0x10, 1, 7, Z8000::test_b,      "testb %b2"),
    op(0x8c06, 0x8cf6, 0x10, 1, 7, Z8000::tset_b,      "tsetb %b2"),
    op(0x8c08, 0x8cf8, 0x10, 1, 7, Z8000::clr_b,       "clrb %b2"),
    op(0x8c09, 0x8cf9, 0x10, 1, 7, Z8000::ldctlb_to,   "ldctlb flags,%b2"),

    // --- Single-operand word group, register --------------------------------
    op(0x8d00, 0x8df0, 0x10, 1, 7, Z8000::com_w,  "com %w2"),
    op(0x8d01, 0x8df1, 0x10, 1, 7, Z8000::setflg, "setflg %f"),
    op(0x8d02, 0x8df2, 0x10, 1, 7, Z8000::neg_w,  "neg %w2"),
    op(0x8d03, 0x8df3, 0x10, 1, 7, Z8000::resflg, "resflg %f"),
    op(0x8d04, 0x8df4, 0x10, 1, 7, Z8000::test_w, "test %w2"),
    op(0x8d05, 0x8df5, 0x10, 1, 7, Z8000::comflg, "comflg %f"),
    op(0x8d06, 0x8df6, 0x10, 1, 7, Z8000::tset_w, "tset %w2"),
    op(0x8d07, 0x8d07, 1,    1, 7, Z8000::nop,    "nop"),
    op(0x8d08, 0x8df8, 0x10, 1, 7, Z8000::clr_w,  "clr %w2"),

    // --- Long column, register ----------------------------------------------
    op(0x9000, 0x90ff, 1,    1,  8, Z8000::cp_l,      "cpl %l3,%l2"),
    op(0x9110, 0x91ff, 1,    1, 12, Z8000::push_l_op, "pushl %@2,%l3"),
    op(0x9200, 0x92ff, 1,    1,  8, Z8000::sub_l,     "subl %l3,%l2"),
    op(0x9310, 0x93ff, 1,    1,  9, Z8000::push_w_op, "push %@2,%w3"),
    op(0x9400, 0x94ff, 1,    1,  5, Z8000::ld_l,      "ldl %l3,%l2"),
    op(0x9510, 0x95ff, 1,    1, 12, Z8000::pop_l_op,  "popl %l3,%@2"),
    op(0x9600, 0x96ff, 1,    1,  8, Z8000::add_l,     "addl %l3,%l2"),
    op(0x9710, 0x97ff, 1,    1,  8, Z8000::pop_w_op,  "pop %w3,%@2"),
    op(0x9800, 0x98ff, 1,    1, 12, Z8000::mult_l,    "multl %q3,%l2"),
    op(0x9900, 0x99ff, 1,    1, 10, Z8000::mult_w,    "mult %l3,%w2"),
    op(0x9a00, 0x9aff, 1,    1, 12, Z8000::div_l,     "divl %q3,%l2"),
    op(0x9b00, 0x9bff, 1,    1, 10, Z8000::div_w,     "div %l3,%w2"),
    op(0x9c08, 0x9cf8, 0x10, 1, 13, Z8000::test_l,    "testl %l2"),
    op(0x9e00, 0x9e0f, 1,    1, 10, Z8000::ret_cc,    "ret %c3"),

    // --- Byte/word loads, register ------------------------------------------
    op(0xa000, 0xa0ff, 1, 1, 3, Z8000::ld_b, "ldb %b3,%b2"),
    op(0xa100, 0xa1ff, 1, 1, 3, Z8000::ld_w, "ld %w3,%w2"),

    // --- Bit operations, register static ------------------------------------
    op(0xa200, 0xa2ff, 1, 1, 4, Z8000::res_b, "resb %b2,#%i3"),
    op(0xa300, 0xa3ff, 1, 1, 4, Z8000::res_w, "res %w2,#%i3"),
    op(0xa400, 0xa4ff, 1, 1, 4, Z8000::set_b, "setb %b2,#%i3"),
    op(0xa500, 0xa5ff, 1, 1, 4, Z8000::set_w, "set %w2,#%i3"),
    op(0xa600, 0xa6ff, 1, 1, 4, Z8000::bit_b, "bitb %b2,#%i3"),
    op(0xa700, 0xa7ff, 1, 1, 4, Z8000::bit_w, "bit %w2,#%i3"),

    // --- Increment/decrement/exchange, register -----------------------------
    op(0xa800, 0xa8ff, 1, 1, 4, Z8000::inc_b, "incb %b2,#%p3"),
    op(0xa900, 0xa9ff, 1, 1, 4, Z8000::inc_w, "inc %w2,#%p3"),
    op(0xaa00, 0xaaff, 1, 1, 4, Z8000::dec_b, "decb %b2,#%p3"),
    op(0xab00, 0xabff, 1, 1, 4, Z8000::dec_w, "dec %w2,#%p3"),
    op(0xac00, 0xacff, 1, 1, 6, Z8000::ex_b,  "exb %b3,%b2"),
    op(0xad00, 0xadff, 1, 1, 6, Z8000::ex_w,  "ex %w3,%w2"),
    op(0xae00, 0xaeff, 1, 1, 5, Z8000::tcc_b, "tccb %c3,%b2"),
    op(0xaf00, 0xafff, 1, 1, 5, Z8000::tcc_w, "tcc %c3,%w2"),

    // --- Decimal adjust, sign extend ----------------------------------------
    op(0xb000, 0xb0f0, 0x10, 1,  5, Z8000::dab,    "dab %b2"),
    op(0xb100, 0xb1f0, 0x10, 1, 11, Z8000::exts_b, "extsb %w2"),
    op(0xb107, 0xb1f7, 0x10, 1, 11, Z8000::exts_l, "extsl %q2"),
    op(0xb10a, 0xb1fa, 0x10, 1, 11, Z8000::exts_w, "exts %l2"),

    // --- Byte shifts and rotates --------------------------------------------
    op(0xb200, 0xb2f0, 0x10, 1,  6, Z8000::rl_b,  "rlb %b2,#1"),
    op(0xb202, 0xb2f2, 0x10, 1,  6, Z8000::rl_b,  "rlb %b2,#2"),
    op(0xb204, 0xb2f4, 0x10, 1,  6, Z8000::rlc_b, "rlcb %b2,#1"),
    op(0xb206, 0xb2f6, 0x10, 1,  6, Z8000::rlc_b, "rlcb %b2,#2"),
    op(0xb208, 0xb2f8, 0x10, 1,  6, Z8000::rr_b,  "rrb %b2,#1"),
    op(0xb20a, 0xb2fa, 0x10, 1,  6, Z8000::rr_b,  "rrb %b2,#2"),
    op(0xb20c, 0xb2fc, 0x10, 1,  6, Z8000::rrc_b, "rrcb %b2,#1"),
    op(0xb20e, 0xb2fe, 0x10, 1,  6, Z8000::rrc_b, "rrcb %b2,#2"),
    op(0xb201, 0xb2f1, 0x10, 2, 13, Z8000::sll_b, "sllb %b2,#%#i"),
    op(0xb203, 0xb2f3, 0x10, 2, 15, Z8000::sdl_b, "sdlb %b2,%w5"),
    op(0xb209, 0xb2f9, 0x10, 2, 13, Z8000::sla_b, "slab %b2,#%#i"),
    op(0xb20b, 0xb2fb, 0x10, 2, 15, Z8000::sda_b, "sdab %b2,%w5"),

    // --- Word and long shifts and rotates -----------------------------------
    op(0xb300, 0xb3f0, 0x10, 1,  6, Z8000::rl_w,  "rl %w2,#1"),
    op(0xb302, 0xb3f2, 0x10, 1,  6, Z8000::rl_w,  "rl %w2,#2"),
    op(0xb304, 0xb3f4, 0x10, 1,  6, Z8000::rlc_w, "rlc %w2,#1"),
    op(0xb306, 0xb3f6, 0x10, 1,  6, Z8000::rlc_w, "rlc %w2,#2"),
    op(0xb308, 0xb3f8, 0x10, 1,  6, Z8000::rr_w,  "rr %w2,#1"),
    op(0xb30a, 0xb3fa, 0x10, 1,  6, Z8000::rr_w,  "rr %w2,#2"),
    op(0xb30c, 0xb3fc, 0x10, 1,  6, Z8000::rrc_w, "rrc %w2,#1"),
    op(0xb30e, 0xb3fe, 0x10, 1,  6, Z8000::rrc_w, "rrc %w2,#2"),
    op(0xb301, 0xb3f1, 0x10, 2, 13, Z8000::sll_w, "sll %w2,#%#i"),
    op(0xb305, 0xb3f5, 0x10, 2, 13, Z8000::sll_l, "slll %l2,#%#i"),
    op(0xb309, 0xb3f9, 0x10, 2, 13, Z8000::sla_w, "sla %w2,#%#i"),
    op(0xb30d, 0xb3fd, 0x10, 2, 13, Z8000::sla_l, "slal %l2,#%#i"),
    op(0xb303, 0xb3f3, 0x10, 2, 15, Z8000::sdl_w, "sdl %w2,%w5"),
    op(0xb307, 0xb3f7, 0x10, 2, 15, Z8000::sdl_l, "sdll %l2,%w5"),
    op(0xb30b, 0xb3fb, 0x10, 2, 15, Z8000::sda_w, "sda %w2,%w5"),
    op(0xb30f, 0xb3ff, 0x10, 2, 15, Z8000::sda_l, "sdal %l2,%w5"),

    // --- Add/subtract with carry (register only) ----------------------------
    op(0xb400, 0xb4ff, 1, 1, 5, Z8000::adc_b, "adcb %b3,%b2"),
    op(0xb500, 0xb5ff, 1, 1, 5, Z8000::adc_w, "adc %w3,%w2"),
    op(0xb600, 0xb6ff, 1, 1, 5, Z8000::sbc_b, "sbcb %b3,%b2"),
    op(0xb700, 0xb7ff, 1, 1, 5, Z8000::sbc_w, "sbc %w3,%w2"),

    // --- Translate ----------------------------------------------------------
    op(0xb810, 0xb8f0, 0x10, 2, 25, Z8000::translate,      "trib %@2,%w6,%w5"),
    op(0xb812, 0xb8f2, 0x10, 2, 25, Z8000::translate_test, "trtib %@2,%w6,%w5"),
    op(0xb814, 0xb8f4, 0x10, 2, 25, Z8000::translate,      "trirb %@2,%w6,%w5"),
    op(0xb816, 0xb8f6, 0x10, 2, 25, Z8000::translate_test, "trtirb %@2,%w6,%w5"),
    op(0xb818, 0xb8f8, 0x10, 2, 25, Z8000::translate,      "trdb %@2,%w6,%w5"),
    op(0xb81a, 0xb8fa, 0x10, 2, 25, Z8000::translate_test, "trtdb %@2,%w6,%w5"),
    op(0xb81c, 0xb8fc, 0x10, 2, 25, Z8000::translate,      "trdrb %@2,%w6,%w5"),
    op(0xb81e, 0xb8fe, 0x10, 2, 25, Z8000::translate_test, "trtdrb %@2,%w6,%w5"),

    // --- Byte strings -------------------------------------------------------
    op(0xba10, 0xbaf0, 0x10, 2, 20, Z8000::cp_string_b,  "cpib %b6,%@2,%w5,%c7"),
    op(0xba11, 0xbaf1, 0x10, 2, 20, Z8000::ld_string_b,  "ldi%?b %@6,%@2,%w5"),
    op(0xba12, 0xbaf2, 0x10, 2, 25, Z8000::cps_string_b, "cpsib %@6,%@2,%w5,%c7"),
    op(0xba14, 0xbaf4, 0x10, 2, 20, Z8000::cp_string_b,  "cpirb %b6,%@2,%w5,%c7"),
    op(0xba16, 0xbaf6, 0x10, 2, 25, Z8000::cps_string_b, "cpsirb %@6,%@2,%w5,%c7"),
    op(0xba18, 0xbaf8, 0x10, 2, 20, Z8000::cp_string_b,  "cpdb %b6,%@2,%w5,%c7"),
    op(0xba19, 0xbaf9, 0x10, 2, 20, Z8000::ld_string_b,  "ldd%?b %@6,%@2,%w5"),
    op(0xba1a, 0xbafa, 0x10, 2, 25, Z8000::cps_string_b, "cpsdb %@6,%@2,%w5,%c7"),
    op(0xba1c, 0xbafc, 0x10, 2, 20, Z8000::cp_string_b,  "cpdrb %b6,%@2,%w5,%c7"),
    op(0xba1e, 0xbafe, 0x10, 2, 25, Z8000::cps_string_b, "cpsdrb %@6,%@2,%w5,%c7"),

    // --- Word strings -------------------------------------------------------
    op(0xbb10, 0xbbf0, 0x10, 2, 20, Z8000::cp_string_w,  "cpi %w6,%@2,%w5,%c7"),
    op(0xbb11, 0xbbf1, 0x10, 2, 20, Z8000::ld_string_w,  "ldi%? %@6,%@2,%w5"),
    op(0xbb12, 0xbbf2, 0x10, 2, 25, Z8000::cps_string_w, "cpsi %@6,%@2,%w5,%c7"),
    op(0xbb14, 0xbbf4, 0x10, 2, 20, Z8000::cp_string_w,  "cpir %w6,%@2,%w5,%c7"),
    op(0xbb16, 0xbbf6, 0x10, 2, 25, Z8000::cps_string_w, "cpsir %@6,%@2,%w5,%c7"),
    op(0xbb18, 0xbbf8, 0x10, 2, 20, Z8000::cp_string_w,  "cpd %w6,%@2,%w5,%c7"),
    op(0xbb19, 0xbbf9, 0x10, 2, 20, Z8000::ld_string_w,  "ldd%? %@6,%@2,%w5"),
    op(0xbb1a, 0xbbfa, 0x10, 2, 25, Z8000::cps_string_w, "cpsd %@6,%@2,%w5,%c7"),
    op(0xbb1c, 0xbbfc, 0x10, 2, 20, Z8000::cp_string_w,  "cpdr %w6,%@2,%w5,%c7"),
    op(0xbb1e, 0xbbfe, 0x10, 2, 25, Z8000::cps_string_w, "cpsdr %@6,%@2,%w5,%c7"),

    // --- Digit rotates, LDK -------------------------------------------------
    op(0xbc00, 0xbcff, 1, 1, 9, Z8000::rrdb, "rrdb %b3,%b2"),
    op(0xbd00, 0xbdff, 1, 1, 5, Z8000::ldk,  "ldk %w2,#%i3"),
    op(0xbe00, 0xbeff, 1, 1, 9, Z8000::rldb, "rldb %b3,%b2"),

    // --- Short-form immediates and relative branches ------------------------
    op(0xc000, 0xcfff, 1, 1,  5, Z8000::ldb_short, "ldb %b1,#%s"),
    op(0xd000, 0xdfff, 1, 1, 15, Z8000::calr,      "calr %d12"),
    op(0xe000, 0xefff, 1, 1,  6, Z8000::jr_cc,     "jr %c1,%d8"),
    op_span(0xf000, 0xff00, 0x100, 0x80, 1, 11, Z8000::djnz, "dbjnz %b1,%d7"),
    op_span(0xf080, 0xff80, 0x100, 0x80, 1, 11, Z8000::djnz, "djnz %w1,%d7"),
];

/// Flat opcode → table-entry index, built on first use.
static EXEC: Lazy<Vec<u16>> = Lazy::new(|| {
    let mut exec = vec![0u16; 0x10000];
    for (idx, entry) in TABLE.iter().enumerate() {
        let mut base = u32::from(entry.beg);
        while base <= u32::from(entry.end) {
            for offset in 0..u32::from(entry.span) {
                exec[(base + offset) as usize] = idx as u16;
            }
            if entry.step == 0 {
                break;
            }
            base += u32::from(entry.step);
        }
    }
    exec
});

/// Dispatch-table entry for an opcode word.
pub(crate) fn entry_for(opcode: u16) -> &'static OpEntry {
    &TABLE[usize::from(EXEC[usize::from(opcode)])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_opcode_has_an_entry() {
        // The exec index is fully populated; entry 0 is the catch-all.
        for opcode in 0..=0xffffu16 {
            let entry = entry_for(opcode);
            assert!(entry.beg <= entry.end);
            assert!(entry.size >= 1 && entry.size <= 3, "size for {opcode:#06x}");
            assert!(entry.cycles > 0, "cycles for {opcode:#06x}");
        }
    }

    #[test]
    fn known_encodings_resolve() {
        assert_eq!(entry_for(0x8d07).dasm, "nop");
        assert_eq!(entry_for(0x7a00).dasm, "halt");
        assert_eq!(entry_for(0x8121).dasm, "add %w3,%w2");
        assert_eq!(entry_for(0x9b74).dasm, "div %l3,%w2");
        assert_eq!(entry_for(0x7b00).dasm, "iret");
        assert_eq!(entry_for(0xe800).dasm, "jr %c1,%d8");
        assert_eq!(entry_for(0xc123).dasm, "ldb %b1,#%s");
        assert_eq!(entry_for(0xd123).dasm, "calr %d12");
        // DJNZ rows interleave byte and word forms on bit 7.
        assert_eq!(entry_for(0xf17f).dasm, "dbjnz %b1,%d7");
        assert_eq!(entry_for(0xf180).dasm, "djnz %w1,%d7");
        // Later entries win where ranges overlap.
        assert_eq!(entry_for(0x0c13).dasm, "rsvd");
    }
}
