//! Opcode decode table.
//!
//! Every documented NMOS 6502 opcode maps to exactly one
//! (mnemonic, addressing mode) pair. Dispatch goes through this single
//! exhaustive table, so adding an opcode is a one-line entry here plus a
//! handler arm in the executor - addressing logic is never re-derived per
//! opcode. Bytes absent from the table (the undocumented opcodes) decode to
//! `None` and surface as `UnknownOpcode` errors.

/// How an opcode's operand (or operand address) is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// No operand (e.g. CLC, RTS).
    Implied,
    /// Operates on the accumulator (e.g. ASL A).
    Accumulator,
    /// `#$nn` - the operand is the next instruction byte itself.
    Immediate,
    /// `$nn` - 8-bit address into page zero.
    ZeroPage,
    /// `$nn,X` - zero-page address plus X, wrapping within page zero.
    ZeroPageX,
    /// `$nn,Y` - zero-page address plus Y, wrapping within page zero.
    ZeroPageY,
    /// `$nnnn` - full 16-bit address, little-endian.
    Absolute,
    /// `$nnnn,X` - absolute plus X; crossing a page costs an extra cycle.
    AbsoluteX,
    /// `$nnnn,Y` - absolute plus Y; crossing a page costs an extra cycle.
    AbsoluteY,
    /// `($nnnn)` - JMP only, with the NMOS page-wrap bug.
    Indirect,
    /// `($nn,X)` - pointer in page zero indexed by X.
    IndexedIndirect,
    /// `($nn),Y` - page-zero pointer, then indexed by Y.
    IndirectIndexed,
    /// Branch offset, -128 to +127 relative to the next instruction.
    Relative,
}

/// Operation family member an opcode belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

/// A decoded instruction: which operation, and how its operand is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub mode: AddrMode,
}

const fn bind(mnemonic: Mnemonic, mode: AddrMode) -> Option<Instruction> {
    Some(Instruction { mnemonic, mode })
}

/// Decode an opcode byte, or `None` if no documented opcode is bound.
#[must_use]
pub const fn decode(opcode: u8) -> Option<Instruction> {
    use AddrMode::{
        Absolute, AbsoluteX, AbsoluteY, Accumulator, Immediate, Implied, IndexedIndirect,
        Indirect, IndirectIndexed, Relative, ZeroPage, ZeroPageX, ZeroPageY,
    };
    use Mnemonic::{
        Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli, Clv,
        Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop,
        Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax,
        Tay, Tsx, Txa, Txs, Tya,
    };

    match opcode {
        // Load/store
        0xA9 => bind(Lda, Immediate),
        0xA5 => bind(Lda, ZeroPage),
        0xB5 => bind(Lda, ZeroPageX),
        0xAD => bind(Lda, Absolute),
        0xBD => bind(Lda, AbsoluteX),
        0xB9 => bind(Lda, AbsoluteY),
        0xA1 => bind(Lda, IndexedIndirect),
        0xB1 => bind(Lda, IndirectIndexed),

        0xA2 => bind(Ldx, Immediate),
        0xA6 => bind(Ldx, ZeroPage),
        0xB6 => bind(Ldx, ZeroPageY),
        0xAE => bind(Ldx, Absolute),
        0xBE => bind(Ldx, AbsoluteY),

        0xA0 => bind(Ldy, Immediate),
        0xA4 => bind(Ldy, ZeroPage),
        0xB4 => bind(Ldy, ZeroPageX),
        0xAC => bind(Ldy, Absolute),
        0xBC => bind(Ldy, AbsoluteX),

        0x85 => bind(Sta, ZeroPage),
        0x95 => bind(Sta, ZeroPageX),
        0x8D => bind(Sta, Absolute),
        0x9D => bind(Sta, AbsoluteX),
        0x99 => bind(Sta, AbsoluteY),
        0x81 => bind(Sta, IndexedIndirect),
        0x91 => bind(Sta, IndirectIndexed),

        0x86 => bind(Stx, ZeroPage),
        0x96 => bind(Stx, ZeroPageY),
        0x8E => bind(Stx, Absolute),

        0x84 => bind(Sty, ZeroPage),
        0x94 => bind(Sty, ZeroPageX),
        0x8C => bind(Sty, Absolute),

        // Register transfers
        0xAA => bind(Tax, Implied),
        0xA8 => bind(Tay, Implied),
        0x8A => bind(Txa, Implied),
        0x98 => bind(Tya, Implied),
        0xBA => bind(Tsx, Implied),
        0x9A => bind(Txs, Implied),

        // Stack operations
        0x48 => bind(Pha, Implied),
        0x08 => bind(Php, Implied),
        0x68 => bind(Pla, Implied),
        0x28 => bind(Plp, Implied),

        // Logic
        0x29 => bind(And, Immediate),
        0x25 => bind(And, ZeroPage),
        0x35 => bind(And, ZeroPageX),
        0x2D => bind(And, Absolute),
        0x3D => bind(And, AbsoluteX),
        0x39 => bind(And, AbsoluteY),
        0x21 => bind(And, IndexedIndirect),
        0x31 => bind(And, IndirectIndexed),

        0x49 => bind(Eor, Immediate),
        0x45 => bind(Eor, ZeroPage),
        0x55 => bind(Eor, ZeroPageX),
        0x4D => bind(Eor, Absolute),
        0x5D => bind(Eor, AbsoluteX),
        0x59 => bind(Eor, AbsoluteY),
        0x41 => bind(Eor, IndexedIndirect),
        0x51 => bind(Eor, IndirectIndexed),

        0x09 => bind(Ora, Immediate),
        0x05 => bind(Ora, ZeroPage),
        0x15 => bind(Ora, ZeroPageX),
        0x0D => bind(Ora, Absolute),
        0x1D => bind(Ora, AbsoluteX),
        0x19 => bind(Ora, AbsoluteY),
        0x01 => bind(Ora, IndexedIndirect),
        0x11 => bind(Ora, IndirectIndexed),

        0x24 => bind(Bit, ZeroPage),
        0x2C => bind(Bit, Absolute),

        // Arithmetic
        0x69 => bind(Adc, Immediate),
        0x65 => bind(Adc, ZeroPage),
        0x75 => bind(Adc, ZeroPageX),
        0x6D => bind(Adc, Absolute),
        0x7D => bind(Adc, AbsoluteX),
        0x79 => bind(Adc, AbsoluteY),
        0x61 => bind(Adc, IndexedIndirect),
        0x71 => bind(Adc, IndirectIndexed),

        0xE9 => bind(Sbc, Immediate),
        0xE5 => bind(Sbc, ZeroPage),
        0xF5 => bind(Sbc, ZeroPageX),
        0xED => bind(Sbc, Absolute),
        0xFD => bind(Sbc, AbsoluteX),
        0xF9 => bind(Sbc, AbsoluteY),
        0xE1 => bind(Sbc, IndexedIndirect),
        0xF1 => bind(Sbc, IndirectIndexed),

        // Compares
        0xC9 => bind(Cmp, Immediate),
        0xC5 => bind(Cmp, ZeroPage),
        0xD5 => bind(Cmp, ZeroPageX),
        0xCD => bind(Cmp, Absolute),
        0xDD => bind(Cmp, AbsoluteX),
        0xD9 => bind(Cmp, AbsoluteY),
        0xC1 => bind(Cmp, IndexedIndirect),
        0xD1 => bind(Cmp, IndirectIndexed),

        0xE0 => bind(Cpx, Immediate),
        0xE4 => bind(Cpx, ZeroPage),
        0xEC => bind(Cpx, Absolute),

        0xC0 => bind(Cpy, Immediate),
        0xC4 => bind(Cpy, ZeroPage),
        0xCC => bind(Cpy, Absolute),

        // Increments/decrements
        0xE6 => bind(Inc, ZeroPage),
        0xF6 => bind(Inc, ZeroPageX),
        0xEE => bind(Inc, Absolute),
        0xFE => bind(Inc, AbsoluteX),
        0xE8 => bind(Inx, Implied),
        0xC8 => bind(Iny, Implied),

        0xC6 => bind(Dec, ZeroPage),
        0xD6 => bind(Dec, ZeroPageX),
        0xCE => bind(Dec, Absolute),
        0xDE => bind(Dec, AbsoluteX),
        0xCA => bind(Dex, Implied),
        0x88 => bind(Dey, Implied),

        // Shifts and rotates
        0x0A => bind(Asl, Accumulator),
        0x06 => bind(Asl, ZeroPage),
        0x16 => bind(Asl, ZeroPageX),
        0x0E => bind(Asl, Absolute),
        0x1E => bind(Asl, AbsoluteX),

        0x4A => bind(Lsr, Accumulator),
        0x46 => bind(Lsr, ZeroPage),
        0x56 => bind(Lsr, ZeroPageX),
        0x4E => bind(Lsr, Absolute),
        0x5E => bind(Lsr, AbsoluteX),

        0x2A => bind(Rol, Accumulator),
        0x26 => bind(Rol, ZeroPage),
        0x36 => bind(Rol, ZeroPageX),
        0x2E => bind(Rol, Absolute),
        0x3E => bind(Rol, AbsoluteX),

        0x6A => bind(Ror, Accumulator),
        0x66 => bind(Ror, ZeroPage),
        0x76 => bind(Ror, ZeroPageX),
        0x6E => bind(Ror, Absolute),
        0x7E => bind(Ror, AbsoluteX),

        // Jumps and calls
        0x4C => bind(Jmp, Absolute),
        0x6C => bind(Jmp, Indirect),
        0x20 => bind(Jsr, Absolute),
        0x60 => bind(Rts, Implied),

        // Branches
        0x90 => bind(Bcc, Relative),
        0xB0 => bind(Bcs, Relative),
        0xF0 => bind(Beq, Relative),
        0x30 => bind(Bmi, Relative),
        0xD0 => bind(Bne, Relative),
        0x10 => bind(Bpl, Relative),
        0x50 => bind(Bvc, Relative),
        0x70 => bind(Bvs, Relative),

        // Flag operations
        0x18 => bind(Clc, Implied),
        0xD8 => bind(Cld, Implied),
        0x58 => bind(Cli, Implied),
        0xB8 => bind(Clv, Implied),
        0x38 => bind(Sec, Implied),
        0xF8 => bind(Sed, Implied),
        0x78 => bind(Sei, Implied),

        // System
        0x00 => bind(Brk, Implied),
        0x40 => bind(Rti, Implied),
        0xEA => bind(Nop, Implied),

        _ => None,
    }
}
