//! Opcode table.
//!
//! Numbering follows DWARF expression opcodes where an equivalent exists;
//! `load_external` and `call` live in the vendor range.

use std::fmt;

/// One bytecode opcode. Literal pushes are folded into [`Opcode::Lit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    Deref,
    Const1u,
    Const1s,
    Const2u,
    Const2s,
    Const4u,
    Const4s,
    Const8u,
    Const8s,
    Dup,
    Drop,
    Over,
    Pick,
    Swap,
    Rot,
    Abs,
    And,
    Div,
    Minus,
    Mod,
    Mul,
    Neg,
    Not,
    Or,
    Plus,
    Shl,
    Shr,
    Shra,
    Xor,
    Bra,
    Eq,
    Ge,
    Gt,
    Le,
    Lt,
    Ne,
    Skip,
    /// `lit0` through `lit31`.
    Lit(u8),
    LoadExternal,
    Call,
}

/// How the bytes following an opcode are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    None,
    Unsigned(usize),
    Signed(usize),
    /// `pick` slot index, one byte.
    Index,
    /// Branch offset, `i16` relative to the end of the instruction.
    Offset,
    /// Externals table index, `u16`.
    External,
}

impl OperandKind {
    pub fn width(self) -> usize {
        match self {
            Self::None => 0,
            Self::Unsigned(w) | Self::Signed(w) => w,
            Self::Index => 1,
            Self::Offset | Self::External => 2,
        }
    }
}

pub const LIT0: u8 = 0x30;
pub const LIT_MAX: u8 = 31;

impl Opcode {
    pub fn code(self) -> u8 {
        match self {
            Self::Deref => 0x06,
            Self::Const1u => 0x08,
            Self::Const1s => 0x09,
            Self::Const2u => 0x0a,
            Self::Const2s => 0x0b,
            Self::Const4u => 0x0c,
            Self::Const4s => 0x0d,
            Self::Const8u => 0x0e,
            Self::Const8s => 0x0f,
            Self::Dup => 0x12,
            Self::Drop => 0x13,
            Self::Over => 0x14,
            Self::Pick => 0x15,
            Self::Swap => 0x16,
            Self::Rot => 0x17,
            Self::Abs => 0x19,
            Self::And => 0x1a,
            Self::Div => 0x1b,
            Self::Minus => 0x1c,
            Self::Mod => 0x1d,
            Self::Mul => 0x1e,
            Self::Neg => 0x1f,
            Self::Not => 0x20,
            Self::Or => 0x21,
            Self::Plus => 0x22,
            Self::Shl => 0x24,
            Self::Shr => 0x25,
            Self::Shra => 0x26,
            Self::Xor => 0x27,
            Self::Bra => 0x28,
            Self::Eq => 0x29,
            Self::Ge => 0x2a,
            Self::Gt => 0x2b,
            Self::Le => 0x2c,
            Self::Lt => 0x2d,
            Self::Ne => 0x2e,
            Self::Skip => 0x2f,
            Self::Lit(n) => LIT0 + n,
            Self::LoadExternal => 0xe0,
            Self::Call => 0xe1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        let op = match code {
            0x06 => Self::Deref,
            0x08 => Self::Const1u,
            0x09 => Self::Const1s,
            0x0a => Self::Const2u,
            0x0b => Self::Const2s,
            0x0c => Self::Const4u,
            0x0d => Self::Const4s,
            0x0e => Self::Const8u,
            0x0f => Self::Const8s,
            0x12 => Self::Dup,
            0x13 => Self::Drop,
            0x14 => Self::Over,
            0x15 => Self::Pick,
            0x16 => Self::Swap,
            0x17 => Self::Rot,
            0x19 => Self::Abs,
            0x1a => Self::And,
            0x1b => Self::Div,
            0x1c => Self::Minus,
            0x1d => Self::Mod,
            0x1e => Self::Mul,
            0x1f => Self::Neg,
            0x20 => Self::Not,
            0x21 => Self::Or,
            0x22 => Self::Plus,
            0x24 => Self::Shl,
            0x25 => Self::Shr,
            0x26 => Self::Shra,
            0x27 => Self::Xor,
            0x28 => Self::Bra,
            0x29 => Self::Eq,
            0x2a => Self::Ge,
            0x2b => Self::Gt,
            0x2c => Self::Le,
            0x2d => Self::Lt,
            0x2e => Self::Ne,
            0x2f => Self::Skip,
            c @ 0x30..=0x4f => Self::Lit(c - LIT0),
            0xe0 => Self::LoadExternal,
            0xe1 => Self::Call,
            _ => return None,
        };
        Some(op)
    }

    pub fn operand_kind(self) -> OperandKind {
        match self {
            Self::Const1u => OperandKind::Unsigned(1),
            Self::Const1s => OperandKind::Signed(1),
            Self::Const2u => OperandKind::Unsigned(2),
            Self::Const2s => OperandKind::Signed(2),
            Self::Const4u => OperandKind::Unsigned(4),
            Self::Const4s => OperandKind::Signed(4),
            Self::Const8u => OperandKind::Unsigned(8),
            Self::Const8s => OperandKind::Signed(8),
            Self::Pick => OperandKind::Index,
            Self::Bra | Self::Skip => OperandKind::Offset,
            Self::LoadExternal => OperandKind::External,
            _ => OperandKind::None,
        }
    }

    /// Encoded size including the opcode byte.
    pub fn size(self) -> usize {
        1 + self.operand_kind().width()
    }

    pub fn is_branch(self) -> bool {
        matches!(self, Self::Bra | Self::Skip)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Deref => "deref",
            Self::Const1u => "const1u",
            Self::Const1s => "const1s",
            Self::Const2u => "const2u",
            Self::Const2s => "const2s",
            Self::Const4u => "const4u",
            Self::Const4s => "const4s",
            Self::Const8u => "const8u",
            Self::Const8s => "const8s",
            Self::Dup => "dup",
            Self::Drop => "drop",
            Self::Over => "over",
            Self::Pick => "pick",
            Self::Swap => "swap",
            Self::Rot => "rot",
            Self::Abs => "abs",
            Self::And => "and",
            Self::Div => "div",
            Self::Minus => "minus",
            Self::Mod => "mod",
            Self::Mul => "mul",
            Self::Neg => "neg",
            Self::Not => "not",
            Self::Or => "or",
            Self::Plus => "plus",
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::Shra => "shra",
            Self::Xor => "xor",
            Self::Bra => "bra",
            Self::Eq => "eq",
            Self::Ge => "ge",
            Self::Gt => "gt",
            Self::Le => "le",
            Self::Lt => "lt",
            Self::Ne => "ne",
            Self::Skip => "skip",
            Self::Lit(_) => "lit",
            Self::LoadExternal => "load_external",
            Self::Call => "call",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lit(n) => write!(f, "lit{n}"),
            other => f.write_str(other.name()),
        }
    }
}
