//! Decoded instructions, literal selection and per-opcode stack effects.

use std::collections::BTreeSet;
use std::fmt;

use crate::ByteOrder;
use crate::error::FormatError;
use crate::opcode::{LIT_MAX, OperandKind, Opcode};
use crate::reader::Reader;

/// Immediate operand of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    None,
    Unsigned(u64),
    Signed(i64),
    Index(u8),
    Offset(i16),
    External(u16),
}

/// One instruction at a byte offset within the code chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub offset: usize,
    pub opcode: Opcode,
    pub operand: Operand,
}

/// Slots an instruction needs on entry and its net depth change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackEffect {
    pub needs: usize,
    pub delta: isize,
}

impl StackEffect {
    const fn new(needs: usize, delta: isize) -> Self {
        Self { needs, delta }
    }
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: Operand) -> Self {
        Self {
            offset: 0,
            opcode,
            operand,
        }
    }

    /// Instruction without an operand.
    pub fn simple(opcode: Opcode) -> Self {
        Self::new(opcode, Operand::None)
    }

    pub fn size(&self) -> usize {
        self.opcode.size()
    }

    pub fn end(&self) -> usize {
        self.offset + self.size()
    }

    /// Absolute target of `bra`/`skip`. May be negative for corrupt input.
    pub fn branch_target(&self) -> Option<i64> {
        match self.operand {
            Operand::Offset(d) => Some(self.end() as i64 + d as i64),
            _ => None,
        }
    }

    /// Append the encoded instruction. Multi-byte operands use `order`.
    pub fn encode(&self, order: ByteOrder, out: &mut Vec<u8>) {
        out.push(self.opcode.code());
        let width = self.opcode.operand_kind().width();
        match self.operand {
            Operand::None => {}
            Operand::Unsigned(v) => order.write_uint(out, v, width),
            Operand::Signed(v) => order.write_uint(out, v as u64, width),
            Operand::Index(i) => out.push(i),
            Operand::Offset(d) => order.write_uint(out, d as u16 as u64, 2),
            Operand::External(e) => order.write_uint(out, e as u64, 2),
        }
    }

    /// Depth requirement and change, or `None` for `call` whose arity is
    /// only known from the callee's signature.
    pub fn stack_effect(&self) -> Option<StackEffect> {
        use Opcode::*;
        let effect = match self.opcode {
            Lit(_) | Const1u | Const1s | Const2u | Const2s | Const4u | Const4s | Const8u
            | Const8s | LoadExternal => StackEffect::new(0, 1),
            Dup => StackEffect::new(1, 1),
            Over => StackEffect::new(2, 1),
            Pick => match self.operand {
                Operand::Index(n) => StackEffect::new(n as usize + 1, 1),
                _ => StackEffect::new(1, 1),
            },
            Drop => StackEffect::new(1, -1),
            Swap => StackEffect::new(2, 0),
            Rot => StackEffect::new(3, 0),
            Deref | Abs | Neg | Not => StackEffect::new(1, 0),
            And | Div | Minus | Mod | Mul | Or | Plus | Shl | Shr | Shra | Xor | Eq | Ge | Gt
            | Le | Lt | Ne => StackEffect::new(2, -1),
            Bra => StackEffect::new(1, -1),
            Skip => StackEffect::new(0, 0),
            Call => return None,
        };
        Some(effect)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        match self.operand {
            Operand::None => Ok(()),
            Operand::Unsigned(v) => write!(f, " {v}"),
            Operand::Signed(v) => write!(f, " {v}"),
            Operand::Index(i) => write!(f, " {i}"),
            Operand::Offset(d) => write!(f, " {d}"),
            Operand::External(e) => write!(f, " {e}"),
        }
    }
}

/// Shortest instruction pushing `value`: `lit0`..`lit31`, then the narrowest
/// fixed-width `const` form.
pub fn encode_literal(value: i64) -> Instruction {
    if (0..=LIT_MAX as i64).contains(&value) {
        return Instruction::simple(Opcode::Lit(value as u8));
    }
    if value >= 0 {
        let v = value as u64;
        let opcode = if v <= u8::MAX as u64 {
            Opcode::Const1u
        } else if v <= u16::MAX as u64 {
            Opcode::Const2u
        } else if v <= u32::MAX as u64 {
            Opcode::Const4u
        } else {
            Opcode::Const8u
        };
        return Instruction::new(opcode, Operand::Unsigned(v));
    }
    let opcode = if value >= i8::MIN as i64 {
        Opcode::Const1s
    } else if value >= i16::MIN as i64 {
        Opcode::Const2s
    } else if value >= i32::MIN as i64 {
        Opcode::Const4s
    } else {
        Opcode::Const8s
    };
    Instruction::new(opcode, Operand::Signed(value))
}

/// Decode a whole code chunk payload.
///
/// Every branch must land on an instruction boundary or on the end of the
/// code.
pub fn decode(code: &[u8], order: ByteOrder) -> Result<Vec<Instruction>, FormatError> {
    let mut reader = Reader::new(code, "code");
    let mut out = Vec::new();

    while !reader.is_empty() {
        let offset = reader.position();
        let byte = reader.u8()?;
        let opcode = Opcode::from_code(byte).ok_or(FormatError::UnknownOpcode {
            opcode: byte,
            offset,
        })?;
        let operand = match opcode.operand_kind() {
            OperandKind::None => Operand::None,
            OperandKind::Unsigned(w) => Operand::Unsigned(reader.uint(order, w)?),
            OperandKind::Signed(w) => Operand::Signed(reader.int(order, w)?),
            OperandKind::Index => Operand::Index(reader.u8()?),
            OperandKind::Offset => Operand::Offset(reader.int(order, 2)? as i16),
            OperandKind::External => Operand::External(reader.uint(order, 2)? as u16),
        };
        out.push(Instruction {
            offset,
            opcode,
            operand,
        });
    }

    let boundaries: BTreeSet<usize> = out.iter().map(|i| i.offset).collect();
    for instr in &out {
        let Some(target) = instr.branch_target() else {
            continue;
        };
        let in_range = usize::try_from(target)
            .is_ok_and(|t| t == code.len() || boundaries.contains(&t));
        if !in_range {
            return Err(FormatError::BranchOutOfRange {
                offset: instr.offset,
                target,
            });
        }
    }

    Ok(out)
}
