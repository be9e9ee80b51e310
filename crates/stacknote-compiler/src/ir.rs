//! Operations after parsing and fold expansion.

use std::fmt;

use stacknote_bytecode::ValueType;

use crate::diagnostics::Span;
use crate::operator::Operator;

/// Identity of an operation within its function, stable across optimization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(pub u32);

/// A slot named by `name`: a position from the top, or an existing name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotRef {
    Position(u8),
    Name(String),
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(n) => write!(f, "{n}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    None,
    /// `load <int>`
    Int(i64),
    /// `load <name>`, resolved by the checker to a slot or a function.
    Name(String),
    /// `pick <n>`
    Index(u8),
    /// `cast`/`deref` target type.
    Type(ValueType),
    Label(String),
    Rename { slot: SlotRef, name: String },
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Int(v) => write!(f, "{v}"),
            Self::Name(name) | Self::Label(name) => f.write_str(name),
            Self::Index(n) => write!(f, "{n}"),
            Self::Type(ty) => write!(f, "{ty}"),
            Self::Rename { slot, name } => write!(f, "{slot}, {name}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub id: OpId,
    pub op: Operator,
    pub operand: Operand,
    pub span: Span,
}

impl Operation {
    pub fn new(id: OpId, op: Operator, operand: Operand, span: Span) -> Self {
        Self {
            id,
            op,
            operand,
            span,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Operand::None => write!(f, "{}", self.op),
            ref operand => write!(f, "{} {operand}", self.op),
        }
    }
}

/// Hands out fresh [`OpId`]s for one function.
#[derive(Clone, Debug, Default)]
pub struct OpIds {
    next: u32,
}

impl OpIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    pub fn fresh(&mut self) -> OpId {
        let id = OpId(self.next);
        self.next += 1;
        id
    }

    pub fn peek(&self) -> u32 {
        self.next
    }
}
