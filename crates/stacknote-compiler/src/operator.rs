//! Static operator table.
//!
//! Every source operator maps to an [`OperatorInfo`] describing its operand
//! shape, whether it accepts a folded load, and its fixed stack effect.

use std::fmt;

use Category as C;
use OperandShape as S;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Abs,
    Add,
    And,
    Beq,
    Bge,
    Bgt,
    Ble,
    Blt,
    Bne,
    Call,
    Cast,
    Deref,
    Div,
    Drop,
    Dup,
    Eq,
    Ge,
    Goto,
    Gt,
    Le,
    Load,
    Lt,
    Mod,
    Mul,
    Name,
    Ne,
    Neg,
    Not,
    Or,
    Over,
    Pick,
    Return,
    Rot,
    Shl,
    Shr,
    Shra,
    Sub,
    Swap,
    Xor,
}

/// Operands an operator takes after any folded load is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandShape {
    None,
    Label,
    /// Integer in `0..=255`.
    Index,
    Type,
    /// Integer, slot name or function name.
    Value,
    /// Slot (position or name), then the new name.
    Rename,
}

impl OperandShape {
    pub fn count(self) -> usize {
        match self {
            Self::None => 0,
            Self::Label | Self::Index | Self::Type | Self::Value => 1,
            Self::Rename => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Math,
    Compare,
    Branch,
    Stack,
    Memory,
    Control,
}

#[derive(Clone, Copy, Debug)]
pub struct OperatorInfo {
    pub name: &'static str,
    pub category: Category,
    pub shape: OperandShape,
    pub foldable: bool,
    /// Slots popped, when fixed. `pick`, `name` and `call` depend on their
    /// operand or callee.
    pub pops: Option<u8>,
    pub pushes: u8,
}

const fn info(
    name: &'static str,
    category: Category,
    shape: OperandShape,
    foldable: bool,
    pops: Option<u8>,
    pushes: u8,
) -> OperatorInfo {
    OperatorInfo {
        name,
        category,
        shape,
        foldable,
        pops,
        pushes,
    }
}

const fn binary(name: &'static str) -> OperatorInfo {
    info(name, C::Math, S::None, true, Some(2), 1)
}

const fn unary(name: &'static str) -> OperatorInfo {
    info(name, C::Math, S::None, false, Some(1), 1)
}

const fn compare(name: &'static str) -> OperatorInfo {
    info(name, C::Compare, S::None, true, Some(2), 1)
}

const fn branch(name: &'static str) -> OperatorInfo {
    info(name, C::Branch, S::Label, true, Some(2), 0)
}

pub const ALL: [Operator; 39] = [
    Operator::Abs,
    Operator::Add,
    Operator::And,
    Operator::Beq,
    Operator::Bge,
    Operator::Bgt,
    Operator::Ble,
    Operator::Blt,
    Operator::Bne,
    Operator::Call,
    Operator::Cast,
    Operator::Deref,
    Operator::Div,
    Operator::Drop,
    Operator::Dup,
    Operator::Eq,
    Operator::Ge,
    Operator::Goto,
    Operator::Gt,
    Operator::Le,
    Operator::Load,
    Operator::Lt,
    Operator::Mod,
    Operator::Mul,
    Operator::Name,
    Operator::Ne,
    Operator::Neg,
    Operator::Not,
    Operator::Or,
    Operator::Over,
    Operator::Pick,
    Operator::Return,
    Operator::Rot,
    Operator::Shl,
    Operator::Shr,
    Operator::Shra,
    Operator::Sub,
    Operator::Swap,
    Operator::Xor,
];

impl Operator {
    pub fn info(self) -> OperatorInfo {
        match self {
            Self::Abs => unary("abs"),
            Self::Neg => unary("neg"),
            Self::Not => unary("not"),

            Self::Add => binary("add"),
            Self::And => binary("and"),
            Self::Div => binary("div"),
            Self::Mod => binary("mod"),
            Self::Mul => binary("mul"),
            Self::Or => binary("or"),
            Self::Shl => binary("shl"),
            Self::Shr => binary("shr"),
            Self::Shra => binary("shra"),
            Self::Sub => binary("sub"),
            Self::Xor => binary("xor"),

            Self::Eq => compare("eq"),
            Self::Ge => compare("ge"),
            Self::Gt => compare("gt"),
            Self::Le => compare("le"),
            Self::Lt => compare("lt"),
            Self::Ne => compare("ne"),

            Self::Beq => branch("beq"),
            Self::Bge => branch("bge"),
            Self::Bgt => branch("bgt"),
            Self::Ble => branch("ble"),
            Self::Blt => branch("blt"),
            Self::Bne => branch("bne"),

            Self::Drop => info("drop", C::Stack, S::None, false, Some(1), 0),
            Self::Dup => info("dup", C::Stack, S::None, false, Some(1), 2),
            Self::Over => info("over", C::Stack, S::None, false, Some(2), 3),
            Self::Pick => info("pick", C::Stack, S::Index, false, None, 1),
            Self::Rot => info("rot", C::Stack, S::None, false, Some(3), 3),
            Self::Swap => info("swap", C::Stack, S::None, false, Some(2), 2),
            Self::Load => info("load", C::Stack, S::Value, false, Some(0), 1),
            Self::Name => info("name", C::Stack, S::Rename, false, None, 0),

            Self::Cast => info("cast", C::Memory, S::Type, false, Some(1), 1),
            Self::Deref => info("deref", C::Memory, S::Type, true, Some(1), 1),

            Self::Call => info("call", C::Control, S::None, true, None, 1),
            Self::Goto => info("goto", C::Control, S::Label, false, Some(0), 0),
            Self::Return => info("return", C::Control, S::None, false, Some(1), 0),
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ALL.iter().copied().find(|op| op.name() == name)
    }

    pub fn is_terminator(self) -> bool {
        self.info().category == Category::Branch || matches!(self, Self::Goto | Self::Return)
    }

    /// Comparison tested by a conditional branch.
    pub fn branch_comparison(self) -> Option<Comparison> {
        let cmp = match self {
            Self::Beq => Comparison::Eq,
            Self::Bge => Comparison::Ge,
            Self::Bgt => Comparison::Gt,
            Self::Ble => Comparison::Le,
            Self::Blt => Comparison::Lt,
            Self::Bne => Comparison::Ne,
            _ => return None,
        };
        Some(cmp)
    }

    /// Comparison computed by a compare operator.
    pub fn comparison(self) -> Option<Comparison> {
        let cmp = match self {
            Self::Eq => Comparison::Eq,
            Self::Ge => Comparison::Ge,
            Self::Gt => Comparison::Gt,
            Self::Le => Comparison::Le,
            Self::Lt => Comparison::Lt,
            Self::Ne => Comparison::Ne,
            _ => return None,
        };
        Some(cmp)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Relation tested by compare operators and conditional branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn inverse(self) -> Self {
        match self {
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Lt => Self::Ge,
            Self::Ge => Self::Lt,
            Self::Gt => Self::Le,
            Self::Le => Self::Gt,
        }
    }

    /// The `b<cmp>` operator.
    pub fn branch_operator(self) -> Operator {
        match self {
            Self::Eq => Operator::Beq,
            Self::Ne => Operator::Bne,
            Self::Lt => Operator::Blt,
            Self::Le => Operator::Ble,
            Self::Gt => Operator::Bgt,
            Self::Ge => Operator::Bge,
        }
    }

    /// The plain compare operator.
    pub fn operator(self) -> Operator {
        match self {
            Self::Eq => Operator::Eq,
            Self::Ne => Operator::Ne,
            Self::Lt => Operator::Lt,
            Self::Le => Operator::Le,
            Self::Gt => Operator::Gt,
            Self::Ge => Operator::Ge,
        }
    }
}
