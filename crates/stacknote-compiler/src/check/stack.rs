//! Abstract stack: typed, optionally named slots.

use std::fmt;

use stacknote_bytecode::{Signature, ValueType};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Ptr,
    /// Reference pushed by `load <function>`; never declarable.
    Func(Box<Signature>),
}

impl Type {
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Int | Self::Ptr)
    }

    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Int => Some(ValueType::Int),
            Self::Ptr => Some(ValueType::Ptr),
            Self::Func(_) => None,
        }
    }
}

impl From<ValueType> for Type {
    fn from(ty: ValueType) -> Self {
        match ty {
            ValueType::Int => Self::Int,
            ValueType::Ptr => Self::Ptr,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Ptr => f.write_str("ptr"),
            Self::Func(sig) => {
                f.write_str("func(")?;
                for (i, p) in sig.params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> {}", sig.returns)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    pub ty: Type,
    pub name: Option<String>,
}

impl Slot {
    pub fn unnamed(ty: Type) -> Self {
        Self { ty, name: None }
    }

    pub fn named(ty: Type, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: Some(name.into()),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {name}", self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}

/// Slots from bottom to top.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StackState {
    slots: Vec<Slot>,
}

impl StackState {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot `n` positions below the top (0 = top).
    pub fn peek(&self, n: usize) -> Option<&Slot> {
        self.slots.iter().rev().nth(n)
    }

    pub fn peek_mut(&mut self, n: usize) -> Option<&mut Slot> {
        self.slots.iter_mut().rev().nth(n)
    }

    pub fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub fn pop(&mut self) -> Option<Slot> {
        self.slots.pop()
    }

    /// Position from the top of the topmost slot called `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .rev()
            .position(|s| s.name.as_deref() == Some(name))
    }

    /// Give slot `n` the name `name`, taking it away from any other slot.
    pub fn rename(&mut self, n: usize, name: &str) {
        for slot in &mut self.slots {
            if slot.name.as_deref() == Some(name) {
                slot.name = None;
            }
        }
        if let Some(slot) = self.peek_mut(n) {
            slot.name = Some(name.to_string());
        }
    }

    pub fn swap(&mut self) {
        let n = self.slots.len();
        self.slots.swap(n - 1, n - 2);
    }

    /// `[a b c]` to `[c a b]` (top on the right).
    pub fn rot(&mut self) {
        let n = self.slots.len();
        self.slots[n - 3..].rotate_right(1);
    }
}

impl fmt::Display for StackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}")?;
        }
        f.write_str("]")
    }
}
