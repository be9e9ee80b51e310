//! Listing palette.
//!
//! Each field names the role of the text it styles, not a color, so dumps
//! read `c.opcode` rather than `c.blue`. Plain 16-color codes only.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    /// Function headers in a listing.
    pub name: &'static str,
    pub opcode: &'static str,
    /// Literals, slot depths, displacements, external indices.
    pub operand: &'static str,
    /// Offsets, comments and framing lines.
    pub meta: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        name: "\x1b[1;34m",
        opcode: "\x1b[36m",
        operand: "\x1b[32m",
        meta: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        name: "",
        opcode: "",
        operand: "",
        meta: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        *self != Self::OFF
    }

    /// Wraps `value` in `style` and a reset, for use inside `write!`.
    pub fn paint<T: fmt::Display>(&self, style: &'static str, value: T) -> Painted<T> {
        Painted {
            style,
            value,
            reset: self.reset,
        }
    }
}

pub struct Painted<T> {
    style: &'static str,
    value: T,
    reset: &'static str,
}

impl<T: fmt::Display> fmt::Display for Painted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.style, self.value, self.reset)
    }
}
