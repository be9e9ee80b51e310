//! Value types and function signatures as stored in notes.

use std::fmt;

use crate::error::FormatError;
use crate::reader::{Reader, write_string};

/// Declarable value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Ptr,
}

impl ValueType {
    pub fn tag(self) -> u8 {
        match self {
            Self::Int => b'i',
            Self::Ptr => b'p',
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, FormatError> {
        match tag {
            b'i' => Ok(Self::Int),
            b'p' => Ok(Self::Ptr),
            other => Err(FormatError::InvalidTypeTag(other)),
        }
    }

    /// Source-level spelling (`int`, `ptr`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Ptr => "ptr",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "ptr" => Some(Self::Ptr),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name, return type and parameter types of a function.
///
/// Layout (little-endian): `u16` name length, UTF-8 name, return tag,
/// `u16` parameter count, one tag per parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: String,
    pub returns: ValueType,
    pub params: Vec<ValueType>,
}

impl Signature {
    pub fn new(name: impl Into<String>, returns: ValueType, params: Vec<ValueType>) -> Self {
        Self {
            name: name.into(),
            returns,
            params,
        }
    }

    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), FormatError> {
        write_string(out, &self.name, "signature name")?;
        out.push(self.returns.tag());
        let count = u16::try_from(self.params.len()).map_err(|_| FormatError::TooLarge {
            what: "parameter list",
            len: self.params.len(),
            max: u16::MAX as usize,
        })?;
        out.extend_from_slice(&count.to_le_bytes());
        out.extend(self.params.iter().map(|p| p.tag()));
        Ok(())
    }

    pub(crate) fn decode(reader: &mut Reader<'_>) -> Result<Self, FormatError> {
        let name = reader.string()?;
        let returns = ValueType::from_tag(reader.u8()?)?;
        let count = reader.u16_le()? as usize;
        let params = reader
            .take(count)?
            .iter()
            .map(|&tag| ValueType::from_tag(tag))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name,
            returns,
            params,
        })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, ") -> {}", self.returns)
    }
}
