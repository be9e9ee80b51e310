//! Byte order of multi-byte operands in the code chunk.
//!
//! Framing (file header, note and chunk headers, signature and externals
//! payloads) is always little-endian. Only the code-info payload and the
//! operands inside the code chunk follow the declared [`ByteOrder`].

use std::fmt;

/// Written as a `u16` in the target order; the reader infers the order from
/// which of its two bytes comes first.
pub const BYTE_ORDER_MARK: u16 = 0x1234;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the machine running the compiler.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Little => "little-endian",
            Self::Big => "big-endian",
        }
    }

    /// The two bytes of [`BYTE_ORDER_MARK`] as laid out in this order.
    pub fn mark(self) -> [u8; 2] {
        match self {
            Self::Little => BYTE_ORDER_MARK.to_le_bytes(),
            Self::Big => BYTE_ORDER_MARK.to_be_bytes(),
        }
    }

    /// Recover the byte order from a mark. `None` if the bytes are not a mark.
    pub fn from_mark(bytes: [u8; 2]) -> Option<Self> {
        if bytes == BYTE_ORDER_MARK.to_le_bytes() {
            Some(Self::Little)
        } else if bytes == BYTE_ORDER_MARK.to_be_bytes() {
            Some(Self::Big)
        } else {
            None
        }
    }

    /// Append the low `width` bytes of `value` (width 1, 2, 4 or 8).
    pub fn write_uint(self, out: &mut Vec<u8>, value: u64, width: usize) {
        debug_assert!(matches!(width, 1 | 2 | 4 | 8), "bad operand width {width}");
        match self {
            Self::Little => out.extend_from_slice(&value.to_le_bytes()[..width]),
            Self::Big => out.extend_from_slice(&value.to_be_bytes()[8 - width..]),
        }
    }

    /// Read an unsigned value whose width is `bytes.len()`.
    pub fn read_uint(self, bytes: &[u8]) -> u64 {
        let fold = |acc: u64, &b: &u8| (acc << 8) | b as u64;
        match self {
            Self::Little => bytes.iter().rev().fold(0, fold),
            Self::Big => bytes.iter().fold(0, fold),
        }
    }

    /// Read a two's-complement value whose width is `bytes.len()`.
    pub fn read_int(self, bytes: &[u8]) -> i64 {
        let raw = self.read_uint(bytes);
        let shift = 64 - 8 * bytes.len() as u32;
        ((raw << shift) as i64) >> shift
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
