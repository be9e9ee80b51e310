//! Bounds-checked cursor over a byte slice.

use crate::ByteOrder;
use crate::error::FormatError;

pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    /// What is being read, for error messages.
    what: &'static str,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8], what: &'static str) -> Self {
        Self { bytes, pos: 0, what }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < n {
            return Err(FormatError::Truncated {
                what: self.what,
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u16_le(&mut self) -> Result<u16, FormatError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub(crate) fn u32_le(&mut self) -> Result<u32, FormatError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn uint(&mut self, order: ByteOrder, width: usize) -> Result<u64, FormatError> {
        Ok(order.read_uint(self.take(width)?))
    }

    pub(crate) fn int(&mut self, order: ByteOrder, width: usize) -> Result<i64, FormatError> {
        Ok(order.read_int(self.take(width)?))
    }

    /// `u16` length followed by that many UTF-8 bytes.
    pub(crate) fn string(&mut self) -> Result<String, FormatError> {
        let len = self.u16_le()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FormatError::InvalidUtf8(self.what))
    }

    /// Fail if anything is left over.
    pub(crate) fn finish(&self) -> Result<(), FormatError> {
        if self.is_empty() {
            return Ok(());
        }
        Err(FormatError::TrailingBytes {
            what: self.what,
            extra: self.remaining(),
        })
    }
}

/// Append a `u16`-length-prefixed UTF-8 string.
pub(crate) fn write_string(
    out: &mut Vec<u8>,
    s: &str,
    what: &'static str,
) -> Result<(), FormatError> {
    let len = u16::try_from(s.len()).map_err(|_| FormatError::TooLarge {
        what,
        len: s.len(),
        max: u16::MAX as usize,
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(s.as_bytes());
    Ok(())
}
