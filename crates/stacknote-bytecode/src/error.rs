//! Errors raised while reading or writing notes.

use std::io;

use crate::file::VERSION;

/// Malformed, truncated or unsupported note data.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("invalid magic: expected SNTE")]
    InvalidMagic,
    #[error("unsupported file version: {0} (expected {VERSION})")]
    UnsupportedVersion(u32),
    #[error("file too small: {0} bytes (minimum 16)")]
    FileTooSmall(usize),
    #[error("size mismatch: header says {header} bytes, got {actual}")]
    SizeMismatch { header: u32, actual: usize },
    #[error("checksum mismatch: header says {header:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { header: u32, computed: u32 },
    #[error("truncated {what}: need {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        what: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("{what} has {extra} trailing bytes")]
    TrailingBytes { what: &'static str, extra: usize },
    #[error("note is missing its {0} chunk")]
    MissingChunk(&'static str),
    #[error("unsupported {chunk} chunk version {version}")]
    UnsupportedChunkVersion { chunk: &'static str, version: u16 },
    #[error("duplicate {0} chunk")]
    DuplicateChunk(&'static str),
    #[error("invalid byte-order mark {0:#06x}")]
    InvalidByteOrderMark(u16),
    #[error("invalid type tag {0:#04x}")]
    InvalidTypeTag(u8),
    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),
    #[error("unknown opcode {opcode:#04x} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },
    #[error("branch at offset {offset} targets {target}, not an instruction boundary")]
    BranchOutOfRange { offset: usize, target: i64 },
    #[error("{what} too large: {len} (max {max})")]
    TooLarge {
        what: &'static str,
        len: usize,
        max: usize,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
