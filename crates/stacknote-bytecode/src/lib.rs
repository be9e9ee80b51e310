//! Note format for stacknote.
//!
//! This crate contains:
//! - Container framing (note file header, notes, versioned chunks)
//! - Chunk payloads (signature, code-info, externals, code)
//! - Opcode table, bytecode decoding and encoding helpers
//! - Consumer-side stack-depth verification and a human-readable dump

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod byte_order;
mod chunk;
pub mod dump;
mod error;
mod file;
mod instruction;
mod note;
mod opcode;
mod reader;
mod signature;
pub mod verify;

#[cfg(test)]
mod byte_order_tests;
#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod file_tests;
#[cfg(test)]
mod test_fixtures;
#[cfg(test)]
mod verify_tests;

pub use byte_order::{BYTE_ORDER_MARK, ByteOrder};
pub use chunk::{
    CHUNK_CODE, CHUNK_CODEINFO, CHUNK_EXTERNALS, CHUNK_SIGNATURE, CODE_VERSION, CODEINFO_VERSION,
    Chunk, CodeInfo, EXTERNALS_VERSION, LEGACY_CODE_VERSION, SIGNATURE_VERSION,
};
pub use dump::{dump, write_file, write_note};
pub use error::FormatError;
pub use file::{HEADER_SIZE, Header, MAGIC, NoteFile, VERSION};
pub use instruction::{Instruction, Operand, StackEffect, decode, encode_literal};
pub use note::{NOTE_FUNCTION, NOTE_VERSION, Note};
pub use opcode::{Opcode, OperandKind};
pub use signature::{Signature, ValueType};
pub use verify::{DepthReport, VerifyError, verify_note};
