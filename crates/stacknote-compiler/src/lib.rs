//! Stacknote compiler: parser, stack checker, optimizer and note emitter.
//!
//! The pipeline, per function:
//! - `parser` - lexer, grammar and folded-load expansion
//! - `cfg` - basic blocks and terminators
//! - `check` - stack depth, types and name resolution
//! - `optimize` - branch elimination to a fixpoint
//! - `emit` - bytecode lowering and note assembly
//!
//! `unit` runs the pipeline over a whole source file; `diagnostics` renders
//! what went wrong.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod cfg;
pub mod check;
pub mod diagnostics;
pub mod emit;
pub mod ir;
pub mod operator;
pub mod optimize;
pub mod parser;
pub mod unit;

#[cfg(test)]
pub mod test_utils;
#[cfg(test)]
mod unit_tests;

pub use diagnostics::{DiagnosticMessage, Diagnostics, DiagnosticsPrinter, ErrorKind, Span};
pub use emit::EmitError;
pub use unit::{CompileOptions, Compilation, compile};

use stacknote_bytecode::FormatError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("compilation failed with {} error(s)", .0.error_count())]
    CompileFailed(Diagnostics),

    #[error(transparent)]
    Format(#[from] FormatError),
}

pub type Result<T> = std::result::Result<T, Error>;
