#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shared building blocks for the stacknote crates.
//!
//! - [`Colors`]: ANSI palette used by dumps and the CLI
//! - [`LineIndex`]: byte offset to line/column mapping for diagnostics

mod colors;
mod line_index;


pub use colors::{Colors, Painted};
pub use line_index::{LineCol, LineIndex};
