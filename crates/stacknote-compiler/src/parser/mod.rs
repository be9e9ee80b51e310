//! Lexer, parser and fold expansion.
//!
//! Folded loads (`add 5` for `load 5; add`) are expanded here, so later
//! stages only see explicit operations.

pub mod ast;
mod core;
mod grammar;
pub mod lexer;

#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod lexer_tests;

pub use ast::{Argument, Function, LabelDecl, SourceUnit, Statement};
pub use self::core::Parser;

use crate::diagnostics::Diagnostics;

#[derive(Debug)]
pub struct ParseResult {
    pub unit: SourceUnit,
    pub diagnostics: Diagnostics,
}

pub fn parse(source: &str) -> ParseResult {
    let tokens = lexer::lex(source);
    let mut parser = Parser::new(source, tokens);
    let unit = parser.parse_unit();
    ParseResult {
        unit,
        diagnostics: parser.diagnostics,
    }
}
