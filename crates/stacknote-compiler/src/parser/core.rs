//! Parser state and low-level token operations.

use super::lexer::{Token, TokenKind, token_text};
use crate::diagnostics::{Diagnostics, ErrorKind, Span};
use crate::ir::OpIds;

/// A diagnostic has already been recorded; unwind to the recovery point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Reported;

pub(super) type PResult<T> = Result<T, Reported>;

pub struct Parser<'src> {
    pub(super) source: &'src str,
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    pub(super) diagnostics: Diagnostics,
    /// Operation ids of the function being parsed.
    pub(super) ids: OpIds,
    /// Name of the function being parsed, attached to diagnostics.
    pub(super) function: Option<String>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            diagnostics: Diagnostics::new(),
            ids: OpIds::new(),
            function: None,
        }
    }

    pub(super) fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn current(&self) -> Option<TokenKind> {
        self.nth(0)
    }

    pub(super) fn nth(&self, lookahead: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + lookahead).map(|t| t.kind)
    }

    pub(super) fn currently_is(&self, kind: TokenKind) -> bool {
        self.current() == Some(kind)
    }

    /// Newline, `;` or end of input.
    pub(super) fn at_end_of_statement(&self) -> bool {
        self.current().is_none_or(TokenKind::is_terminator)
    }

    pub(super) fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map_or_else(|| Span::empty(self.source.len()), |t| t.span)
    }

    pub(super) fn bump(&mut self) -> Token {
        assert!(!self.eof(), "bump called at EOF");
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.currently_is(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(super) fn text(&self, token: &Token) -> &'src str {
        token_text(self.source, token)
    }

    /// On mismatch: report "expected {what}" at the current token.
    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.currently_is(kind) {
            return Ok(self.bump());
        }
        Err(self.error_here(format!("expected {what}, found {}", self.found())))
    }

    /// Consume a statement terminator, or accept end of input.
    pub(super) fn expect_end(&mut self) -> PResult<()> {
        if self.eof() || self.eat(TokenKind::Newline) || self.eat(TokenKind::Semicolon) {
            return Ok(());
        }
        Err(self.error_here(format!(
            "expected end of statement, found {}",
            self.found()
        )))
    }

    pub(super) fn skip_terminators(&mut self) {
        while self.current().is_some_and(TokenKind::is_terminator) {
            self.pos += 1;
        }
    }

    /// Skip to the next `define`, so later functions still parse.
    pub(super) fn recover_to_define(&mut self) {
        while !self.eof() && !self.currently_is(TokenKind::KwDefine) {
            self.pos += 1;
        }
    }

    pub(super) fn found(&self) -> String {
        match self.tokens.get(self.pos) {
            None => "end of input".to_string(),
            Some(t) if t.kind == TokenKind::Ident || t.kind == TokenKind::Int => {
                format!("`{}`", self.text(t))
            }
            Some(t) => t.kind.describe().to_string(),
        }
    }

    pub(super) fn error_here(&mut self, message: impl Into<String>) -> Reported {
        let span = self.current_span();
        self.error_at(ErrorKind::Syntax, span, message)
    }

    pub(super) fn error_at(
        &mut self,
        kind: ErrorKind,
        span: Span,
        message: impl Into<String>,
    ) -> Reported {
        let mut builder = self.diagnostics.report(kind, span).message(message);
        if let Some(name) = &self.function {
            builder = builder.function(name.clone());
        }
        builder.emit();
        Reported
    }
}
