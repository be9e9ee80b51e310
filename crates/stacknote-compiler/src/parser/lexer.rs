//! Lexer for the stack language.
//!
//! Produces span-based tokens; text is sliced from the source on demand.
//! Consecutive unrecognised characters coalesce into one `Garbage` token.

use logos::Logos;

use crate::diagnostics::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token("define")]
    KwDefine,
    #[token("returns")]
    KwReturns,
    #[token("argument")]
    KwArgument,

    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("\n")]
    Newline,

    #[regex(r"-?0[xX][0-9a-fA-F]+")]
    #[regex(r"-?[0-9]+")]
    Int,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[ \t\r\f]+")]
    Whitespace,
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,
    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    BlockComment,

    /// Unrecognised input.
    Garbage,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment
        )
    }

    /// Newline or `;`.
    pub fn is_terminator(self) -> bool {
        matches!(self, Self::Newline | Self::Semicolon)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::KwDefine => "`define`",
            Self::KwReturns => "`returns`",
            Self::KwArgument => "`argument`",
            Self::Colon => "`:`",
            Self::Comma => "`,`",
            Self::Semicolon => "`;`",
            Self::Newline => "end of line",
            Self::Int => "integer",
            Self::Ident => "identifier",
            Self::Whitespace => "whitespace",
            Self::LineComment | Self::BlockComment => "comment",
            Self::Garbage => "unrecognised input",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Tokenize `source`, dropping trivia.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(TokenKind::Garbage, Span::new(start, end)));
                }
                if !kind.is_trivia() {
                    tokens.push(Token::new(kind, lexer.span().into()));
                }
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        TokenKind::Garbage,
                        Span::new(start, source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[token.span.range()]
}

/// Parse an integer token: decimal or `0x` hexadecimal, optionally negated.
pub fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i128::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i128>().ok()?,
    };
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}
