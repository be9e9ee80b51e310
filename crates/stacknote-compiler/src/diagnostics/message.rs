use std::fmt;

use super::Span;

/// Error classes reported against source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Type,
    Stack,
    Name,
    /// Compiler bug, such as an optimized function failing re-validation.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax error",
            Self::Type => "type error",
            Self::Stack => "stack error",
            Self::Name => "name error",
            Self::Internal => "internal error",
        }
    }

    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Syntax => "invalid syntax",
            Self::Type => "incompatible types",
            Self::Stack => "invalid stack",
            Self::Name => "unknown name",
            Self::Internal => "internal compiler error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub function: Option<String>,
}

impl DiagnosticMessage {
    pub fn new(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
            function: None,
        }
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at {}..{}",
            self.kind, self.message, self.span.start, self.span.end
        )
    }
}
