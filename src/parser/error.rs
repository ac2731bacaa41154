//! Parser error type.

use thiserror::Error;

use crate::lexer::{Span, Tok};

/// A parse failure, anchored to the byte offset that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("at {span:?}: expected {expected}, found {found:?}")]
    Unexpected {
        span: Span,
        expected: String,
        found: Tok,
    },

    #[error("at {span:?}: unexpected end of input, expected {expected}")]
    UnexpectedEof { span: Span, expected: String },

    #[error("at {span:?}: lexer error: {message}")]
    Lex { span: Span, message: String },
}

impl ParseError {
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Unexpected { span, .. }
            | Self::UnexpectedEof { span, .. }
            | Self::Lex { span, .. } => *span,
        }
    }
}
