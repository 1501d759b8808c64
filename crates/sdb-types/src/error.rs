use crate::Span;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lexing failure. No partial token stream is produced alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LexError {
    /// No rule matched at the cursor position.
    #[error("no match at position {}: `{remaining}`", .span.start)]
    NoMatch {
        /// Where scanning stopped.
        span: Span,
        /// The unconsumed input, starting at the offending character.
        remaining: String,
    },

    /// The expression has more tokens than the stream can hold.
    #[error("too many tokens: at most {limit} allowed")]
    TooManyTokens { limit: usize },

    /// A matched lexeme does not fit the bounded token text.
    #[error("token `{text}` at {span} is longer than {limit} bytes")]
    TokenTooLong {
        span: Span,
        text: String,
        limit: usize,
    },
}

impl LexError {
    /// Create a [`LexError::NoMatch`] for `source` at byte offset `pos`.
    pub fn no_match(source: &str, pos: usize) -> Self {
        Self::NoMatch {
            span: Span::point(pos),
            remaining: source.get(pos..).unwrap_or("").to_string(),
        }
    }

    /// Byte offset the error refers to, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::NoMatch { span, .. } | Self::TokenTooLong { span, .. } => Some(span.start),
            Self::TooManyTokens { .. } => None,
        }
    }

    /// Render the source with a caret under the offending character.
    ///
    /// ```text
    /// 1 + @2
    ///     ^
    /// ```
    pub fn caret(&self, source: &str) -> String {
        match self.position() {
            Some(pos) => format!("{source}\n{}^", " ".repeat(pos)),
            None => source.to_string(),
        }
    }
}
