//! Core SDB lexer — converts expression text to a token stream.
//!
//! Scans left to right. At each position the rule table is consulted in
//! order; whitespace is consumed silently, every other match becomes a
//! [`Token`]. The first position no rule matches aborts the scan.

use sdb_types::{LexError, Limits, Span};
use tracing::trace;

use crate::rules::{RuleAction, RuleTable};
use crate::token::{Token, TokenKind};

/// An ordered, bounded sequence of tokens in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Wrap an already-resolved token vector.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Just the kinds, for quick inspection.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// The SDB lexer.
///
/// Holds a borrowed rule table and the capacity limits; it has no mutable
/// state, so one lexer can tokenize any number of expressions.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'r> {
    rules: &'r RuleTable,
    limits: Limits,
}

impl Lexer<'static> {
    /// A lexer over the standard rule table.
    pub fn new(limits: Limits) -> Self {
        Self::with_rules(RuleTable::standard(), limits)
    }
}

impl Default for Lexer<'static> {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl<'r> Lexer<'r> {
    /// A lexer over a caller-supplied rule table.
    pub fn with_rules(rules: &'r RuleTable, limits: Limits) -> Self {
        Self { rules, limits }
    }

    /// Tokenize the whole of `source`.
    pub fn tokenize(&self, source: &str) -> Result<TokenStream, LexError> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < source.len() {
            let rest = &source[pos..];
            let Some((index, action, len)) = self.rules.first_match(rest) else {
                return Err(LexError::no_match(source, pos));
            };

            let span = Span::new(pos, pos + len);
            let lexeme = &rest[..len];
            trace!(
                rule = index,
                pattern = self.rules.pattern(index).unwrap_or(""),
                position = pos,
                len,
                lexeme,
                "lexer rule matched"
            );
            pos += len;

            let RuleAction::Emit(kind) = action else {
                continue;
            };

            if tokens.len() >= self.limits.max_tokens {
                return Err(LexError::TooManyTokens {
                    limit: self.limits.max_tokens,
                });
            }

            let token = if kind.keeps_text() {
                if lexeme.len() > self.limits.max_token_len {
                    return Err(LexError::TokenTooLong {
                        span,
                        text: lexeme.to_string(),
                        limit: self.limits.max_token_len,
                    });
                }
                Token::with_text(kind, lexeme, span)
            } else {
                Token::new(kind, span)
            };
            tokens.push(token);
        }

        Ok(TokenStream { tokens })
    }
}
