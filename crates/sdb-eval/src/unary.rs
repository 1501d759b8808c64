//! Unary-operator disambiguation pre-pass.
//!
//! A `-` or `*` in unary position becomes [`TokenKind::Neg`] or
//! [`TokenKind::Deref`]. Unary position means first in the stream, or right
//! after an operator or `(`; in other words, not after an operand or `)`.
//! The pass also rejects unbalanced parentheses up front, so every range the
//! evaluator later sees is balanced.

use crate::error::{EvalError, EvalResult, Malformed};
use sdb_lexer::{Token, TokenKind, TokenStream};

/// Produce a new stream with every unary operator resolved.
///
/// The input stream is left untouched.
pub fn resolve_unary(tokens: &TokenStream) -> EvalResult<TokenStream> {
    let mut resolved: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut open_parens = Vec::new();

    for token in tokens {
        let unary_position = resolved
            .last()
            .is_none_or(|prev| !(prev.kind.is_operand() || prev.kind == TokenKind::RParen));

        let token = if unary_position && token.kind.is_operator() {
            match token.kind.as_unary() {
                Some(kind) => token.promoted(kind),
                None => {
                    return Err(EvalError::Disambiguation {
                        kind: token.kind,
                        span: token.span,
                    })
                }
            }
        } else {
            token.clone()
        };

        match token.kind {
            TokenKind::LParen => open_parens.push(token.span),
            TokenKind::RParen => {
                if open_parens.pop().is_none() {
                    return Err(Malformed::UnbalancedParen(token.span).into());
                }
            }
            _ => {}
        }

        resolved.push(token);
    }

    if let Some(span) = open_parens.pop() {
        return Err(Malformed::UnbalancedParen(span).into());
    }

    Ok(TokenStream::from_tokens(resolved))
}
