//! Recursive range evaluator.
//!
//! Works over an immutable, unary-resolved token slice and closed index
//! ranges `[p, q]`. Every recursive call narrows the range, so evaluation
//! always terminates.

use crate::error::{EvalError, EvalResult, Malformed};
use crate::machine::Machine;
use crate::precedence::Precedence;
use sdb_lexer::{Token, TokenKind};
use sdb_types::{SWord, Span, Word, WORD_BYTES};
use tracing::debug;

/// Evaluates ranges of one resolved token sequence against a machine.
pub struct Evaluator<'a, M: Machine + ?Sized> {
    tokens: &'a [Token],
    machine: &'a M,
}

impl<'a, M: Machine + ?Sized> Evaluator<'a, M> {
    /// `tokens` must already have been through [`crate::resolve_unary`].
    pub fn new(tokens: &'a [Token], machine: &'a M) -> Self {
        Self { tokens, machine }
    }

    /// Evaluate the whole token sequence.
    pub fn eval_all(&self) -> EvalResult<Word> {
        if self.tokens.is_empty() {
            return Err(Malformed::Empty.into());
        }
        self.eval(0, self.tokens.len() - 1)
    }

    /// Evaluate the closed range `[p, q]`.
    pub fn eval(&self, p: usize, q: usize) -> EvalResult<Word> {
        if p > q || q >= self.tokens.len() {
            return Err(Malformed::Empty.into());
        }

        if p == q {
            return self.eval_operand(&self.tokens[p]);
        }

        if self.wrapped_in_parens(p, q) {
            return self.eval(p + 1, q - 1);
        }

        let op = self.main_operator(p, q)?;
        let token = &self.tokens[op];
        if op == q {
            return Err(Malformed::MissingOperand {
                kind: token.kind,
                span: token.span,
            }
            .into());
        }

        if token.kind.is_unary() {
            if op != p {
                return Err(Malformed::DanglingOperand {
                    kind: token.kind,
                    span: token.span,
                }
                .into());
            }
            let operand = self.eval(op + 1, q)?;
            return self.apply_unary(token, operand);
        }

        if op == p {
            return Err(Malformed::MissingOperand {
                kind: token.kind,
                span: token.span,
            }
            .into());
        }
        let lhs = self.eval(p, op - 1)?;
        let rhs = self.eval(op + 1, q)?;
        apply_binary(token, lhs, rhs)
    }

    // ── Operands ─────────────────────────────────────────────────────────

    fn eval_operand(&self, token: &Token) -> EvalResult<Word> {
        let invalid = || EvalError::InvalidLiteral {
            text: token.text.clone(),
            span: token.span,
        };
        match token.kind {
            TokenKind::DecNum => token.text.parse::<Word>().map_err(|_| invalid()),
            TokenKind::HexNum => token
                .text
                .get(2..)
                .and_then(|digits| Word::from_str_radix(digits, 16).ok())
                .ok_or_else(invalid),
            TokenKind::Register => {
                let name = token.text.strip_prefix('$').unwrap_or(&token.text);
                Ok(self.machine.read_register(name)?)
            }
            kind => Err(Malformed::BareToken {
                kind,
                span: token.span,
            }
            .into()),
        }
    }

    // ── Structure ────────────────────────────────────────────────────────

    /// `true` if `[p, q]` is `( … )` with the outer pair enclosing everything.
    ///
    /// `(1)+(2)` is not wrapped: the depth returns to zero before `q`.
    fn wrapped_in_parens(&self, p: usize, q: usize) -> bool {
        if self.tokens[p].kind != TokenKind::LParen || self.tokens[q].kind != TokenKind::RParen {
            return false;
        }
        let mut depth = 0i32;
        for (i, token) in self.tokens[p..=q].iter().enumerate() {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                _ => {}
            }
            if depth < 0 || (depth == 0 && p + i != q) {
                return false;
            }
        }
        depth == 0
    }

    /// Index of the operator that splits `[p, q]`.
    ///
    /// Only operators outside any parentheses are candidates. The lowest
    /// [`Precedence`] wins; among equal binary ranks the rightmost wins
    /// (left associativity), among unary ones the leftmost (so `--3` nests).
    fn main_operator(&self, p: usize, q: usize) -> EvalResult<usize> {
        let mut depth = 0u32;
        let mut best: Option<(usize, Precedence)> = None;

        for i in p..=q {
            let kind = self.tokens[i].kind;
            match kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                _ if depth > 0 => {}
                _ => {
                    let Some(rank) = Precedence::of(kind) else {
                        continue;
                    };
                    let take = match best {
                        None => true,
                        Some((_, current)) => {
                            rank < current || (rank == current && !kind.is_unary())
                        }
                    };
                    if take {
                        best = Some((i, rank));
                    }
                }
            }
        }

        match best {
            Some((op, rank)) => {
                debug!(p, q, op, kind = %self.tokens[op].kind, ?rank, "main operator");
                Ok(op)
            }
            None => Err(Malformed::NoMainOperator {
                span: self.tokens[p].span.merge(self.tokens[q].span),
            }
            .into()),
        }
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn apply_unary(&self, token: &Token, operand: Word) -> EvalResult<Word> {
        match token.kind {
            TokenKind::Bang => Ok(Word::from(operand == 0)),
            TokenKind::Neg => Ok(operand.wrapping_neg()),
            TokenKind::Deref => Ok(self.machine.read_physical_memory(operand, WORD_BYTES)?),
            kind => Err(not_an_operator(kind, token.span)),
        }
    }
}

fn apply_binary(token: &Token, lhs: Word, rhs: Word) -> EvalResult<Word> {
    let (slhs, srhs) = (lhs as SWord, rhs as SWord);
    let value = match token.kind {
        TokenKind::Plus => lhs.wrapping_add(rhs),
        TokenKind::Minus => lhs.wrapping_sub(rhs),
        TokenKind::Star => lhs.wrapping_mul(rhs),
        TokenKind::Slash => {
            if rhs == 0 {
                return Err(EvalError::DivisionByZero { span: token.span });
            }
            slhs.wrapping_div(srhs) as Word
        }
        TokenKind::Less => Word::from(slhs < srhs),
        TokenKind::Greater => Word::from(slhs > srhs),
        TokenKind::LessEq => Word::from(lhs <= rhs),
        TokenKind::GreaterEq => Word::from(lhs >= rhs),
        TokenKind::EqEq => Word::from(lhs == rhs),
        TokenKind::BangEq => Word::from(lhs != rhs),
        TokenKind::AndAnd => Word::from(lhs != 0 && rhs != 0),
        TokenKind::OrOr => Word::from(lhs != 0 || rhs != 0),
        kind => return Err(not_an_operator(kind, token.span)),
    };
    Ok(value)
}

fn not_an_operator(kind: TokenKind, span: Span) -> EvalError {
    Malformed::BareToken { kind, span }.into()
}
