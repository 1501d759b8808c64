//! Evaluation error types.

use crate::machine::{BadAddress, UnknownRegister};
use sdb_lexer::TokenKind;
use sdb_types::{LexError, Span};
use thiserror::Error;

/// Why a token range does not form an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    /// Nothing to evaluate: empty input or an empty sub-range such as `()`.
    #[error("empty expression")]
    Empty,

    /// A `(` without its `)` or the other way round.
    #[error("unbalanced parenthesis at {0}")]
    UnbalancedParen(Span),

    /// A lone operator or bracket where an operand was expected.
    #[error("`{kind}` at {span} cannot stand alone")]
    BareToken { kind: TokenKind, span: Span },

    /// A binary operator at the edge of its range, or a unary one at the end.
    #[error("`{kind}` at {span} is missing an operand")]
    MissingOperand { kind: TokenKind, span: Span },

    /// Operands to the left of a unary main operator.
    #[error("unexpected operand before `{kind}` at {span}")]
    DanglingOperand { kind: TokenKind, span: Span },

    /// Several operands with no top-level operator between them.
    #[error("no operator joins the operands at {span}")]
    NoMainOperator { span: Span },
}

/// Everything that can go wrong evaluating one expression.
///
/// All variants are recoverable; none of them abort the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// An operator in unary position that has no unary form, e.g. a leading `+`.
    #[error("`{kind}` at {span} cannot be used as a unary operator")]
    Disambiguation { kind: TokenKind, span: Span },

    #[error("malformed expression: {0}")]
    Malformed(#[from] Malformed),

    #[error(transparent)]
    UnknownRegister(#[from] UnknownRegister),

    #[error("division by zero at {span}")]
    DivisionByZero { span: Span },

    /// A literal that does not fit in a word.
    #[error("literal `{text}` at {span} does not fit in a word")]
    InvalidLiteral { text: String, span: Span },

    #[error(transparent)]
    BadAddress(#[from] BadAddress),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
