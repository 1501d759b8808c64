//! SDB expression evaluator.
//!
//! ```text
//! text → Lexer → TokenStream → unary pre-pass → range evaluator → Word
//! ```
//!
//! Registers and physical memory are reached through the [`Machine`] trait;
//! this crate owns no machine state.

pub mod error;
pub mod evaluator;
pub mod machine;
pub mod precedence;
pub mod unary;

pub use error::{EvalError, EvalResult, Malformed};
pub use evaluator::Evaluator;
pub use machine::{BadAddress, Machine, UnknownRegister};
pub use precedence::Precedence;
pub use unary::resolve_unary;

use sdb_lexer::{Lexer, TokenStream};
use sdb_types::Word;

/// Evaluate `text` against `machine` using the standard lexer and default limits.
pub fn evaluate<M: Machine + ?Sized>(text: &str, machine: &M) -> EvalResult<Word> {
    evaluate_with(&Lexer::default(), text, machine)
}

/// Evaluate `text` with a caller-configured lexer.
pub fn evaluate_with<M: Machine + ?Sized>(
    lexer: &Lexer<'_>,
    text: &str,
    machine: &M,
) -> EvalResult<Word> {
    let tokens = lexer.tokenize(text)?;
    evaluate_tokens(&tokens, machine)
}

/// Evaluate an already-lexed stream.
///
/// The stream is first passed through [`resolve_unary`]; the evaluator only
/// ever sees the resolved copy.
pub fn evaluate_tokens<M: Machine + ?Sized>(tokens: &TokenStream, machine: &M) -> EvalResult<Word> {
    let resolved = resolve_unary(tokens)?;
    Evaluator::new(resolved.as_slice(), machine).eval_all()
}
