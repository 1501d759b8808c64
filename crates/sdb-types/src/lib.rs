//! Shared types for the SDB expression core.
//!
//! This crate defines the machine word types, source spans, the tunable
//! limits shared by every stage, and the lexer error type.

mod error;
mod limits;
mod span;

pub use error::LexError;
pub use limits::{Limits, NR_WP};
pub use span::Span;

/// Machine-width unsigned word. All evaluated results are words.
pub type Word = u32;

/// Signed view of a [`Word`], used for signed division and ordering.
pub type SWord = i32;

/// Width in bytes of one word read from physical memory.
pub const WORD_BYTES: u8 = 4;
