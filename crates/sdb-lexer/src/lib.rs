//! SDB lexer: converts expression text into a token stream.
//!
//! Scanning is driven by an ordered table of regex rules; at every cursor
//! position the first rule that matches there wins.

pub mod lexer;
pub mod rules;
pub mod token;

pub use lexer::{Lexer, TokenStream};
pub use rules::{init_rules, Rule, RuleAction, RuleError, RuleTable, STANDARD_RULES};
pub use token::{Token, TokenKind};
