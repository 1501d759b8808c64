//! The ordered lexer rule table.
//!
//! Rules are tried in table order and the first one that matches at the
//! cursor wins, so every multi-character operator must come before its
//! single-character prefix (`<=` before `<`, `!=` before `!`), and the
//! hexadecimal literal before the decimal one.

use crate::token::TokenKind;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// What the lexer does with a rule's match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Recognize and discard (whitespace).
    Skip,
    /// Emit a token of the given kind.
    Emit(TokenKind),
}

/// One `(pattern, action)` entry of a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pattern: &'static str,
    pub action: RuleAction,
}

impl Rule {
    const fn skip(pattern: &'static str) -> Self {
        Self {
            pattern,
            action: RuleAction::Skip,
        }
    }

    const fn emit(pattern: &'static str, kind: TokenKind) -> Self {
        Self {
            pattern,
            action: RuleAction::Emit(kind),
        }
    }
}

/// The expression language's rule table, in priority order.
pub const STANDARD_RULES: &[Rule] = &[
    Rule::skip(r"[ \t]+"),
    Rule::emit(r"\+", TokenKind::Plus),
    Rule::emit(r"-", TokenKind::Minus),
    Rule::emit(r"\*", TokenKind::Star),
    Rule::emit(r"/", TokenKind::Slash),
    Rule::emit(r"==", TokenKind::EqEq),
    Rule::emit(r"!=", TokenKind::BangEq),
    Rule::emit(r"<=", TokenKind::LessEq),
    Rule::emit(r">=", TokenKind::GreaterEq),
    Rule::emit(r"<", TokenKind::Less),
    Rule::emit(r">", TokenKind::Greater),
    Rule::emit(r"\(", TokenKind::LParen),
    Rule::emit(r"\)", TokenKind::RParen),
    Rule::emit(r"0[xX][0-9a-fA-F]+", TokenKind::HexNum),
    Rule::emit(r"[0-9]+", TokenKind::DecNum),
    Rule::emit(r"\$\$?[A-Za-z0-9]+", TokenKind::Register),
    Rule::emit(r"&&", TokenKind::AndAnd),
    Rule::emit(r"\|\|", TokenKind::OrOr),
    Rule::emit(r"!", TokenKind::Bang),
];

/// A rule pattern failed to compile.
#[derive(Debug, Error)]
#[error("lexer rule {index} `{pattern}` failed to compile: {source}")]
pub struct RuleError {
    pub index: usize,
    pub pattern: &'static str,
    #[source]
    pub source: regex::Error,
}

/// A rule with its pattern compiled and anchored at the cursor.
#[derive(Debug)]
struct CompiledRule {
    regex: Regex,
    rule: Rule,
}

/// An immutable, precompiled rule table.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<CompiledRule>,
}

static STANDARD_TABLE: OnceLock<RuleTable> = OnceLock::new();

impl RuleTable {
    /// Compile `rules`, preserving their order.
    pub fn new(rules: &[Rule]) -> Result<Self, RuleError> {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Regex::new(&format!("^(?:{})", rule.pattern))
                    .map(|regex| CompiledRule { regex, rule: *rule })
                    .map_err(|source| RuleError {
                        index,
                        pattern: rule.pattern,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// The [`STANDARD_RULES`] table, compiled on first use.
    ///
    /// # Panics
    ///
    /// Panics if a built-in pattern does not compile. That is a defect in
    /// [`STANDARD_RULES`], not a runtime condition.
    pub fn standard() -> &'static RuleTable {
        STANDARD_TABLE.get_or_init(|| match Self::new(STANDARD_RULES) {
            Ok(table) => table,
            Err(e) => panic!("{e}"),
        })
    }

    /// Find the first rule matching at the start of `input`.
    ///
    /// Returns the rule index, its action, and the match length in bytes.
    /// Empty matches are ignored so a bad pattern cannot stall the cursor.
    pub fn first_match(&self, input: &str) -> Option<(usize, RuleAction, usize)> {
        self.rules.iter().enumerate().find_map(|(i, compiled)| {
            compiled
                .regex
                .find(input)
                .filter(|m| !m.is_empty())
                .map(|m| (i, compiled.rule.action, m.end()))
        })
    }

    /// The source pattern of rule `index`.
    pub fn pattern(&self, index: usize) -> Option<&'static str> {
        self.rules.get(index).map(|c| c.rule.pattern)
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Compile the standard rules ahead of the first expression.
///
/// Idempotent; later calls return immediately.
pub fn init_rules() {
    RuleTable::standard();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_compiles() {
        init_rules();
        init_rules();
        assert_eq!(RuleTable::standard().len(), STANDARD_RULES.len());
    }

    #[test]
    fn test_two_char_operators_precede_prefixes() {
        let index_of = |kind: TokenKind| {
            STANDARD_RULES
                .iter()
                .position(|r| r.action == RuleAction::Emit(kind))
                .unwrap()
        };
        assert!(index_of(TokenKind::LessEq) < index_of(TokenKind::Less));
        assert!(index_of(TokenKind::GreaterEq) < index_of(TokenKind::Greater));
        assert!(index_of(TokenKind::BangEq) < index_of(TokenKind::Bang));
        assert!(index_of(TokenKind::HexNum) < index_of(TokenKind::DecNum));
    }

    #[test]
    fn test_first_match_takes_table_order() {
        let table = RuleTable::standard();
        let (_, action, len) = table.first_match("<=3").unwrap();
        assert_eq!(action, RuleAction::Emit(TokenKind::LessEq));
        assert_eq!(len, 2);
        let (_, action, len) = table.first_match("0x1f+1").unwrap();
        assert_eq!(action, RuleAction::Emit(TokenKind::HexNum));
        assert_eq!(len, 4);
    }

    #[test]
    fn test_first_match_is_anchored() {
        assert!(RuleTable::standard().first_match("@1").is_none());
    }

    #[test]
    fn test_first_rule_wins_over_longer_later_rule() {
        let table = RuleTable::new(&[
            Rule::emit(r"<", TokenKind::Less),
            Rule::emit(r"<=", TokenKind::LessEq),
        ])
        .unwrap();
        let (index, action, len) = table.first_match("<=").unwrap();
        assert_eq!(index, 0);
        assert_eq!(action, RuleAction::Emit(TokenKind::Less));
        assert_eq!(len, 1);
    }

    #[test]
    fn test_bad_pattern_is_reported() {
        let err = RuleTable::new(&[Rule::skip(" "), Rule::emit("(", TokenKind::LParen)])
            .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.pattern, "(");
    }

    #[test]
    fn test_empty_match_is_ignored() {
        let table = RuleTable::new(&[Rule::skip(r"\s*")]).unwrap();
        assert!(table.first_match("x").is_none());
    }
}
