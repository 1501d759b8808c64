//! Token types for the SDB lexer.
//!
//! Defines [`TokenKind`], the closed set of lexemes an expression can
//! contain, and [`Token`], which pairs a kind with its text and [`Span`].

use sdb_types::Span;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the SDB lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Literal text for literals and registers, the canonical spelling for
    /// two-character operators, empty for everything else.
    pub text: String,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a token that carries no text.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            text: String::new(),
            span,
        }
    }

    /// Create a token that keeps `text`.
    pub fn with_text(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Return a copy of this token reclassified as `kind`.
    pub fn promoted(&self, kind: TokenKind) -> Self {
        Self {
            kind,
            text: self.text.clone(),
            span: self.span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            f.write_str(&self.text)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind an SDB expression can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ── Operands ─────────────────────────────────────────────

    /// Decimal integer literal: `42`
    DecNum,
    /// Hexadecimal integer literal: `0x80000000`
    HexNum,
    /// Register reference: `$sp`, `$a0`, `$$0`
    Register,

    // ── Binary operators ─────────────────────────────────────

    /// `+`
    Plus,
    /// `-` (binary; see [`TokenKind::Neg`])
    Minus,
    /// `*` (binary; see [`TokenKind::Deref`])
    Star,
    /// `/`
    Slash,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,

    // ── Unary operators ──────────────────────────────────────

    /// `!`
    Bang,
    /// Numeric negation: a `-` in unary position.
    Neg,
    /// Memory dereference: a `*` in unary position.
    Deref,

    // ── Brackets ─────────────────────────────────────────────

    /// `(`
    LParen,
    /// `)`
    RParen,
}

impl TokenKind {
    /// Literals and register references.
    pub fn is_operand(self) -> bool {
        matches!(self, Self::DecNum | Self::HexNum | Self::Register)
    }

    /// Any operator, binary or unary.
    pub fn is_operator(self) -> bool {
        !self.is_operand() && !self.is_paren()
    }

    /// Operators that take only a right operand.
    pub fn is_unary(self) -> bool {
        matches!(self, Self::Bang | Self::Neg | Self::Deref)
    }

    /// `(` or `)`.
    pub fn is_paren(self) -> bool {
        matches!(self, Self::LParen | Self::RParen)
    }

    /// Returns `true` if the lexer keeps the matched text for this kind.
    pub fn keeps_text(self) -> bool {
        self.is_operand()
            || matches!(
                self,
                Self::EqEq | Self::BangEq | Self::LessEq | Self::GreaterEq | Self::AndAnd | Self::OrOr
            )
    }

    /// The unary kind a `-` or `*` becomes in unary position.
    pub fn as_unary(self) -> Option<TokenKind> {
        match self {
            Self::Minus => Some(Self::Neg),
            Self::Star => Some(Self::Deref),
            Self::Bang => Some(Self::Bang),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DecNum => "decimal literal",
            Self::HexNum => "hexadecimal literal",
            Self::Register => "register",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Less => "<",
            Self::Greater => ">",
            Self::EqEq => "==",
            Self::BangEq => "!=",
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Bang => "!",
            Self::Neg => "unary -",
            Self::Deref => "unary *",
            Self::LParen => "(",
            Self::RParen => ")",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_a_partition() {
        let all = [
            TokenKind::DecNum,
            TokenKind::HexNum,
            TokenKind::Register,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::LessEq,
            TokenKind::GreaterEq,
            TokenKind::AndAnd,
            TokenKind::OrOr,
            TokenKind::Bang,
            TokenKind::Neg,
            TokenKind::Deref,
            TokenKind::LParen,
            TokenKind::RParen,
        ];
        for kind in all {
            let classes = [kind.is_operand(), kind.is_operator(), kind.is_paren()];
            assert_eq!(
                classes.iter().filter(|c| **c).count(),
                1,
                "{kind:?} must be exactly one of operand/operator/paren"
            );
        }
    }

    #[test]
    fn test_as_unary() {
        assert_eq!(TokenKind::Minus.as_unary(), Some(TokenKind::Neg));
        assert_eq!(TokenKind::Star.as_unary(), Some(TokenKind::Deref));
        assert_eq!(TokenKind::Bang.as_unary(), Some(TokenKind::Bang));
        assert_eq!(TokenKind::Plus.as_unary(), None);
        assert_eq!(TokenKind::EqEq.as_unary(), None);
    }

    #[test]
    fn test_keeps_text() {
        assert!(TokenKind::HexNum.keeps_text());
        assert!(TokenKind::OrOr.keeps_text());
        assert!(!TokenKind::Plus.keeps_text());
        assert!(!TokenKind::LParen.keeps_text());
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::LessEq.to_string(), "<=");
        assert_eq!(TokenKind::Deref.to_string(), "unary *");
        let tok = Token::with_text(TokenKind::Register, "$sp", Span::new(0, 3));
        assert_eq!(tok.to_string(), "$sp");
        let tok = Token::new(TokenKind::Plus, Span::new(0, 1));
        assert_eq!(tok.to_string(), "+");
    }
}
