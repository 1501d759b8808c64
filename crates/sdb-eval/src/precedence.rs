//! Operator binding strength.

use sdb_lexer::TokenKind;

/// Precedence rank; lower ranks bind more loosely.
///
/// The main operator of a range is the top-level operator with the lowest
/// rank, so `Logical` operators split first and `Unary` ones last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// `&&` `||`
    Logical = 1,
    /// `==` `!=` `<=` `>=` `<` `>`
    Relational = 2,
    /// `+` `-`
    Additive = 3,
    /// `*` `/`
    Multiplicative = 4,
    /// `!`, negation, dereference
    Unary = 5,
}

impl Precedence {
    /// Rank of an operator kind; `None` for operands and brackets.
    pub fn of(kind: TokenKind) -> Option<Self> {
        use TokenKind::*;
        match kind {
            AndAnd | OrOr => Some(Self::Logical),
            EqEq | BangEq | LessEq | GreaterEq | Less | Greater => Some(Self::Relational),
            Plus | Minus => Some(Self::Additive),
            Star | Slash => Some(Self::Multiplicative),
            Bang | Neg | Deref => Some(Self::Unary),
            DecNum | HexNum | Register | LParen | RParen => None,
        }
    }
}
