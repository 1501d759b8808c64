use serde::{Deserialize, Serialize};

/// Number of watchpoint slots in the default pool.
pub const NR_WP: usize = 32;

/// Capacity bounds shared by the lexer, evaluator, and watchpoint pool.
///
/// Every field has a default, so a partial JSON document is valid:
/// `{"watchpoints": 8}` keeps the other three defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of tokens in one expression.
    pub max_tokens: usize,
    /// Maximum length in bytes of a single token's text.
    pub max_token_len: usize,
    /// Maximum length in bytes of an expression stored in a watchpoint.
    pub max_expr_len: usize,
    /// Number of slots in the watchpoint pool.
    pub watchpoints: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            max_token_len: 32,
            max_expr_len: 128,
            watchpoints: NR_WP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = Limits::default();
        assert_eq!(limits.watchpoints, 32);
        assert_eq!(limits.max_token_len, 32);
        assert_eq!(limits.max_expr_len, 128);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let limits: Limits = serde_json::from_str(r#"{"watchpoints": 4}"#).unwrap();
        assert_eq!(limits.watchpoints, 4);
        assert_eq!(limits.max_tokens, Limits::default().max_tokens);
    }
}
