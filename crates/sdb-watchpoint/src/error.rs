//! Watchpoint pool error types.

use sdb_eval::EvalError;
use thiserror::Error;

/// Errors from watchpoint management and polling. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchpointError {
    /// Every slot is on the active list.
    #[error("no free watchpoint: all {capacity} slots are in use")]
    PoolExhausted { capacity: usize },

    /// The id does not name an active watchpoint.
    #[error("watchpoint {0} is not active")]
    NotFound(usize),

    /// The expression text does not fit a slot.
    #[error("expression is {len} bytes, a watchpoint holds at most {limit}")]
    ExpressionTooLong { len: usize, limit: usize },

    /// The expression given to a new watchpoint does not evaluate.
    #[error("invalid watch expression: {0}")]
    InvalidExpression(#[from] EvalError),

    /// An active watchpoint failed to evaluate during polling.
    #[error("watchpoint {id} (`{expression}`): {source}")]
    Eval {
        id: usize,
        expression: String,
        #[source]
        source: EvalError,
    },
}

/// Result alias for watchpoint operations.
pub type WatchpointResult<T> = Result<T, WatchpointError>;
