//! SDB watchpoint pool.
//!
//! A fixed number of slots partitioned into a free list and an active list,
//! both threaded through the same backing array by index. Active
//! watchpoints are re-evaluated together by [`WatchpointPool::poll_all`].

pub mod error;
pub mod pool;

pub use error::{WatchpointError, WatchpointResult};
pub use pool::{Watchpoint, WatchpointPool};
