//! Synchronizer state
//!
//! Each state record is owned by one [`Store`](crate::Store) and changed
//! only through actions.

mod log_tail;
mod past_logs;

pub use log_tail::{split_lines, LogTailState, DEFAULT_MAX_LINES, DEFAULT_REFRESH_RATE};
pub use past_logs::PastLogsState;
