//! Reducers
//!
//! Pure functions from (state, action) to the next state.

mod log_tail_reducer;
mod past_logs_reducer;

pub use log_tail_reducer::reduce_log_tail;
pub use past_logs_reducer::reduce_past_logs;
