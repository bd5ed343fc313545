//! Log Tail Reducer
//!
//! Handles state updates for the current logfile mirror.

use crate::actions::LogTailAction;
use crate::content_range::ContentRange;
use crate::state::LogTailState;

/// Reduce log tail state based on LogTailAction
pub fn reduce_log_tail(mut state: LogTailState, action: &LogTailAction) -> LogTailState {
    match action {
        LogTailAction::FetchStarted => {
            state.loading = true;
        }

        LogTailAction::FetchSucceeded { lines, range } => {
            state.push_lines(lines.iter().cloned());
            state.range = *range;
            state.errors = None;
            state.loading = false;
        }

        LogTailAction::RotationDetected => {
            // Next fetch re-reads the tail of the new file
            state.range = ContentRange::default();
            state.loading = false;
        }

        LogTailAction::FetchFailed(message) => {
            state.errors = Some(message.clone());
            state.loading = false;
        }

        LogTailAction::FetchAborted => {
            state.loading = false;
        }

        LogTailAction::Clear => {
            state = LogTailState {
                max_lines: state.max_lines,
                refresh_rate: state.refresh_rate,
                ..LogTailState::default()
            };
        }

        LogTailAction::SetMaxLines(max_lines) => {
            state.max_lines = *max_lines;
            state.truncate_front();
        }

        LogTailAction::SetRefreshRate(refresh_rate) => {
            state.refresh_rate = *refresh_rate;
        }
    }

    state
}
