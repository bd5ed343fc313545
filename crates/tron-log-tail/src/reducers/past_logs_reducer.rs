//! Past Logs Reducer

use crate::actions::PastLogsAction;
use crate::state::PastLogsState;

/// Reduce past logs state based on PastLogsAction
pub fn reduce_past_logs(mut state: PastLogsState, action: &PastLogsAction) -> PastLogsState {
    match action {
        PastLogsAction::FetchStarted => {
            state.pending = true;
        }

        PastLogsAction::FetchSucceeded(files) => {
            state.files = files.clone();
            state.error = None;
            state.pending = false;
        }

        // The previous listing stays cached
        PastLogsAction::FetchFailed(message) => {
            state.error = Some(message.clone());
            state.pending = false;
        }

        PastLogsAction::FetchAborted => {
            state.pending = false;
        }
    }

    state
}
