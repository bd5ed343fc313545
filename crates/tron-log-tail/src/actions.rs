//! Actions
//!
//! Every state change of the synchronizer and the past logs lister is one
//! of these actions, applied by the matching reducer.

use crate::content_range::ContentRange;
use std::time::Duration;
use tron_client::PastLogfile;

/// Log tail actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTailAction {
    /// A fetch of the current logfile was issued
    FetchStarted,

    /// Lines received for the given window of the remote file
    FetchSucceeded {
        lines: Vec<String>,
        range: ContentRange,
    },

    /// The server rejected the range because the logfile was rotated
    RotationDetected,

    /// The fetch failed; carries the message shown to the user
    FetchFailed(String),

    /// The in-flight fetch was dropped before it settled
    FetchAborted,

    /// Back to the zero state, keeping configuration
    Clear,

    SetMaxLines(usize),
    SetRefreshRate(Duration),
}

/// Past logs listing actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PastLogsAction {
    FetchStarted,
    FetchSucceeded(Vec<PastLogfile>),
    FetchFailed(String),
    FetchAborted,
}
