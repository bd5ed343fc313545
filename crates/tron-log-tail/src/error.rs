//! Errors raised by the synchronizer
//!
//! Transport failures are not errors at this level: they are captured
//! into state. These types cover server contract violations only.

use thiserror::Error;

/// A `Content-Range` header that matches neither accepted form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not parse Content-Range header")]
pub struct ContentRangeError {
    /// The offending header value
    pub header: String,
}

/// Errors that make a fetch of the current logfile fail loudly
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error(transparent)]
    ContentRange(#[from] ContentRangeError),

    /// A 2xx response that is neither 200 nor 206
    #[error("Unexpected status {0} from current logfile endpoint")]
    UnexpectedStatus(u16),
}
