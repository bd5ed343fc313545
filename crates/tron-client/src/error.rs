//! Client error type

use thiserror::Error;

/// Errors returned by a `TronLogClient`
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-2xx status
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// HTTP 416 Range Not Satisfiable
pub const RANGE_NOT_SATISFIABLE: u16 = 416;

impl ClientError {
    /// The HTTP status code, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidBaseUrl(_) => None,
        }
    }

    /// Whether the server rejected the requested byte range
    ///
    /// For the current logfile endpoint this means the file was rotated and
    /// the remembered offsets point past the end of the new file.
    pub fn is_range_not_satisfiable(&self) -> bool {
        self.status() == Some(RANGE_NOT_SATISFIABLE)
    }
}
