//! TRON log API data transfer objects
//!
//! These types represent what the log endpoints send and receive.
//! They are intentionally separate from the synchronizer state
//! to keep this crate pure and reusable.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte range requested from the current logfile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// The last `n` bytes of the file (`bytes=-n`)
    Suffix(u64),
    /// Everything from `offset` to the end of the file (`bytes=offset-`)
    From(u64),
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suffix(n) => write!(f, "bytes=-{}", n),
            Self::From(offset) => write!(f, "bytes={}-", offset),
        }
    }
}

/// A successful response from the current logfile endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogfileChunk {
    /// HTTP status (200 or 206)
    pub status: u16,

    /// Raw `Content-Range` header value, if the server sent one
    pub content_range: Option<String>,

    /// Newline-delimited log text
    pub body: Bytes,
}

/// An archived logfile available for download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastLogfile {
    /// File name (e.g., "tron-2024-01-01.log")
    pub name: String,

    /// URI the file can be downloaded from
    pub download_uri: String,
}
