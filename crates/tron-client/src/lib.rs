//! HTTP client for the TRON Common API log endpoints
//!
//! This crate provides a trait-based client for the two log endpoints the
//! dashboard reads from: the current logfile (fetched with byte ranges) and
//! the listing of archived logfiles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              TronLogClient trait                 │
//! │  - fetch_current_logfile(range)                  │
//! │  - fetch_past_logfiles()                         │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ ReqwestLogClient│         │ Arc<T>              │
//! │ (direct API)    │◄────────│ (shared handle)     │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use tron_client::{ByteRange, ReqwestLogClient, TronLogClient};
//!
//! # async fn example() -> Result<(), tron_client::ClientError> {
//! let client = ReqwestLogClient::new("http://localhost:8080")?;
//!
//! // Last 10KB of the current logfile
//! let chunk = client.fetch_current_logfile(ByteRange::Suffix(10_240)).await?;
//! println!("{:?}", chunk.content_range);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod reqwest_client;
pub mod types;

/// Default path of the current logfile endpoint
pub const DEFAULT_CURRENT_LOGFILE_PATH: &str = "/api/v1/logfiles/current";

/// Default path of the archived logfiles listing endpoint
pub const DEFAULT_PAST_LOGFILES_PATH: &str = "/api/v1/logfiles";

pub use client::TronLogClient;
pub use error::ClientError;
pub use reqwest_client::ReqwestLogClient;
pub use types::{ByteRange, LogfileChunk, PastLogfile};

// Re-export bytes so consumers don't need to depend on it directly
pub use bytes::Bytes;
