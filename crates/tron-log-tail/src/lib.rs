//! Incremental log tail synchronization
//!
//! Mirrors the server-side current logfile of the TRON Common API into a
//! bounded, ordered buffer of lines. The first fetch reads only the tail of
//! the file; every later fetch asks for the bytes after the last known
//! offset. A rotated logfile (HTTP 416) silently resets the offsets so the
//! next fetch reads the tail of the new file.
//!
//! State lives in an observable [`Store`]: actions are applied by pure
//! reducers and every change is pushed to subscribed listeners.
//!
//! # Example
//!
//! ```rust,no_run
//! use tron_client::ReqwestLogClient;
//! use tron_log_tail::{CurrentLogfile, LogTailState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ReqwestLogClient::new("http://localhost:8080")?;
//! let logfile = CurrentLogfile::new(client, LogTailState::with_max_lines(500));
//!
//! logfile.store().subscribe(|state| {
//!     println!("{} lines buffered", state.logs.len());
//! });
//!
//! logfile.fetch_and_store_current_logfile().await?;
//! for line in logfile.current_log() {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod content_range;
pub mod current_logfile;
pub mod error;
pub mod past_logfiles;
pub mod poller;
pub mod reducers;
pub mod state;
pub mod store;

pub use actions::{LogTailAction, PastLogsAction};
pub use content_range::{parse_content_range_header, ContentRange};
pub use current_logfile::{CurrentLogfile, FetchOutcome, LogTailStore, DEFAULT_TAIL_BYTES};
pub use error::{ContentRangeError, SyncError};
pub use past_logfiles::{PastLogfiles, PastLogsStore};
pub use poller::LogTailPoller;
pub use state::{split_lines, LogTailState, PastLogsState};
pub use store::{Store, SubscriptionId};
