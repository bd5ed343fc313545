//! Past Logs State
//!
//! Listing of archived logfiles, replaced wholesale on every successful fetch.

use tron_client::PastLogfile;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PastLogsState {
    /// Last successfully fetched listing
    pub files: Vec<PastLogfile>,

    /// True while a listing fetch is in flight
    pub pending: bool,

    /// Message of the last failed fetch, cleared by the next success
    pub error: Option<String>,
}

impl PastLogsState {
    /// Listing as shown to the UI: empty while a fetch is pending
    pub fn visible_files(&self) -> &[PastLogfile] {
        if self.pending {
            &[]
        } else {
            &self.files
        }
    }
}
