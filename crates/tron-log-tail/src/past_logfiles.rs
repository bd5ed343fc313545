//! Past logfiles lister
//!
//! Fetches the listing of archived logfiles and caches it. The cache is
//! replaced wholesale on success; there is no merging.

use crate::actions::PastLogsAction;
use crate::reducers::reduce_past_logs;
use crate::state::PastLogsState;
use crate::store::Store;
use log::{debug, warn};
use tron_client::{ClientError, PastLogfile, TronLogClient};

/// Store holding the past logs listing
pub type PastLogsStore = Store<PastLogsState, PastLogsAction>;

pub struct PastLogfiles<C> {
    client: C,
    store: PastLogsStore,
}

impl<C: TronLogClient> PastLogfiles<C> {
    pub fn new(client: C) -> Self {
        Self::with_store(client, Store::new(PastLogsState::default(), reduce_past_logs))
    }

    pub fn with_store(client: C, store: PastLogsStore) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &PastLogsStore {
        &self.store
    }

    /// Fetch the listing and replace the cached one
    ///
    /// Failures are recorded in state and returned to the caller.
    pub async fn fetch_and_store_past_logfiles(&self) -> Result<Vec<PastLogfile>, ClientError> {
        let in_flight = self
            .store
            .begin(PastLogsAction::FetchStarted, PastLogsAction::FetchAborted);

        match self.client.fetch_past_logfiles().await {
            Ok(files) => {
                debug!("Caching {} past logfiles", files.len());
                in_flight.settle(PastLogsAction::FetchSucceeded(files.clone()));
                Ok(files)
            }
            Err(e) => {
                warn!("Failed to fetch past logfiles: {}", e);
                in_flight.settle(PastLogsAction::FetchFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// True while a fetch is in flight
    pub fn is_promised(&self) -> bool {
        self.store.select(|state| state.pending)
    }

    /// Cached listing; empty while a fetch is in flight
    pub fn past_logs(&self) -> Vec<PastLogfile> {
        self.store.select(|state| state.visible_files().to_vec())
    }

    pub fn error(&self) -> Option<String> {
        self.store.select(|state| state.error.clone())
    }
}
