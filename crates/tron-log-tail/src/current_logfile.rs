//! Current logfile synchronizer
//!
//! Keeps a [`LogTailState`] in step with the server-side current logfile:
//! the first fetch reads the last [`DEFAULT_TAIL_BYTES`] bytes, later
//! fetches read everything after the last known end offset.
//!
//! The synchronizer does not serialize fetches itself. Callers must not
//! start a fetch while [`CurrentLogfile::is_loading`] is true for the same
//! store; [`LogTailPoller`](crate::LogTailPoller) skips such ticks.

use crate::actions::LogTailAction;
use crate::content_range::{parse_content_range_header, ContentRange};
use crate::error::SyncError;
use crate::reducers::reduce_log_tail;
use crate::state::{split_lines, LogTailState};
use crate::store::Store;
use log::{debug, info, warn};
use std::time::Duration;
use tron_client::TronLogClient;

/// Size of the tail read when (re)starting to follow the logfile
pub const DEFAULT_TAIL_BYTES: u64 = 10 * 1024;

/// Store holding the log tail state
pub type LogTailStore = Store<LogTailState, LogTailAction>;

/// What a single fetch did to the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Number of lines received (before eviction)
    Appended(usize),
    /// The logfile was rotated; offsets were reset
    Rotated,
    /// The request failed; the message is now in `errors`
    Failed(String),
}

/// Mirrors the current logfile into a bounded line buffer
pub struct CurrentLogfile<C> {
    client: C,
    store: LogTailStore,
    tail_bytes: u64,
}

impl<C: TronLogClient> CurrentLogfile<C> {
    /// Create a synchronizer with its own store holding `initial_state`
    pub fn new(client: C, initial_state: LogTailState) -> Self {
        Self::with_store(client, Store::new(initial_state, reduce_log_tail))
    }

    /// Create a synchronizer mutating an existing store
    pub fn with_store(client: C, store: LogTailStore) -> Self {
        Self {
            client,
            store,
            tail_bytes: DEFAULT_TAIL_BYTES,
        }
    }

    /// Size of the tail read on the first fetch and after a rotation
    pub fn tail_bytes(mut self, tail_bytes: u64) -> Self {
        self.tail_bytes = tail_bytes;
        self
    }

    /// The store backing this synchronizer, for subscribing
    pub fn store(&self) -> &LogTailStore {
        &self.store
    }

    /// Fetch new log content and merge it into the buffer
    ///
    /// Transport failures are captured into state and reported as
    /// [`FetchOutcome::Failed`]; HTTP 416 resets the offsets and reports
    /// [`FetchOutcome::Rotated`]. A response violating the range contract
    /// (unparseable `Content-Range`, unexpected 2xx status) is recorded in
    /// `errors` and returned as `Err`.
    ///
    /// Dropping the returned future cancels the fetch; `loading` is reset
    /// and nothing else changes.
    pub async fn fetch_and_store_current_logfile(&self) -> Result<FetchOutcome, SyncError> {
        let in_flight = self
            .store
            .begin(LogTailAction::FetchStarted, LogTailAction::FetchAborted);
        let range = self.store.select(|state| state.next_range(self.tail_bytes));
        debug!("Fetching current logfile with Range {}", range);

        let chunk = match self.client.fetch_current_logfile(range).await {
            Ok(chunk) => chunk,
            Err(e) if e.is_range_not_satisfiable() => {
                info!("Current logfile was rotated, re-reading its tail on next fetch");
                in_flight.settle(LogTailAction::RotationDetected);
                return Ok(FetchOutcome::Rotated);
            }
            Err(e) => {
                let message = e.to_string();
                warn!("Failed to fetch current logfile: {}", message);
                in_flight.settle(LogTailAction::FetchFailed(message.clone()));
                return Ok(FetchOutcome::Failed(message));
            }
        };

        let parsed = if matches!(chunk.status, 200 | 206) {
            parse_content_range_header(chunk.content_range.as_deref().unwrap_or_default())
                .map_err(SyncError::from)
        } else {
            Err(SyncError::UnexpectedStatus(chunk.status))
        };
        let range = match parsed {
            Ok(range) => range,
            Err(e) => {
                warn!(
                    "Current logfile response violates range contract: {} (Content-Range {:?})",
                    e, chunk.content_range
                );
                in_flight.settle(LogTailAction::FetchFailed(e.to_string()));
                return Err(e);
            }
        };

        // A suffix range may start in the middle of a multi-byte character
        let lines = split_lines(&String::from_utf8_lossy(&chunk.body));
        let received = lines.len();
        debug!(
            "Received {} lines for bytes {}-{}/{}",
            received, range.start, range.end, range.length
        );

        in_flight.settle(LogTailAction::FetchSucceeded { lines, range });
        Ok(FetchOutcome::Appended(received))
    }

    /// Reset buffer, offsets, loading flag and error; keep configuration
    pub fn clear_state(&self) {
        self.store.dispatch(LogTailAction::Clear);
    }

    pub fn set_max_lines(&self, max_lines: usize) {
        self.store.dispatch(LogTailAction::SetMaxLines(max_lines));
    }

    pub fn set_refresh_rate(&self, refresh_rate: Duration) {
        self.store.dispatch(LogTailAction::SetRefreshRate(refresh_rate));
    }

    pub fn is_loading(&self) -> bool {
        self.store.select(|state| state.loading)
    }

    /// Snapshot of the buffered lines, oldest first
    pub fn current_log(&self) -> Vec<String> {
        self.store.select(|state| state.logs.iter().cloned().collect())
    }

    pub fn refresh_rate(&self) -> Duration {
        self.store.select(|state| state.refresh_rate)
    }

    pub fn error(&self) -> Option<String> {
        self.store.select(|state| state.errors.clone())
    }

    /// Last known byte window of the remote file
    pub fn range(&self) -> ContentRange {
        self.store.select(|state| state.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tron_client::{ByteRange, Bytes, ClientError, LogfileChunk, PastLogfile};

    /// Mock client answering with scripted responses
    #[derive(Clone, Default)]
    struct MockClient {
        responses: Arc<Mutex<VecDeque<Result<LogfileChunk, ClientError>>>>,
        requests: Arc<Mutex<Vec<ByteRange>>>,
    }

    impl MockClient {
        fn respond(&self, response: Result<LogfileChunk, ClientError>) -> &Self {
            self.responses.lock().unwrap().push_back(response);
            self
        }

        fn respond_ok(&self, content_range: &str, body: &str) -> &Self {
            self.respond(Ok(chunk(206, Some(content_range), body)))
        }

        fn respond_status(&self, status: u16) -> &Self {
            self.respond(Err(ClientError::Status {
                status,
                message: format!("status {}", status),
            }))
        }

        fn requests(&self) -> Vec<ByteRange> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TronLogClient for MockClient {
        async fn fetch_current_logfile(
            &self,
            range: ByteRange,
        ) -> Result<LogfileChunk, ClientError> {
            self.requests.lock().unwrap().push(range);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected request")
        }

        async fn fetch_past_logfiles(&self) -> Result<Vec<PastLogfile>, ClientError> {
            Ok(vec![])
        }
    }

    /// Client whose requests never complete
    struct HangingClient;

    #[async_trait]
    impl TronLogClient for HangingClient {
        async fn fetch_current_logfile(
            &self,
            _range: ByteRange,
        ) -> Result<LogfileChunk, ClientError> {
            std::future::pending().await
        }

        async fn fetch_past_logfiles(&self) -> Result<Vec<PastLogfile>, ClientError> {
            std::future::pending().await
        }
    }

    fn chunk(status: u16, content_range: Option<&str>, body: &str) -> LogfileChunk {
        LogfileChunk {
            status,
            content_range: content_range.map(str::to_string),
            body: Bytes::from(body.to_string()),
        }
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Synchronizer that already followed the log once
    async fn bootstrapped(mock: &MockClient) -> CurrentLogfile<MockClient> {
        mock.respond_ok("0-10/10", "one\ntwo\n");
        let logfile = CurrentLogfile::new(mock.clone(), LogTailState::with_max_lines(100));
        logfile.fetch_and_store_current_logfile().await.unwrap();
        logfile
    }

    #[tokio::test]
    async fn test_first_fetch_keeps_last_max_lines() {
        let mock = MockClient::default();
        mock.respond_ok("0-42/42", "test\ntest1\ntest2\ntest3\ntest4\ntest5\ntest6\n");
        let logfile = CurrentLogfile::new(mock.clone(), LogTailState::with_max_lines(5));

        let outcome = logfile.fetch_and_store_current_logfile().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Appended(7));
        assert_eq!(
            logfile.current_log(),
            lines(&["test2", "test3", "test4", "test5", "test6"])
        );
        assert_eq!(mock.requests(), vec![ByteRange::Suffix(DEFAULT_TAIL_BYTES)]);
    }

    #[tokio::test]
    async fn test_successive_fetches_append_in_order() {
        let mock = MockClient::default();
        mock.respond_ok("0-4/4", "Test").respond_ok("4-10/10", "Test 2");
        let logfile = CurrentLogfile::new(mock.clone(), LogTailState::with_max_lines(1000));

        logfile.fetch_and_store_current_logfile().await.unwrap();
        logfile.fetch_and_store_current_logfile().await.unwrap();

        assert_eq!(logfile.current_log(), lines(&["Test", "Test 2"]));
        assert_eq!(
            logfile.range(),
            ContentRange {
                start: 4,
                end: 10,
                length: 10
            }
        );
        assert_eq!(
            mock.requests(),
            vec![ByteRange::Suffix(DEFAULT_TAIL_BYTES), ByteRange::From(4)]
        );
    }

    #[tokio::test]
    async fn test_custom_tail_size() {
        let mock = MockClient::default();
        mock.respond_ok("*/0", "");
        let logfile = CurrentLogfile::new(mock.clone(), LogTailState::default()).tail_bytes(512);

        logfile.fetch_and_store_current_logfile().await.unwrap();

        assert_eq!(mock.requests(), vec![ByteRange::Suffix(512)]);
    }

    #[tokio::test]
    async fn test_caught_up_response_collapses_window() {
        let mock = MockClient::default();
        let logfile = bootstrapped(&mock).await;
        mock.respond_ok("*/9000", "");

        let outcome = logfile.fetch_and_store_current_logfile().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Appended(0));
        assert_eq!(logfile.range(), ContentRange::caught_up(9000));
        assert_eq!(logfile.current_log(), lines(&["one", "two"]));
    }

    #[tokio::test]
    async fn test_rotation_resets_range_and_rebootstraps() {
        let mock = MockClient::default();
        let logfile = bootstrapped(&mock).await;
        mock.respond_status(416).respond_ok("0-6/6", "fresh\n");

        let outcome = logfile.fetch_and_store_current_logfile().await.unwrap();
        assert_eq!(outcome, FetchOutcome::Rotated);
        assert_eq!(logfile.range(), ContentRange::default());
        assert!(logfile.error().is_none());
        assert!(!logfile.is_loading());
        assert_eq!(logfile.current_log(), lines(&["one", "two"]));

        logfile.fetch_and_store_current_logfile().await.unwrap();
        assert_eq!(logfile.current_log(), lines(&["one", "two", "fresh"]));
        assert_eq!(
            mock.requests(),
            vec![
                ByteRange::Suffix(DEFAULT_TAIL_BYTES),
                ByteRange::From(10),
                ByteRange::Suffix(DEFAULT_TAIL_BYTES),
            ]
        );
    }

    #[tokio::test]
    async fn test_rotation_does_not_clear_previous_error() {
        let mock = MockClient::default();
        let logfile = bootstrapped(&mock).await;
        mock.respond_status(500).respond_status(416);

        logfile.fetch_and_store_current_logfile().await.unwrap();
        logfile.fetch_and_store_current_logfile().await.unwrap();

        assert_eq!(logfile.error().as_deref(), Some("Request failed with status 500: status 500"));
        assert_eq!(logfile.range(), ContentRange::default());
    }

    #[tokio::test]
    async fn test_transport_error_leaves_buffer_untouched() {
        let mock = MockClient::default();
        let logfile = bootstrapped(&mock).await;
        let before = logfile.store().state();
        mock.respond_status(503);

        let outcome = logfile.fetch_and_store_current_logfile().await.unwrap();

        let message = "Request failed with status 503: status 503".to_string();
        assert_eq!(outcome, FetchOutcome::Failed(message.clone()));
        let after = logfile.store().state();
        assert_eq!(after.errors, Some(message));
        assert_eq!(after.logs, before.logs);
        assert_eq!(after.range, before.range);
        assert!(!after.loading);
    }

    #[tokio::test]
    async fn test_success_clears_error() {
        let mock = MockClient::default();
        let logfile = bootstrapped(&mock).await;
        mock.respond_status(500).respond_ok("10-16/16", "three\n");

        logfile.fetch_and_store_current_logfile().await.unwrap();
        assert!(logfile.error().is_some());

        logfile.fetch_and_store_current_logfile().await.unwrap();
        assert!(logfile.error().is_none());
        assert_eq!(logfile.current_log(), lines(&["one", "two", "three"]));
    }

    #[tokio::test]
    async fn test_malformed_content_range_fails_loudly() {
        let mock = MockClient::default();
        let logfile = bootstrapped(&mock).await;
        let before = logfile.store().state();
        mock.respond_ok("9000-10000-1000/9000", "ignored\n");

        let err = logfile.fetch_and_store_current_logfile().await.unwrap_err();

        assert!(matches!(err, SyncError::ContentRange(_)));
        assert_eq!(
            logfile.error().as_deref(),
            Some("Could not parse Content-Range header")
        );
        assert_eq!(logfile.current_log(), Vec::from(before.logs));
        assert_eq!(logfile.range(), before.range);
        assert!(!logfile.is_loading());
    }

    #[tokio::test]
    async fn test_missing_content_range_fails_loudly() {
        let mock = MockClient::default();
        mock.respond(Ok(chunk(200, None, "whole file\n")));
        let logfile = CurrentLogfile::new(mock, LogTailState::default());

        let err = logfile.fetch_and_store_current_logfile().await.unwrap_err();

        assert!(matches!(err, SyncError::ContentRange(_)));
        assert!(logfile.current_log().is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_success_status_fails_loudly() {
        let mock = MockClient::default();
        mock.respond(Ok(chunk(204, Some("0-0/0"), "")));
        let logfile = CurrentLogfile::new(mock, LogTailState::default());

        let err = logfile.fetch_and_store_current_logfile().await.unwrap_err();

        assert_eq!(err, SyncError::UnexpectedStatus(204));
        assert!(!logfile.is_loading());
    }

    #[tokio::test]
    async fn test_loading_is_true_only_while_in_flight() {
        let mock = MockClient::default();
        mock.respond_ok("0-3/3", "a\n").respond_status(500);
        let logfile = CurrentLogfile::new(mock, LogTailState::default());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        logfile
            .store()
            .subscribe(move |state| seen_clone.lock().unwrap().push(state.loading));

        assert!(!logfile.is_loading());
        logfile.fetch_and_store_current_logfile().await.unwrap();
        assert!(!logfile.is_loading());
        logfile.fetch_and_store_current_logfile().await.unwrap();
        assert!(!logfile.is_loading());

        assert_eq!(*seen.lock().unwrap(), vec![true, false, true, false]);
    }

    #[tokio::test]
    async fn test_dropped_fetch_resets_loading_only() {
        let logfile = CurrentLogfile::new(HangingClient, LogTailState::with_max_lines(3));
        let before = logfile.store().state();

        let result = tokio::time::timeout(
            Duration::from_millis(10),
            logfile.fetch_and_store_current_logfile(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(logfile.store().state(), before);
    }

    #[tokio::test]
    async fn test_lossy_decoding_of_split_character() {
        let mock = MockClient::default();
        // Tail starts in the middle of "é" (0xC3 0xA9)
        mock.respond(Ok(LogfileChunk {
            status: 206,
            content_range: Some("5-12/12".to_string()),
            body: Bytes::from_static(b"\xA9t\nnext\n"),
        }));
        let logfile = CurrentLogfile::new(mock, LogTailState::default());

        logfile.fetch_and_store_current_logfile().await.unwrap();

        assert_eq!(logfile.current_log(), lines(&["\u{FFFD}t", "next"]));
    }

    #[tokio::test]
    async fn test_clear_state_keeps_configuration() {
        let mock = MockClient::default();
        let logfile = bootstrapped(&mock).await;
        logfile.set_refresh_rate(Duration::from_millis(300));
        mock.respond_status(500);
        logfile.fetch_and_store_current_logfile().await.unwrap();

        logfile.clear_state();

        let state = logfile.store().state();
        assert!(state.logs.is_empty());
        assert_eq!(state.range, ContentRange::default());
        assert!(!state.loading);
        assert!(state.errors.is_none());
        assert_eq!(state.max_lines, 100);
        assert_eq!(logfile.refresh_rate(), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_set_max_lines_trims_existing_buffer() {
        let mock = MockClient::default();
        let logfile = bootstrapped(&mock).await;

        logfile.set_max_lines(1);

        assert_eq!(logfile.current_log(), lines(&["two"]));
    }

    #[tokio::test]
    async fn test_shared_store_is_visible_to_other_handles() {
        let mock = MockClient::default();
        mock.respond_ok("0-2/2", "x\n");
        let store = Store::new(LogTailState::default(), reduce_log_tail);
        let reader = store.clone();
        let logfile = CurrentLogfile::with_store(mock, store);

        logfile.fetch_and_store_current_logfile().await.unwrap();

        assert_eq!(reader.select(|s| s.logs.len()), 1);
    }
}
