//! Fixed-interval polling of the current logfile
//!
//! Runs [`CurrentLogfile::fetch_and_store_current_logfile`] on a tokio task
//! at the state's refresh rate. A tick is skipped while a fetch is still in
//! flight. The poller stops on a range contract violation, since polling
//! cannot recover from it.

use crate::current_logfile::{CurrentLogfile, FetchOutcome};
use crate::error::SyncError;
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tron_client::TronLogClient;

/// Refresh rates below this are clamped
pub const MIN_REFRESH_RATE: Duration = Duration::from_millis(100);

/// Handle to a running poll loop; dropping it stops the loop
pub struct LogTailPoller {
    handle: Option<JoinHandle<Result<(), SyncError>>>,
}

fn ticker(period: Duration, first_tick: Instant) -> Interval {
    let mut ticker = interval_at(first_tick, period.max(MIN_REFRESH_RATE));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

async fn poll_loop<C, F>(
    logfile: Arc<CurrentLogfile<C>>,
    mut on_outcome: F,
) -> Result<(), SyncError>
where
    C: TronLogClient,
    F: FnMut(&FetchOutcome),
{
    let mut period = logfile.refresh_rate();
    let mut ticks = ticker(period, Instant::now());

    loop {
        ticks.tick().await;

        if logfile.is_loading() {
            debug!("Fetch still in flight, skipping tick");
        } else {
            let outcome = logfile.fetch_and_store_current_logfile().await?;
            on_outcome(&outcome);
        }

        let current = logfile.refresh_rate();
        if current != period {
            debug!("Refresh rate changed from {:?} to {:?}", period, current);
            period = current;
            ticks = ticker(period, Instant::now() + period.max(MIN_REFRESH_RATE));
        }
    }
}

impl LogTailPoller {
    /// Start polling immediately
    ///
    /// `on_outcome` is called after every completed fetch. Changes to the
    /// refresh rate take effect from the next tick.
    pub fn spawn<C, F>(logfile: Arc<CurrentLogfile<C>>, on_outcome: F) -> Self
    where
        C: TronLogClient + 'static,
        F: FnMut(&FetchOutcome) + Send + 'static,
    {
        let handle = tokio::spawn(poll_loop(logfile, on_outcome));

        Self {
            handle: Some(handle),
        }
    }

    /// Stop polling, cancelling a fetch in flight
    pub fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Wait for the poll loop to end
    ///
    /// It only ends on its own with a contract violation; a stopped loop
    /// resolves to `Ok(())`. Dropping the returned future stops the loop,
    /// the same as dropping the poller.
    pub async fn join(mut self) -> Result<(), SyncError> {
        // The handle stays in `self` so that `Drop` still aborts the task
        let Some(handle) = self.handle.as_mut() else {
            return Ok(());
        };
        let joined = handle.await;
        self.handle = None;
        match joined {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Ok(()),
        }
    }
}

impl Drop for LogTailPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LogTailState;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tron_client::{ByteRange, Bytes, ClientError, LogfileChunk, PastLogfile};

    /// Serves one new line per request, growing the file each time
    #[derive(Default)]
    struct GrowingLog {
        requests: Mutex<Vec<ByteRange>>,
        malformed_after: Option<usize>,
    }

    #[async_trait]
    impl TronLogClient for GrowingLog {
        async fn fetch_current_logfile(
            &self,
            range: ByteRange,
        ) -> Result<LogfileChunk, ClientError> {
            let mut requests = self.requests.lock().unwrap();
            requests.push(range);
            let n = requests.len() as u64;

            if self.malformed_after.is_some_and(|limit| requests.len() > limit) {
                return Ok(LogfileChunk {
                    status: 206,
                    content_range: Some("garbage".to_string()),
                    body: Bytes::new(),
                });
            }

            Ok(LogfileChunk {
                status: 206,
                content_range: Some(format!("{}-{}/{}", (n - 1) * 2, n * 2, n * 2)),
                body: Bytes::from(format!("{}\n", n)),
            })
        }

        async fn fetch_past_logfiles(&self) -> Result<Vec<PastLogfile>, ClientError> {
            Ok(vec![])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_at_refresh_rate() {
        let state = LogTailState::default().refresh_rate(Duration::from_secs(1));
        let logfile = Arc::new(CurrentLogfile::new(GrowingLog::default(), state));
        let outcomes = Arc::new(Mutex::new(Vec::new()));

        let outcomes_clone = Arc::clone(&outcomes);
        let poller = LogTailPoller::spawn(Arc::clone(&logfile), move |outcome| {
            outcomes_clone.lock().unwrap().push(outcome.clone())
        });

        tokio::time::sleep(Duration::from_millis(2500)).await;
        poller.stop();

        assert_eq!(
            *outcomes.lock().unwrap(),
            vec![FetchOutcome::Appended(1); 3]
        );
        assert_eq!(logfile.current_log(), vec!["1", "2", "3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_rate_change_applies_to_next_tick() {
        let state = LogTailState::default().refresh_rate(Duration::from_secs(10));
        let logfile = Arc::new(CurrentLogfile::new(GrowingLog::default(), state));

        let poller = LogTailPoller::spawn(Arc::clone(&logfile), |_| {});
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(logfile.current_log().len(), 1);

        logfile.set_refresh_rate(Duration::from_secs(1));
        // The old 10s period is still pending; it fires, then 1s ticks follow
        tokio::time::sleep(Duration::from_millis(12_500)).await;
        poller.stop();

        assert_eq!(logfile.current_log().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_contract_violation() {
        let client = GrowingLog {
            malformed_after: Some(1),
            ..Default::default()
        };
        let state = LogTailState::default().refresh_rate(Duration::from_secs(1));
        let logfile = Arc::new(CurrentLogfile::new(client, state));

        let poller = LogTailPoller::spawn(Arc::clone(&logfile), |_| {});
        let result = poller.join().await;

        assert!(matches!(result, Err(SyncError::ContentRange(_))));
        assert_eq!(logfile.current_log(), vec!["1"]);
        assert!(logfile.error().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_join_stops_polling() {
        let state = LogTailState::default().refresh_rate(Duration::from_secs(1));
        let client = Arc::new(GrowingLog::default());
        let logfile = Arc::new(CurrentLogfile::new(Arc::clone(&client), state));

        let poller = LogTailPoller::spawn(Arc::clone(&logfile), |_| {});
        let joined = tokio::time::timeout(Duration::from_millis(1500), poller.join()).await;
        assert!(joined.is_err());

        let requests_at_drop = client.requests.lock().unwrap().len();
        assert_eq!(requests_at_drop, 2);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(client.requests.lock().unwrap().len(), requests_at_drop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skips_tick_while_loading() {
        let state = LogTailState::default().refresh_rate(Duration::from_secs(1));
        let client = Arc::new(GrowingLog::default());
        let logfile = Arc::new(CurrentLogfile::new(Arc::clone(&client), state));

        // Another consumer holds a fetch in flight
        logfile.store().dispatch(crate::LogTailAction::FetchStarted);
        let poller = LogTailPoller::spawn(Arc::clone(&logfile), |_| {});
        tokio::time::sleep(Duration::from_millis(1500)).await;
        poller.stop();

        assert!(client.requests.lock().unwrap().is_empty());
    }
}
