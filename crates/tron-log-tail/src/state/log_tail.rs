//! Log Tail State
//!
//! Bounded buffer of the most recent lines of the current logfile plus the
//! byte window the next range request is computed from.

use crate::content_range::ContentRange;
use std::collections::VecDeque;
use std::time::Duration;
use tron_client::ByteRange;

/// Default capacity of the line buffer
pub const DEFAULT_MAX_LINES: usize = 1000;

/// Default polling interval of the log page
pub const DEFAULT_REFRESH_RATE: Duration = Duration::from_millis(2000);

/// State of the current logfile mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTailState {
    /// Log lines, oldest first
    pub logs: VecDeque<String>,

    /// Capacity of `logs`; the oldest lines are evicted beyond it
    pub max_lines: usize,

    /// Last known byte window of the remote file (all zero until the first
    /// successful fetch, and again after a rotation)
    pub range: ContentRange,

    /// Polling interval, owned by the UI
    pub refresh_rate: Duration,

    /// True while a fetch is in flight
    pub loading: bool,

    /// Message of the last hard failure, cleared by the next success
    pub errors: Option<String>,
}

impl Default for LogTailState {
    fn default() -> Self {
        Self::with_max_lines(DEFAULT_MAX_LINES)
    }
}

impl LogTailState {
    pub fn with_max_lines(max_lines: usize) -> Self {
        Self {
            logs: VecDeque::new(),
            max_lines,
            range: ContentRange::default(),
            refresh_rate: DEFAULT_REFRESH_RATE,
            loading: false,
            errors: None,
        }
    }

    /// Same state with a different polling interval
    pub fn refresh_rate(mut self, refresh_rate: Duration) -> Self {
        self.refresh_rate = refresh_rate;
        self
    }

    /// Whether a successful fetch has established the file length
    pub fn is_bootstrapped(&self) -> bool {
        self.range.length != 0
    }

    /// Range to request next: the tail of the file until bootstrapped,
    /// then everything after the last known end offset
    pub fn next_range(&self, tail_bytes: u64) -> ByteRange {
        if self.is_bootstrapped() {
            ByteRange::From(self.range.end)
        } else {
            ByteRange::Suffix(tail_bytes)
        }
    }

    /// Append lines, then evict from the front down to `max_lines`
    pub fn push_lines<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.logs.extend(lines);
        self.truncate_front();
    }

    pub(crate) fn truncate_front(&mut self) {
        let excess = self.logs.len().saturating_sub(self.max_lines);
        self.logs.drain(..excess);
    }
}

/// Split text into lines: maximal runs of characters other than `\r` and
/// `\n`. Empty lines are dropped.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
