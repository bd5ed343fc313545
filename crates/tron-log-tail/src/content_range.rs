//! Content-Range header parsing
//!
//! Accepts `<start>-<end>/<length>` and `*/<length>`, each optionally
//! preceded by the `bytes` unit.

use crate::error::ContentRangeError;
use regex::Regex;
use std::sync::OnceLock;

/// Byte window `[start, end)` of a remote file of `length` bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentRange {
    pub start: u64,
    pub end: u64,
    pub length: u64,
}

impl ContentRange {
    /// Window collapsed onto the end of a file of `length` bytes
    pub fn caught_up(length: u64) -> Self {
        Self {
            start: length,
            end: length,
            length,
        }
    }
}

/// Parse a `Content-Range` response header
///
/// `*/<length>` is returned as [`ContentRange::caught_up`]. A header that
/// matches neither form, overflows, or describes a window outside the file
/// (`start > end` or `end > length`) is rejected.
pub fn parse_content_range_header(header: &str) -> Result<ContentRange, ContentRangeError> {
    static UNSATISFIED_REGEX: OnceLock<Regex> = OnceLock::new();
    static RANGE_REGEX: OnceLock<Regex> = OnceLock::new();

    let unsatisfied = UNSATISFIED_REGEX.get_or_init(|| {
        Regex::new(r"^\s*(?:bytes\s+)?\*/(\d+)\s*$").expect("static regex compiles")
    });
    let range = RANGE_REGEX.get_or_init(|| {
        Regex::new(r"^\s*(?:bytes\s+)?(\d+)-(\d+)/(\d+)\s*$").expect("static regex compiles")
    });

    let invalid = || ContentRangeError {
        header: header.to_string(),
    };

    if let Some(captures) = unsatisfied.captures(header) {
        let length = captures[1].parse::<u64>().map_err(|_| invalid())?;
        return Ok(ContentRange::caught_up(length));
    }

    let captures = range.captures(header).ok_or_else(invalid)?;
    let mut tokens = [0u64; 3];
    for (slot, token) in tokens.iter_mut().zip(captures.iter().skip(1).flatten()) {
        *slot = token.as_str().parse().map_err(|_| invalid())?;
    }
    let [start, end, length] = tokens;

    if start > end || end > length {
        return Err(invalid());
    }

    Ok(ContentRange { start, end, length })
}
