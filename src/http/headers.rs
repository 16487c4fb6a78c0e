//! Rate-limit header parsing
//!
//! The API reports quota through `x-ratelimit-remaining` and
//! `x-ratelimit-reset`, and hints 429 backoff through `retry-after`.
//! All inbound header reads go through [`header_str`], which keeps the
//! lookups case-insensitive regardless of what casing the server uses.
//!
//! `x-ratelimit-reset` is interpreted as an absolute Unix epoch in
//! seconds everywhere in this crate; waits derived from it are computed
//! against the current clock and clamped.

use reqwest::header::HeaderMap;
use std::time::Duration;

/// Default backoff when a 429 carries no usable hint
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_millis(1000);

/// Longest wait ever derived from a reset epoch
pub const MAX_RESET_WAIT_SECS: i64 = 60;

/// Remaining-quota level at or below which the collector throttles itself
pub const LOW_QUOTA_THRESHOLD: u64 = 5;

/// Safety margin added when waiting out a quota window
const RESET_MARGIN_SECS: i64 = 1;

/// Case-insensitive header accessor. `HeaderMap` lookups are already
/// case-insensitive; routing every read through here keeps that a
/// guarantee of this module rather than an accident of the client crate.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    header_str(headers, name).and_then(|s| s.trim().parse().ok())
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    header_str(headers, name).and_then(|s| s.trim().parse().ok())
}

/// Per-response rate-limit signal, derived from headers and discarded
/// once the response has been handled.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitInfo {
    /// Requests left in the current quota window
    pub remaining: Option<u64>,
    /// Unix epoch (seconds) at which the window resets
    pub reset_epoch: Option<i64>,
    /// Server-hinted backoff in seconds (429 responses)
    pub retry_after: Option<u64>,
}

impl RateLimitInfo {
    /// Parse the signal out of a response's headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            remaining: header_u64(headers, "x-ratelimit-remaining"),
            reset_epoch: header_i64(headers, "x-ratelimit-reset"),
            retry_after: header_u64(headers, "retry-after"),
        }
    }

    /// Backoff for a 429 response: `retry-after` seconds if present,
    /// else the wait until the reset epoch (clamped to
    /// [`MAX_RESET_WAIT_SECS`]), else [`DEFAULT_RETRY_WAIT`].
    pub fn retry_wait(&self, now_epoch: i64) -> Duration {
        if let Some(secs) = self.retry_after {
            return Duration::from_secs(secs);
        }
        if let Some(reset) = self.reset_epoch {
            let secs = (reset - now_epoch).clamp(0, MAX_RESET_WAIT_SECS);
            return Duration::from_secs(secs as u64);
        }
        DEFAULT_RETRY_WAIT
    }

    /// Proactive throttle before the next page: when the remaining quota
    /// is at or below [`LOW_QUOTA_THRESHOLD`], wait out the window (reset
    /// epoch plus a one-second margin, clamped to
    /// [`MAX_RESET_WAIT_SECS`]). `None` means no throttle is needed.
    pub fn throttle_wait(&self, now_epoch: i64) -> Option<Duration> {
        let remaining = self.remaining?;
        if remaining > LOW_QUOTA_THRESHOLD {
            return None;
        }
        let until_reset = self.reset_epoch.map_or(0, |reset| reset - now_epoch);
        let secs = (until_reset + RESET_MARGIN_SECS).clamp(0, MAX_RESET_WAIT_SECS);
        Some(Duration::from_secs(secs as u64))
    }
}
