//! Time utilities with a clock abstraction for testability.
//!
//! Timestamps travel as Unix epoch milliseconds and are rendered in JST.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Source of "now" for participants and messages.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds.
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_jst_timestamp()
    }
}

/// Clock frozen at a given instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

fn to_jst_datetime(timestamp_millis: i64) -> Option<DateTime<FixedOffset>> {
    jst().timestamp_millis_opt(timestamp_millis).single()
}

/// Current Unix timestamp in milliseconds, observed in JST.
pub fn get_jst_timestamp() -> i64 {
    Utc::now().with_timezone(&jst()).timestamp_millis()
}

/// Render a timestamp as RFC 3339 in JST, e.g. `2024-01-01T09:00:00+09:00`.
///
/// Out-of-range timestamps render as an empty string.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    to_jst_datetime(timestamp_millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

/// Render a timestamp as a short `HH:MM` wall-clock time in JST.
pub fn timestamp_to_jst_hm(timestamp_millis: i64) -> String {
    to_jst_datetime(timestamp_millis)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}
