//! Time utility functions

use chrono::{DateTime, Duration, Utc};

/// Get current timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format timestamp as RFC3339
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}

/// Window length from a seconds setting
pub fn window_secs(secs: u64) -> Duration {
    Duration::seconds(secs.min(i64::MAX as u64) as i64)
}

/// True when `last` is unset or more than `window` before `now`
pub fn is_stale(last: Option<DateTime<Utc>>, now: DateTime<Utc>, window: Duration) -> bool {
    match last {
        Some(last) => now.signed_duration_since(last) > window,
        None => true,
    }
}
