//! Wall-clock helpers.
//!
//! The scheduler itself runs on a simulated minute counter advanced by the
//! tick; wall-clock time is only used for log/record timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
