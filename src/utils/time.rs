use chrono::DateTime;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn get_unix_timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// `YYYY-MM-DD` (UTC) for a unix timestamp in milliseconds. Out of range stamps
/// format as the epoch.
pub fn format_date(millis: u128) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string()
}
