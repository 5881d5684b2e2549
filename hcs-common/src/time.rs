//! Clock and time helpers

use chrono::{DateTime, Local, Timelike, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a time of day for the status bar: 12-hour clock, zero-padded
/// minutes, AM/PM suffix (`9:05 PM`, `12:00 AM`).
pub fn format_status_clock<T: Timelike>(time: &T) -> String {
    let (is_pm, hour12) = time.hour12();
    let suffix = if is_pm { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour12, time.minute(), suffix)
}

/// Status bar clock string for the current local time
pub fn local_status_clock() -> String {
    format_status_clock(&Local::now())
}
