//! Formatting of times and durations for display

use chrono::{DateTime, Local, Utc};

use crate::client::models::TimeEntry;

/// `H:MM:SS`, the way Toggl shows tracked time.
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "-".to_string();
    }
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Same as [`format_duration`] for the millisecond totals of the Reports API.
pub fn format_millis(millis: i64) -> String {
    format_duration(millis / 1000)
}

/// Local wall-clock time, or `-` when absent.
pub fn format_local(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Seconds tracked so far; running entries count up to `now`.
pub fn elapsed_seconds(entry: &TimeEntry, now: DateTime<Utc>) -> i64 {
    match (entry.is_running(), entry.start) {
        (true, Some(start)) => (now - start).num_seconds().max(0),
        (true, None) => 0,
        (false, _) => entry.duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00:00");
        assert_eq!(format_duration(59), "0:00:59");
        assert_eq!(format_duration(3661), "1:01:01");
        assert_eq!(format_duration(36000), "10:00:00");
        assert_eq!(format_duration(-1), "-");
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(5_400_000), "1:30:00");
    }

    #[test]
    fn test_format_local_absent() {
        assert_eq!(format_local(None), "-");
    }

    #[test]
    fn test_elapsed_running_and_stopped() {
        let now = Utc::now();
        let running = TimeEntry {
            start: Some(now - Duration::seconds(90)),
            duration: -1,
            ..TimeEntry::default()
        };
        assert_eq!(elapsed_seconds(&running, now), 90);

        let stopped = TimeEntry {
            start: Some(now - Duration::hours(2)),
            stop: Some(now - Duration::hours(1)),
            duration: 3600,
            ..TimeEntry::default()
        };
        assert_eq!(elapsed_seconds(&stopped, now), 3600);
    }
}
