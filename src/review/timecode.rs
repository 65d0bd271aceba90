//! Human-readable playback positions and comment ages

use chrono::{DateTime, Utc};

/// Format seconds as `MM:SS` (minutes are not wrapped into hours)
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            seconds.floor() as u64
        }
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Relative age shown next to a comment
pub fn time_ago(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - created).num_hours();
    if hours < 1 {
        return "Just now".to_string();
    }
    if hours < 24 {
        return format!("{hours}h");
    }
    let days = hours / 24;
    if days == 1 {
        return "1d".to_string();
    }
    if days < 7 {
        return format!("{days}d");
    }
    created.format("%Y-%m-%d").to_string()
}

/// Parse an RFC 3339 creation stamp, as written by [`crate::clock::iso_now`]
pub fn parse_iso(stamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(stamp)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(9.99), "00:09");
        assert_eq!(format_time(61.5), "01:01");
        assert_eq!(format_time(596.47), "09:56");
        assert_eq!(format_time(3725.0), "62:05");
        assert_eq!(format_time(-4.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = parse_iso("2025-06-10T12:00:00Z").unwrap();
        assert_eq!(time_ago(now - Duration::minutes(59), now), "Just now");
        assert_eq!(time_ago(now - Duration::hours(5), now), "5h");
        assert_eq!(time_ago(now - Duration::hours(30), now), "1d");
        assert_eq!(time_ago(now - Duration::days(3), now), "3d");
        assert_eq!(time_ago(now - Duration::days(10), now), "2025-05-31");
    }

    #[test]
    fn test_parse_iso_rejects_garbage() {
        assert!(parse_iso("yesterday").is_none());
    }
}
