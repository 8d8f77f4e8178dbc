//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use crate::utils::errors::{EwmError, Result};

/// Wire format shared with the stats service
pub const STATS_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const EVENT_URI_PREFIX: &str = "/events/";

/// Format a timestamp the way the stats service expects it
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(STATS_TIMESTAMP_FORMAT).to_string()
}

/// Parse a `yyyy-MM-dd HH:mm:ss` timestamp as UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value, STATS_TIMESTAMP_FORMAT)
        .map_err(|e| EwmError::Validation(format!("Invalid timestamp '{}': {}", value, e)))?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Resource identifier of an event as recorded by the stats service
pub fn event_uri(event_id: i64) -> String {
    format!("{}{}", EVENT_URI_PREFIX, event_id)
}

/// Inverse of [`event_uri`]; anything else is ignored
pub fn parse_event_uri(uri: &str) -> Option<i64> {
    uri.strip_prefix(EVENT_URI_PREFIX)?.parse().ok()
}

/// Reject event dates closer to `now` than the required lead time
pub fn ensure_lead_time(event_date: DateTime<Utc>, now: DateTime<Utc>, lead_hours: i64) -> Result<()> {
    let earliest = now + Duration::hours(lead_hours);
    if event_date < earliest {
        return Err(EwmError::Validation(format!(
            "Field: eventDate. Error: must be at least {} hour(s) in the future. Value: {}",
            lead_hours,
            format_timestamp(event_date)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip() {
        let parsed = parse_timestamp("2024-03-01 18:30:00").unwrap();
        assert_eq!(format_timestamp(parsed), "2024-03-01 18:30:00");
        assert!(parse_timestamp("2024-03-01T18:30:00").is_err());
    }

    #[test]
    fn test_event_uri() {
        assert_eq!(event_uri(17), "/events/17");
        assert_eq!(parse_event_uri("/events/17"), Some(17));
        assert_eq!(parse_event_uri("/events"), None);
        assert_eq!(parse_event_uri("/categories/17"), None);
        assert_eq!(parse_event_uri("/events/abc"), None);
    }

    #[test]
    fn test_lead_time() {
        let now = Utc::now();
        assert!(ensure_lead_time(now + Duration::hours(3), now, 2).is_ok());
        assert!(ensure_lead_time(now + Duration::hours(2), now, 2).is_ok());
        assert!(ensure_lead_time(now + Duration::minutes(119), now, 2).is_err());
        assert!(ensure_lead_time(now - Duration::hours(1), now, 1).is_err());
    }
}
