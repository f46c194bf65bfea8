//! Lenient timestamp parsing for submission logs
//!
//! Browser logs store `new Date().toISOString()`, the database stores RFC 3339,
//! and older rows sometimes carry a bare date. Anything else is rejected.
//! Date-times without an offset are local time; a bare date is UTC midnight,
//! the same reading `Date.parse` gives them.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Parse an ISO-like timestamp into UTC
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    parse_timestamp_in(s, &Local)
}

/// Same as [`parse_timestamp`], reading offset-less date-times in `tz`
pub fn parse_timestamp_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            // A skipped local hour (DST gap) has no reading.
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Current time in the same shape the browser writes
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-01-15T10:00:00Z").unwrap();
        assert_eq!(dt.timestamp_millis(), 1_705_312_800_000);

        let with_offset = parse_timestamp("2024-01-15T12:00:00+02:00").unwrap();
        assert_eq!(with_offset, dt);
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert!(parse_timestamp("2024-01-15T10:00:00.123").is_some());
        assert!(parse_timestamp("2024-01-15 10:00:00").is_some());
        let midnight = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_naive_date_time_is_local() {
        let cairo = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = parse_timestamp_in("2024-01-15T12:00:00", &cairo).unwrap();
        assert_eq!(dt.timestamp_millis(), 1_705_312_800_000);

        // Bare dates and explicit offsets ignore the zone
        let midnight = parse_timestamp_in("2024-01-15", &cairo).unwrap();
        assert_eq!(midnight.to_rfc3339(), "2024-01-15T00:00:00+00:00");
        let utc = parse_timestamp_in("2024-01-15T10:00:00Z", &cairo).unwrap();
        assert_eq!(utc, dt);

        let naive = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        let expected = Local.from_local_datetime(&naive).earliest().unwrap();
        assert_eq!(parse_timestamp("2024-01-15T10:00:00"), Some(expected.with_timezone(&Utc)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[test]
    fn test_now_iso_round_trips() {
        assert!(parse_timestamp(&now_iso()).is_some());
    }
}
