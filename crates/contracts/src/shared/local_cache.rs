//! Port to the append-only local submission and tracking logs.
//!
//! The browser keeps both logs in `localStorage`; the server keeps a JSON file
//! with the same keys. Reads are tolerant: a missing or corrupt value reads
//! as an empty list.

use serde::de::DeserializeOwned;

use crate::domain::a001_lead::aggregate::RawLocalSubmission;
use crate::domain::a002_tracking_event::aggregate::TrackingEvent;

pub const FORM_SUBMISSIONS_KEY: &str = "formSubmissions";
pub const CONTACT_TRACKING_KEY: &str = "contactTracking";

pub trait LocalCachePort {
    fn read_submissions(&self) -> Vec<RawLocalSubmission>;
    fn read_tracking_events(&self) -> Vec<TrackingEvent>;
}

impl<C: LocalCachePort + ?Sized> LocalCachePort for &C {
    fn read_submissions(&self) -> Vec<RawLocalSubmission> {
        (**self).read_submissions()
    }

    fn read_tracking_events(&self) -> Vec<TrackingEvent> {
        (**self).read_tracking_events()
    }
}

/// Parse a stored JSON array, degrading to empty on any problem.
///
/// Items that fail to deserialize are dropped individually so one bad entry
/// does not hide the rest of the log.
pub fn parse_cache_array<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => {
            log::warn!("Local cache key '{}' does not hold an array, ignoring", key);
            return Vec::new();
        }
        Err(e) => {
            log::warn!("Local cache key '{}' is not valid JSON: {}", key, e);
            return Vec::new();
        }
    };

    let total = values.len();
    let items: Vec<T> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if items.len() < total {
        log::warn!(
            "Local cache key '{}': skipped {} malformed entries",
            key,
            total - items.len()
        );
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_invalid_read_as_empty() {
        assert!(parse_cache_array::<TrackingEvent>("k", None).is_empty());
        assert!(parse_cache_array::<TrackingEvent>("k", Some("")).is_empty());
        assert!(parse_cache_array::<TrackingEvent>("k", Some("{not json")).is_empty());
        assert!(parse_cache_array::<TrackingEvent>("k", Some("{\"a\":1}")).is_empty());
    }

    #[test]
    fn test_valid_array_parses() {
        let raw = r#"[{"timestamp":"2024-05-01T12:00:00Z","formType":"contact_form","formData":{"firstName":"Sara"}}]"#;
        let items: Vec<RawLocalSubmission> = parse_cache_array(FORM_SUBMISSIONS_KEY, Some(raw));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].form_type, "contact_form");
    }

    #[test]
    fn test_non_object_entries_are_dropped_individually() {
        let raw = r#"[{"method":"phone_call","timestamp":"2024-01-01T00:00:00Z"}, 42, {"method":"email_click"}]"#;
        let items: Vec<TrackingEvent> = parse_cache_array(CONTACT_TRACKING_KEY, Some(raw));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_wrong_typed_submission_fields_keep_the_entry() {
        let raw = r#"[
            {"timestamp": null, "formType": "contact_form", "formData": {"name": "A"}},
            {"timestamp": 1705312800000, "formType": "quote_request", "formData": {}},
            {"timestamp": "2024-01-15T10:00:00Z", "formType": null, "formData": {}},
            {"timestamp": "2024-01-15T10:00:00Z", "formType": "contact_form", "formData": "name=Ali"},
            {"timestamp": "bad", "formType": "contact_form", "formData": {"name": "Kept"}}
        ]"#;
        let items: Vec<RawLocalSubmission> = parse_cache_array(FORM_SUBMISSIONS_KEY, Some(raw));

        assert_eq!(items.len(), 5);
        assert_eq!(items[0].timestamp, "");
        assert_eq!(items[1].timestamp, "1705312800000");
        assert_eq!(items[2].form_type, "");
        assert!(items[3].form_data.is_empty());
        assert_eq!(items[4].form_data["name"], "Kept");
    }

    #[test]
    fn test_null_tracking_fields_keep_the_event() {
        let raw = r#"[{"method":"phone_call","timestamp":"2024-03-01T00:00:00Z","details":null,"userAgent":null,"url":null}]"#;
        let items: Vec<TrackingEvent> = parse_cache_array(CONTACT_TRACKING_KEY, Some(raw));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].method, "phone_call");
        assert!(items[0].details.is_empty());
        assert_eq!(items[0].user_agent, "");
        assert_eq!(items[0].url, "");
    }
}
