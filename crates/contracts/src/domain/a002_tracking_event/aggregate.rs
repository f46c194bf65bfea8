use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::a001_lead::resolver::first_present;
use crate::shared::lenient::{any_object, any_string};

/// Logged visitor interaction (phone click, WhatsApp, email click, CTA)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    #[serde(default, deserialize_with = "any_string")]
    pub method: String,
    #[serde(default, deserialize_with = "any_string")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "any_object")]
    pub details: Map<String, Value>,
    #[serde(default, deserialize_with = "any_string")]
    pub user_agent: String,
    #[serde(default, deserialize_with = "any_string")]
    pub url: String,
}

pub const DIRECT_SOURCE: &str = "Direct";

impl TrackingEvent {
    /// Traffic source: explicit `source`, then `utm_source`, then referrer host
    pub fn traffic_source(&self) -> String {
        first_present(&self.details, &["source", "utm_source"])
            .or_else(|| {
                first_present(&self.details, &["referrer"]).and_then(|r| referrer_host(&r))
            })
            .unwrap_or_else(|| DIRECT_SOURCE.to_string())
    }
}

fn referrer_host(referrer: &str) -> Option<String> {
    let rest = referrer
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(referrer);
    let host = rest.split(['/', '?', '#']).next()?.trim();
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

/// Body of `POST /api/tracking`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEventDto {
    pub method: String,
    #[serde(default)]
    pub details: Map<String, Value>,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(details: Value) -> TrackingEvent {
        TrackingEvent {
            method: "phone_call".into(),
            details: details.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn test_traffic_source_precedence() {
        assert_eq!(
            event(json!({"source": "instagram", "utm_source": "google"})).traffic_source(),
            "instagram"
        );
        assert_eq!(event(json!({"utm_source": "google"})).traffic_source(), "google");
        assert_eq!(
            event(json!({"referrer": "https://www.Facebook.com/some/page?x=1"})).traffic_source(),
            "facebook.com"
        );
        assert_eq!(event(json!({})).traffic_source(), "Direct");
        assert_eq!(event(json!({"referrer": ""})).traffic_source(), "Direct");
    }

    #[test]
    fn test_deserializes_browser_shape() {
        let e: TrackingEvent = serde_json::from_value(json!({
            "method": "whatsapp",
            "timestamp": "2024-03-01T00:00:00Z",
            "userAgent": "Mozilla/5.0",
        }))
        .unwrap();
        assert_eq!(e.user_agent, "Mozilla/5.0");
        assert!(e.details.is_empty());
        assert_eq!(e.url, "");
    }
}
