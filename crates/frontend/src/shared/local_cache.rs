//! `localStorage` side of the local submission and tracking logs
use contracts::domain::a001_lead::aggregate::RawLocalSubmission;
use contracts::domain::a002_tracking_event::aggregate::TrackingEvent;
use contracts::shared::local_cache::{
    parse_cache_array, LocalCachePort, CONTACT_TRACKING_KEY, FORM_SUBMISSIONS_KEY,
};
use serde::Serialize;
use web_sys::{window, Storage};

fn storage() -> Option<Storage> {
    window().and_then(|w| w.local_storage().ok().flatten())
}

/// Browser local storage; reads as empty when storage is unavailable
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLocalCache;

impl BrowserLocalCache {
    fn get_item(&self, key: &str) -> Option<String> {
        storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    /// Append one entry to the array stored under `key`
    pub fn append<T: Serialize>(&self, key: &str, item: &T) -> Result<(), String> {
        let storage = storage().ok_or("localStorage is not available")?;
        let mut items: Vec<serde_json::Value> =
            parse_cache_array(key, self.get_item(key).as_deref());
        items.push(serde_json::to_value(item).map_err(|e| e.to_string())?);
        let text = serde_json::to_string(&items).map_err(|e| e.to_string())?;
        storage
            .set_item(key, &text)
            .map_err(|e| format!("Failed to write '{}': {:?}", key, e))
    }

    pub fn append_submission(&self, entry: &RawLocalSubmission) -> Result<(), String> {
        self.append(FORM_SUBMISSIONS_KEY, entry)
    }

    pub fn append_tracking_event(&self, event: &TrackingEvent) -> Result<(), String> {
        self.append(CONTACT_TRACKING_KEY, event)
    }
}

impl LocalCachePort for BrowserLocalCache {
    fn read_submissions(&self) -> Vec<RawLocalSubmission> {
        parse_cache_array(
            FORM_SUBMISSIONS_KEY,
            self.get_item(FORM_SUBMISSIONS_KEY).as_deref(),
        )
    }

    fn read_tracking_events(&self) -> Vec<TrackingEvent> {
        parse_cache_array(
            CONTACT_TRACKING_KEY,
            self.get_item(CONTACT_TRACKING_KEY).as_deref(),
        )
    }
}
