//! File-backed local submission and tracking logs.
//!
//! The file is a JSON object keyed like the browser's `localStorage`
//! (`formSubmissions`, `contactTracking`), each value an array.

use contracts::domain::a001_lead::aggregate::RawLocalSubmission;
use contracts::domain::a002_tracking_event::aggregate::TrackingEvent;
use contracts::shared::local_cache::{
    parse_cache_array, LocalCachePort, CONTACT_TRACKING_KEY, FORM_SUBMISSIONS_KEY,
};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Mutex;

static CACHE: OnceCell<JsonFileCache> = OnceCell::new();

pub struct JsonFileCache {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_object(&self) -> Map<String, Value> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                tracing::warn!("Local cache {} unreadable: {}", self.path.display(), e);
                return Map::new();
            }
        };
        if contents.trim().is_empty() {
            return Map::new();
        }
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!("Local cache {} is not a JSON object", self.path.display());
                Map::new()
            }
            Err(e) => {
                tracing::warn!("Local cache {} is corrupt: {}", self.path.display(), e);
                Map::new()
            }
        }
    }

    /// Raw JSON text stored under `key`
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.read_object().get(key).map(Value::to_string)
    }

    /// Append one entry to the array under `key`.
    ///
    /// A corrupt or non-array value under the key is replaced by a fresh array.
    pub fn append<T: Serialize>(&self, key: &str, item: &T) -> anyhow::Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("local cache lock poisoned"))?;

        let mut object = self.read_object();
        let value = serde_json::to_value(item)?;
        match object.get_mut(key) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                object.insert(key.to_string(), Value::Array(vec![value]));
            }
        }
        self.write_object(&object)
    }

    fn write_object(&self, object: &Map<String, Value>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(object)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl LocalCachePort for JsonFileCache {
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

pub fn initialize(path: PathBuf) -> anyhow::Result<()> {
    tracing::info!("Local cache file: {}", path.display());
    CACHE
        .set(JsonFileCache::new(path))
        .map_err(|_| anyhow::anyhow!("Local cache already initialized"))
}

pub fn get_cache() -> anyhow::Result<&'static JsonFileCache> {
    CACHE
        .get()
        .ok_or_else(|| anyhow::anyhow!("Local cache has not been initialized"))
}

/// Run a cache read on the blocking pool; a failed task reads as empty
pub async fn read_off_runtime<C, T, F>(cache: C, read: F) -> Vec<T>
where
    C: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&C) -> Vec<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || read(&cache)).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Local cache read task failed: {}", e);
            Vec::new()
        }
    }
}

/// Cache that reads as empty, for when no file is configured
pub struct EmptyCache;

impl LocalCachePort for EmptyCache {
    fn read_submissions(&self) -> Vec<RawLocalSubmission> {
        Vec::new()
    }

    fn read_tracking_events(&self) -> Vec<TrackingEvent> {
        Vec::new()
    }
}

#[cfg(test)]
pub fn temp_cache_path(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!(
        "leads-cache-{}-{}-{}.json",
        name,
        std::process::id(),
        nanos
    ))
}
