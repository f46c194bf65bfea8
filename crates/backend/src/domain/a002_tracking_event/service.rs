use contracts::domain::a002_tracking_event::aggregate::{TrackingEvent, TrackingEventDto};
use contracts::shared::local_cache::CONTACT_TRACKING_KEY;
use contracts::shared::logger::CATEGORY_TRACKING;
use contracts::shared::timestamp::now_iso;

use crate::shared::local_cache::{get_cache, JsonFileCache};
use crate::shared::logger;

/// Append a visitor interaction to the contact tracking log
pub fn record_on(cache: &JsonFileCache, dto: TrackingEventDto) -> anyhow::Result<TrackingEvent> {
    let method = dto.method.trim();
    if method.is_empty() {
        anyhow::bail!("Tracking event method is required");
    }

    let event = TrackingEvent {
        method: method.to_string(),
        timestamp: now_iso(),
        details: dto.details,
        user_agent: dto.user_agent,
        url: dto.url,
    };
    cache.append(CONTACT_TRACKING_KEY, &event)?;
    tracing::debug!("Tracked {} on {}", event.method, event.url);
    Ok(event)
}

/// Record on the process-wide cache; the file write runs on the blocking pool
pub async fn record(dto: TrackingEventDto) -> anyhow::Result<TrackingEvent> {
    let cache = get_cache()?;
    let event = tokio::task::spawn_blocking(move || record_on(cache, dto)).await??;
    logger::log(CATEGORY_TRACKING, &format!("{} contact", event.method));
    Ok(event)
}
