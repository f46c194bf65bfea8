use axum::{http::StatusCode, Json};
use contracts::domain::a002_tracking_event::aggregate::{TrackingEvent, TrackingEventDto};

use crate::domain::a002_tracking_event::service;

/// POST /api/tracking
pub async fn create(
    Json(dto): Json<TrackingEventDto>,
) -> Result<Json<TrackingEvent>, StatusCode> {
    if dto.method.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    match service::record(dto).await {
        Ok(event) => Ok(Json(event)),
        Err(e) => {
            tracing::error!("Tracking: failed to record event: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
