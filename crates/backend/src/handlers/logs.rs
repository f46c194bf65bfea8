use axum::{http::StatusCode, Json};
use contracts::shared::logger::{CreateLogRequest, LogEntry};

use crate::shared::data::db::get_connection;
use crate::shared::logger::repository;

/// GET /api/logs
pub async fn list_all() -> Result<Json<Vec<LogEntry>>, StatusCode> {
    let db = get_connection().map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
    match repository::get_all_logs(db).await {
        Ok(logs) => Ok(Json(logs)),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/logs
pub async fn create(Json(req): Json<CreateLogRequest>) -> StatusCode {
    let Ok(db) = get_connection() else {
        return StatusCode::SERVICE_UNAVAILABLE;
    };
    match repository::log_event(db, req.source, &req.category, &req.message).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// DELETE /api/logs
pub async fn clear_all() -> StatusCode {
    let Ok(db) = get_connection() else {
        return StatusCode::SERVICE_UNAVAILABLE;
    };
    match repository::clear_all_logs(db).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
