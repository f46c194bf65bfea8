use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_lead::aggregate::{
    FormSubmissionDto, Lead, LeadStatus, LeadStatusUpdateDto, LeadsResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;

use crate::domain::a001_lead::service::{self, LeadError};

#[derive(Debug, Deserialize)]
pub struct LeadsQuery {
    pub q: Option<String>,
}

/// GET /api/leads?q=
pub async fn list(Query(query): Query<LeadsQuery>) -> Json<LeadsResponse> {
    let response = service::list(query.q.as_deref()).await;
    tracing::info!(
        "Leads: returning {} leads{}",
        response.leads.len(),
        if response.notice.is_some() { " (degraded)" } else { "" }
    );
    Json(response)
}

/// GET /api/leads/buckets
pub async fn buckets() -> Json<BTreeMap<LeadStatus, Vec<Lead>>> {
    Json(service::buckets().await)
}

/// PUT /api/leads/:id/status
pub async fn update_status(
    Path(id): Path<i64>,
    Json(dto): Json<LeadStatusUpdateDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match service::update_status(id, &dto.status).await {
        Ok(status) => Ok(Json(json!({"id": id, "status": status}))),
        Err(LeadError::InvalidStatus(s)) => {
            tracing::warn!("Leads: rejected status '{}' for lead {}", s, id);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(LeadError::NotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Leads: failed to update lead {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/form_submissions
pub async fn create_submission(
    Json(dto): Json<FormSubmissionDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match service::record_submission(dto).await {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(e) => {
            tracing::error!("Leads: failed to record submission: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
