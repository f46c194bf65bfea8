use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::dashboards::d400_lead_analytics::{MonthBucket, ReportRequest};

use crate::dashboards::d400_lead_analytics::service;

/// GET /api/d400/lead_activity
pub async fn get_lead_activity() -> Json<Vec<MonthBucket>> {
    let series = service::get_lead_activity().await;
    tracing::info!("D400 Dashboard: returning {} months", series.len());
    Json(series)
}

/// GET /api/d400/report?year=2024&month=3
pub async fn get_report(Query(request): Query<ReportRequest>) -> Response {
    match service::build_report(request).await {
        Ok((file_name, csv)) => {
            tracing::info!("D400 Dashboard: exporting {}", file_name);
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("D400 Dashboard: failed to build report: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
