use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // LEADS
        // ========================================
        .route("/api/leads", get(handlers::a001_lead::list))
        .route("/api/leads/buckets", get(handlers::a001_lead::buckets))
        .route(
            "/api/leads/:id/status",
            put(handlers::a001_lead::update_status),
        )
        .route(
            "/api/form_submissions",
            post(handlers::a001_lead::create_submission),
        )
        // Трекинг контактов
        .route("/api/tracking", post(handlers::a002_tracking_event::create))
        // ========================================
        // D400 LEAD ANALYTICS
        // ========================================
        .route(
            "/api/d400/lead_activity",
            get(handlers::d400_lead_analytics::get_lead_activity),
        )
        .route(
            "/api/d400/report",
            get(handlers::d400_lead_analytics::get_report),
        )
        // ========================================
        // UTILITIES
        // ========================================
        .route(
            "/api/logs",
            get(handlers::logs::list_all)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all),
        )
}
