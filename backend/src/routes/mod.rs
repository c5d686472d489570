//! Route definitions for the Rice Production Management System

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/forecast", forecast_routes())
        .route(
            "/activity-logs",
            get(handlers::list_activity_logs).post(handlers::record_activity),
        )
}

/// Forecasting routes (read-only)
fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/sarima", get(handlers::get_forecast))
        .route("/current-summary", get(handlers::get_current_summary))
        .route("/validate", get(handlers::validate_forecast))
        .route("/data-quality", get(handlers::get_data_quality))
}
