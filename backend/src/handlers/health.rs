//! Service health handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub database: &'static str,
}

/// Report liveness and database reachability
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "disconnected"
        }
    };

    Json(HealthResponse {
        status: "healthy",
        service: "rice-production-forecasting",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database,
    })
}
