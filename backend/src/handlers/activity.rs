//! Activity log HTTP handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::ActivityLogEntry;
use crate::services::activity::RecordActivityInput;
use crate::AppState;

#[derive(Serialize)]
pub struct ActivityLogList {
    pub logs: Vec<ActivityLogEntry>,
    pub total: usize,
    pub capacity: usize,
}

/// List logged activities, newest first
pub async fn list_activity_logs(State(state): State<AppState>) -> Json<ActivityLogList> {
    let logs = state.activity_log.list().await;
    Json(ActivityLogList {
        total: logs.len(),
        capacity: state.activity_log.capacity(),
        logs,
    })
}

/// Record a user activity
pub async fn record_activity(
    State(state): State<AppState>,
    Json(input): Json<RecordActivityInput>,
) -> AppResult<(StatusCode, Json<ActivityLogEntry>)> {
    let entry = state.activity_log.record(input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
