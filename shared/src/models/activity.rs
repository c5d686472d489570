//! User activity log models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single logged user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: Uuid,
    pub username: String,
    pub action: String,
    pub details: String,
    pub target: String,
    pub timestamp: DateTime<Utc>,
}
