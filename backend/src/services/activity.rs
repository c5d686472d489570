//! In-memory activity log with a fixed capacity

use std::collections::VecDeque;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::models::ActivityLogEntry;

/// Activity entry submitted by a client
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordActivityInput {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 100, message = "Action must be 1-100 characters"))]
    pub action: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Details must be at most 500 characters"))]
    pub details: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Target must be at most 500 characters"))]
    pub target: String,
}

/// Bounded activity log; the oldest entry is evicted once full
pub struct ActivityLog {
    entries: RwLock<VecDeque<ActivityLogEntry>>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Validate and append an entry
    pub async fn record(&self, input: RecordActivityInput) -> AppResult<ActivityLogEntry> {
        input.validate()?;

        let entry = ActivityLogEntry {
            id: Uuid::new_v4(),
            username: input.username,
            action: input.action,
            details: input.details,
            target: input.target,
            timestamp: Utc::now(),
        };

        let mut entries = self.entries.write().await;
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry.clone());

        tracing::debug!(action = %entry.action, username = %entry.username, "Recorded activity");
        Ok(entry)
    }

    /// All entries, newest first
    pub async fn list(&self) -> Vec<ActivityLogEntry> {
        self.entries.read().await.iter().rev().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
