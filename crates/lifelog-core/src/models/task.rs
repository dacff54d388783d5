//! Task model

use serde::{Deserialize, Serialize};

use super::{EntityKind, Syncable};

/// A dated to-do item with optional time tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Day the task belongs to (YYYY-MM-DD)
    pub date: String,
    pub title: String,
    /// "todo", "in-progress" or "done"
    pub status: String,
    /// Total time spent in minutes
    #[serde(default)]
    pub spent_time: i64,
    /// JSON array of time log entries, opaque to the server
    #[serde(default)]
    pub time_logs: Option<String>,
    /// Estimated time in minutes
    #[serde(default)]
    pub estimated_time: Option<i64>,
    #[serde(default)]
    pub is_useful: Option<bool>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub deleted_at: Option<i64>,
}

impl Syncable for Task {
    const KIND: EntityKind = EntityKind::Task;

    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("userId", "owner_id"),
        ("spentTime", "spent_time"),
        ("timeLogs", "time_logs"),
        ("estimatedTime", "estimated_time"),
        ("isUseful", "is_useful"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
        ("deletedAt", "deleted_at"),
    ];

    const TIMESTAMP_FIELDS: &'static [&'static str] = &["created_at", "updated_at", "deleted_at"];

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    fn set_owner_id(&mut self, owner: &str) {
        self.owner_id = Some(owner.to_string());
    }

    fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    fn set_created_at(&mut self, at_ms: i64) {
        self.created_at = Some(at_ms);
    }

    fn updated_at(&self) -> Option<i64> {
        self.updated_at
    }

    fn set_updated_at(&mut self, at_ms: i64) {
        self.updated_at = Some(at_ms);
    }

    fn state(&self) -> Option<&str> {
        Some(&self.status)
    }
}
