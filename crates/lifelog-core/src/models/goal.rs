//! Goal model

use serde::{Deserialize, Serialize};

use super::{EntityKind, Syncable};

/// A periodic goal with progress tracking.
///
/// Goals have no soft-delete marker; `completed_at` records when the
/// goal reached a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// "yearly", "quarterly", "monthly" or "weekly"
    pub goal_type: String,
    pub year: i32,
    /// 1-4 for quarterly goals
    #[serde(default)]
    pub quarter: Option<i32>,
    /// 1-12 for monthly goals
    #[serde(default)]
    pub month: Option<i32>,
    /// ISO week number for weekly goals
    #[serde(default)]
    pub week: Option<i32>,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    /// Unit of measurement
    pub unit: String,
    /// IDs of tasks contributing to this goal
    #[serde(default)]
    pub linked_task_ids: Vec<String>,
    /// "active", "completed", "failed" or "paused"
    #[serde(default = "default_goal_status")]
    pub status: String,
    /// "manual" or "task-linked"
    #[serde(default = "default_progress_type")]
    pub progress_type: String,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub completed_at: Option<i64>,
}

fn default_goal_status() -> String {
    "active".to_string()
}

fn default_progress_type() -> String {
    "manual".to_string()
}

impl Syncable for Goal {
    const KIND: EntityKind = EntityKind::Goal;

    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("userId", "owner_id"),
        ("type", "goal_type"),
        ("targetValue", "target_value"),
        ("currentValue", "current_value"),
        ("linkedTaskIds", "linked_task_ids"),
        ("progressType", "progress_type"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
        ("completedAt", "completed_at"),
    ];

    const TIMESTAMP_FIELDS: &'static [&'static str] = &["created_at", "updated_at", "completed_at"];

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
