//! Daily journal model

use serde::{Deserialize, Serialize};

use super::{EntityKind, Syncable};

/// A per-day journal linking the day's tasks and expenses.
///
/// `sleep_id`/`mood_id` reference records owned by other subsystems;
/// the sync engine treats them as opaque payload (no cross-kind
/// referential integrity is enforced here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub date: String,
    /// IDs of tasks recorded for the day
    #[serde(default)]
    pub tasks: Vec<String>,
    /// IDs of expenses recorded for the day
    #[serde(default)]
    pub expenses: Vec<String>,
    #[serde(default)]
    pub sleep_id: Option<String>,
    #[serde(default)]
    pub mood_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub deleted_at: Option<i64>,
}

impl Syncable for Journal {
    const KIND: EntityKind = EntityKind::Journal;

    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("userId", "owner_id"),
        ("sleepId", "sleep_id"),
        ("moodId", "mood_id"),
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
}
