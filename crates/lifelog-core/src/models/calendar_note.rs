//! Calendar note model

use serde::{Deserialize, Serialize};

use super::{EntityKind, Syncable};

/// A free-form note pinned to a calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarNote {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub date: String,
    pub note: String,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl Syncable for CalendarNote {
    const KIND: EntityKind = EntityKind::CalendarNote;

    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("userId", "owner_id"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];

    const TIMESTAMP_FIELDS: &'static [&'static str] = &["created_at", "updated_at"];

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
