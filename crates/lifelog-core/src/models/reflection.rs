//! Daily reflection model

use serde::{Deserialize, Serialize};

use super::{EntityKind, Syncable};

/// End-of-day notes and habit counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    /// Glasses of water
    #[serde(default)]
    pub water_intake: i64,
    /// Study time in minutes
    #[serde(default)]
    pub study_minutes: i64,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub deleted_at: Option<i64>,
}

impl Syncable for Reflection {
    const KIND: EntityKind = EntityKind::Reflection;

    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("userId", "owner_id"),
        ("waterIntake", "water_intake"),
        ("studyMinutes", "study_minutes"),
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
