//! Entity models shared by the sync engine and the export service

mod calendar_note;
mod expense;
mod goal;
mod journal;
mod reflection;
mod task;

use std::fmt;

use serde::Serialize;

pub use calendar_note::CalendarNote;
pub use expense::Expense;
pub use goal::Goal;
pub use journal::Journal;
pub use reflection::Reflection;
pub use task::Task;

/// The six record categories that share the syncable record shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Expense,
    Journal,
    Reflection,
    Goal,
    CalendarNote,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Expense => "expense",
            Self::Journal => "journal",
            Self::Reflection => "reflection",
            Self::Goal => "goal",
            Self::CalendarNote => "calendar_note",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The generic record shape shared by all entity kinds.
///
/// `owner_id`, `created_at` and `updated_at` are optional on the way in
/// (clients may omit them) and always set on stored rows; the upsert
/// engine fills them before persisting.
pub trait Syncable: Sized {
    const KIND: EntityKind;

    /// Wire-name to canonical-name renames applied before deserialization
    const FIELD_ALIASES: &'static [(&'static str, &'static str)];

    /// Fields holding instants; string values are leniently parsed to Unix ms
    const TIMESTAMP_FIELDS: &'static [&'static str];

    fn id(&self) -> &str;
    fn owner_id(&self) -> Option<&str>;
    fn set_owner_id(&mut self, owner: &str);
    fn created_at(&self) -> Option<i64>;
    fn set_created_at(&mut self, at_ms: i64);
    fn updated_at(&self) -> Option<i64>;
    fn set_updated_at(&mut self, at_ms: i64);

    /// Status-like payload field watched for reward transitions
    fn state(&self) -> Option<&str> {
        None
    }
}
