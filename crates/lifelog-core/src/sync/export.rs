//! State export service
//!
//! Read-only: returns the caller's full current state across all
//! entity kinds. No normalization or conflict logic applies.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{list_owned, RecordStore};
use crate::error::{Error, Result};
use crate::models::{CalendarNote, Expense, Goal, Journal, Reflection, Task};

/// Everything the caller owns, grouped by entity kind
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FullState {
    pub tasks: Vec<Task>,
    pub expenses: Vec<Expense>,
    pub journals: Vec<Journal>,
    pub reflections: Vec<Reflection>,
    pub goals: Vec<Goal>,
    pub calendar_notes: Vec<CalendarNote>,
}

impl FullState {
    pub fn total_records(&self) -> usize {
        self.tasks.len()
            + self.expenses.len()
            + self.journals.len()
            + self.reflections.len()
            + self.goals.len()
            + self.calendar_notes.len()
    }
}

/// Export the caller's full state.
///
/// Each kind is fetched independently; a kind whose storage is in a
/// degraded schema state (missing table or column, e.g. mid-migration)
/// degrades to an empty set instead of failing the whole export.
pub fn export(conn: &Connection, caller: &str) -> Result<FullState> {
    Ok(FullState {
        tasks: fetch_kind(conn, caller)?,
        expenses: fetch_kind(conn, caller)?,
        journals: fetch_kind(conn, caller)?,
        reflections: fetch_kind(conn, caller)?,
        goals: fetch_kind(conn, caller)?,
        calendar_notes: fetch_kind(conn, caller)?,
    })
}

fn fetch_kind<T: RecordStore>(conn: &Connection, caller: &str) -> Result<Vec<T>> {
    match list_owned(conn, caller) {
        Ok(records) => Ok(records),
        Err(Error::Database(e)) if is_schema_drift(&e) => {
            tracing::warn!(kind = %T::KIND, error = %e, "Export degraded to empty set for kind");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

fn is_schema_drift(error: &rusqlite::Error) -> bool {
    let message = error.to_string().to_lowercase();
    message.contains("no such table") || message.contains("no such column")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    fn seed_task(db: &Database, id: &str, owner: &str) {
        let task = Task {
            id: id.to_string(),
            owner_id: Some(owner.to_string()),
            date: "2026-01-15".to_string(),
            title: "Draft".to_string(),
            status: "todo".to_string(),
            spent_time: 0,
            time_logs: None,
            estimated_time: None,
            is_useful: None,
            created_at: Some(1_000),
            updated_at: Some(1_000),
            deleted_at: None,
        };
        task.insert(db.connection()).unwrap();
    }

    #[test]
    fn test_export_is_owner_scoped() {
        let db = Database::open_in_memory().unwrap();
        seed_task(&db, "t1", "user-a");
        seed_task(&db, "t2", "user-b");

        let state = export(db.connection(), "user-a").unwrap();
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.tasks[0].id, "t1");
        assert_eq!(state.total_records(), 1);
    }

    #[test]
    fn test_export_empty_state() {
        let db = Database::open_in_memory().unwrap();
        let state = export(db.connection(), "user-a").unwrap();
        assert_eq!(state.total_records(), 0);
    }

    #[test]
    fn test_missing_table_degrades_that_kind_only() {
        let db = Database::open_in_memory().unwrap();
        seed_task(&db, "t1", "user-a");
        db.connection().execute_batch("DROP TABLE goals").unwrap();

        let state = export(db.connection(), "user-a").unwrap();
        assert_eq!(state.tasks.len(), 1);
        assert!(state.goals.is_empty());
    }

    #[test]
    fn test_missing_column_degrades_that_kind_only() {
        let db = Database::open_in_memory().unwrap();
        seed_task(&db, "t1", "user-a");
        db.connection()
            .execute_batch("ALTER TABLE reflections DROP COLUMN study_minutes")
            .unwrap();

        let state = export(db.connection(), "user-a").unwrap();
        assert_eq!(state.tasks.len(), 1);
        assert!(state.reflections.is_empty());
    }
}
