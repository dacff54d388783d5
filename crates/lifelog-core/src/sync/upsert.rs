//! Entity upsert engine
//!
//! Runs the full lookup -> resolve -> persist sequence for a single
//! canonical record of one kind.

use chrono::Utc;
use rusqlite::Connection;

use crate::db::{find_owned, owner_of, RecordStore};
use crate::error::{Error, Result};
use crate::rewards::RewardHooks;
use crate::sync::resolve::{resolve, Resolution};

/// Per-record result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    ConflictKept,
}

/// Upsert one record on behalf of `caller`.
///
/// An existing row owned by the caller goes through conflict
/// resolution; an applied write overwrites every payload field except
/// `id`, `owner_id` and `created_at` and stamps `updated_at` with the
/// write time, so the stored instant never regresses. A row with the
/// same id under a different owner fails with
/// [`Error::OwnershipViolation`] before anything is written.
pub fn upsert<T: RecordStore>(
    conn: &Connection,
    mut record: T,
    caller: &str,
    hooks: &dyn RewardHooks,
) -> Result<Outcome> {
    let now_ms = Utc::now().timestamp_millis();

    if let Some(existing) = find_owned::<T>(conn, record.id(), caller)? {
        match resolve(record.updated_at(), existing.updated_at()) {
            Resolution::KeepServer => return Ok(Outcome::ConflictKept),
            Resolution::Apply => {}
        }

        let previous_state = existing.state().map(str::to_string);
        record.set_owner_id(caller);
        record.set_updated_at(now_ms);
        record.update_payload(conn)?;

        if let (Some(from), Some(to)) = (previous_state.as_deref(), record.state()) {
            if from != to {
                hooks.on_transition(caller, T::KIND, from, to);
            }
        }
        return Ok(Outcome::Updated);
    }

    // Guard against id collisions with another owner's record
    if owner_of::<T>(conn, record.id())?.is_some() {
        return Err(Error::OwnershipViolation {
            kind: T::KIND,
            id: record.id().to_string(),
        });
    }

    record.set_owner_id(caller);
    if record.created_at().is_none() {
        record.set_created_at(now_ms);
    }
    record.set_updated_at(now_ms);
    record.insert(conn)?;
    hooks.on_created(caller, T::KIND);
    Ok(Outcome::Created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{EntityKind, Syncable, Task};
    use crate::rewards::NoRewards;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn task(id: &str, title: &str, updated_at: Option<i64>) -> Task {
        Task {
            id: id.to_string(),
            owner_id: None,
            date: "2026-01-15".to_string(),
            title: title.to_string(),
            status: "todo".to_string(),
            spent_time: 0,
            time_logs: None,
            estimated_time: None,
            is_useful: None,
            created_at: None,
            updated_at,
            deleted_at: None,
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        created: Mutex<Vec<EntityKind>>,
        transitions: Mutex<Vec<(String, String)>>,
    }

    impl RewardHooks for RecordingHooks {
        fn on_created(&self, _owner: &str, kind: EntityKind) {
            self.created.lock().unwrap().push(kind);
        }

        fn on_transition(&self, _owner: &str, _kind: EntityKind, from: &str, to: &str) {
            self.transitions
                .lock()
                .unwrap()
                .push((from.to_string(), to.to_string()));
        }
    }

    #[test]
    fn test_creates_missing_record() {
        let db = Database::open_in_memory().unwrap();
        let hooks = RecordingHooks::default();

        let outcome = upsert(db.connection(), task("t1", "Draft", None), "user-a", &hooks).unwrap();
        assert_eq!(outcome, Outcome::Created);
        assert_eq!(*hooks.created.lock().unwrap(), vec![EntityKind::Task]);

        let stored: Task = find_owned(db.connection(), "t1", "user-a")
            .unwrap()
            .unwrap();
        assert_eq!(stored.owner_id.as_deref(), Some("user-a"));
        assert!(stored.created_at.is_some());
        assert!(stored.updated_at.is_some());
    }

    #[test]
    fn test_newer_client_overwrites() {
        let db = Database::open_in_memory().unwrap();
        upsert(db.connection(), task("t1", "Draft", None), "user-a", &NoRewards).unwrap();

        let future = Utc::now().timestamp_millis() + 60_000;
        let outcome = upsert(
            db.connection(),
            task("t1", "Final", Some(future)),
            "user-a",
            &NoRewards,
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Updated);

        let stored: Task = find_owned(db.connection(), "t1", "user-a")
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "Final");
    }

    #[test]
    fn test_older_client_keeps_server() {
        let db = Database::open_in_memory().unwrap();
        upsert(db.connection(), task("t1", "Draft", None), "user-a", &NoRewards).unwrap();

        let outcome = upsert(
            db.connection(),
            task("t1", "Stale", Some(1_000)),
            "user-a",
            &NoRewards,
        )
        .unwrap();
        assert_eq!(outcome, Outcome::ConflictKept);

        let stored: Task = find_owned(db.connection(), "t1", "user-a")
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "Draft");
    }

    #[test]
    fn test_missing_client_timestamp_overwrites() {
        let db = Database::open_in_memory().unwrap();
        upsert(db.connection(), task("t1", "Draft", None), "user-a", &NoRewards).unwrap();

        let outcome = upsert(
            db.connection(),
            task("t1", "No timestamp", None),
            "user-a",
            &NoRewards,
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Updated);

        let stored: Task = find_owned(db.connection(), "t1", "user-a")
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "No timestamp");
    }

    #[test]
    fn test_updated_at_never_regresses() {
        let db = Database::open_in_memory().unwrap();
        upsert(db.connection(), task("t1", "Draft", None), "user-a", &NoRewards).unwrap();
        let first: Task = find_owned(db.connection(), "t1", "user-a")
            .unwrap()
            .unwrap();

        let future = Utc::now().timestamp_millis() + 60_000;
        upsert(
            db.connection(),
            task("t1", "Final", Some(future)),
            "user-a",
            &NoRewards,
        )
        .unwrap();
        let second: Task = find_owned(db.connection(), "t1", "user-a")
            .unwrap()
            .unwrap();

        assert!(second.updated_at >= first.updated_at);
    }

    #[test]
    fn test_foreign_id_collision_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        upsert(db.connection(), task("t1", "Draft", None), "user-a", &NoRewards).unwrap();

        let future = Utc::now().timestamp_millis() + 60_000;
        let err = upsert(
            db.connection(),
            task("t1", "Hijacked", Some(future)),
            "user-b",
            &NoRewards,
        )
        .unwrap_err();
        assert!(matches!(err, Error::OwnershipViolation { .. }));

        let stored: Task = find_owned(db.connection(), "t1", "user-a")
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "Draft");
    }

    #[test]
    fn test_status_transition_fires_hook() {
        let db = Database::open_in_memory().unwrap();
        let hooks = RecordingHooks::default();
        upsert(db.connection(), task("t1", "Draft", None), "user-a", &hooks).unwrap();

        let future = Utc::now().timestamp_millis() + 60_000;
        let mut done = task("t1", "Draft", Some(future));
        done.status = "done".to_string();
        upsert(db.connection(), done, "user-a", &hooks).unwrap();

        assert_eq!(
            *hooks.transitions.lock().unwrap(),
            vec![("todo".to_string(), "done".to_string())]
        );
    }

    #[test]
    fn test_unchanged_status_fires_no_hook() {
        let db = Database::open_in_memory().unwrap();
        let hooks = RecordingHooks::default();
        upsert(db.connection(), task("t1", "Draft", None), "user-a", &hooks).unwrap();

        let future = Utc::now().timestamp_millis() + 60_000;
        upsert(
            db.connection(),
            task("t1", "Renamed", Some(future)),
            "user-a",
            &hooks,
        )
        .unwrap();

        assert!(hooks.transitions.lock().unwrap().is_empty());
    }
}
