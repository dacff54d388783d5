//! End-to-end flows through the public sync surface: batch upload,
//! conflict resolution across repeated sessions, ownership isolation
//! and full-state export.

use lifelog_core::db::{find_owned, Database};
use lifelog_core::models::Task;
use lifelog_core::sync::MAX_BATCH_ITEMS;
use lifelog_core::{export, Error, NoRewards, SyncBatch, SyncSession, SyncSummary};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn run(db: &Database, caller: &str, batch: SyncBatch) -> lifelog_core::Result<SyncSummary> {
    SyncSession::new(db.connection(), caller, &NoRewards).run(batch)
}

fn tasks_batch(tasks: Vec<Value>) -> SyncBatch {
    SyncBatch {
        tasks,
        ..SyncBatch::default()
    }
}

fn stored_title(db: &Database, id: &str, owner: &str) -> String {
    let task: Task = find_owned(db.connection(), id, owner).unwrap().unwrap();
    task.title
}

#[test]
fn first_upload_creates_and_reports() {
    let db = Database::open_in_memory().unwrap();

    let summary = run(
        &db,
        "caller-a",
        tasks_batch(vec![json!({
            "id": "t1",
            "date": "2026-01-01",
            "title": "Draft",
            "status": "todo",
            "updatedAt": "2026-01-01T10:00:00Z",
        })]),
    )
    .unwrap();

    assert_eq!(summary.synced_tasks, 1);
    assert_eq!(summary.conflicts_resolved, 0);
    assert_eq!(stored_title(&db, "t1", "caller-a"), "Draft");
}

#[test]
fn stale_resubmission_keeps_server_copy() {
    let db = Database::open_in_memory().unwrap();
    run(
        &db,
        "caller-a",
        tasks_batch(vec![json!({
            "id": "t1",
            "date": "2026-01-01",
            "title": "Draft",
            "status": "todo",
            "updatedAt": "2026-01-01T10:00:00Z",
        })]),
    )
    .unwrap();

    let summary = run(
        &db,
        "caller-a",
        tasks_batch(vec![json!({
            "id": "t1",
            "date": "2026-01-01",
            "title": "Final",
            "status": "todo",
            "updatedAt": "2026-01-01T09:00:00Z",
        })]),
    )
    .unwrap();

    assert_eq!(summary.synced_tasks, 1);
    assert_eq!(summary.conflicts_resolved, 1);
    assert_eq!(stored_title(&db, "t1", "caller-a"), "Draft");
}

#[test]
fn resubmitting_an_identical_batch_converges() {
    let db = Database::open_in_memory().unwrap();
    let record = json!({
        "id": "t1",
        "date": "2026-01-01",
        "title": "Draft",
        "status": "todo",
        "updatedAt": "2026-01-01T10:00:00Z",
    });

    run(&db, "caller-a", tasks_batch(vec![record.clone()])).unwrap();
    let second = run(&db, "caller-a", tasks_batch(vec![record])).unwrap();

    // The replay resolves as a conflict and leaves state untouched
    assert_eq!(second.synced_tasks, 1);
    assert_eq!(second.conflicts_resolved, 1);
    assert_eq!(stored_title(&db, "t1", "caller-a"), "Draft");
    assert_eq!(export(db.connection(), "caller-a").unwrap().tasks.len(), 1);
}

#[test]
fn foreign_caller_cannot_hijack_a_record() {
    let db = Database::open_in_memory().unwrap();
    run(
        &db,
        "caller-a",
        tasks_batch(vec![json!({
            "id": "t1",
            "date": "2026-01-01",
            "title": "Draft",
            "status": "todo",
            "updatedAt": "2026-01-01T10:00:00Z",
        })]),
    )
    .unwrap();

    let err = run(
        &db,
        "caller-b",
        tasks_batch(vec![json!({
            "id": "t1",
            "date": "2026-01-01",
            "title": "Hijacked",
            "status": "todo",
            "updatedAt": "2026-01-01T11:00:00Z",
        })]),
    )
    .unwrap_err();

    assert!(matches!(err, Error::OwnershipViolation { .. }));
    assert_eq!(stored_title(&db, "t1", "caller-a"), "Draft");
    // The other caller never sees the record either
    assert!(export(db.connection(), "caller-b").unwrap().tasks.is_empty());
}

#[test]
fn oversized_batch_leaves_no_trace_in_export() {
    let db = Database::open_in_memory().unwrap();
    let tasks = (0..=MAX_BATCH_ITEMS)
        .map(|i| {
            json!({
                "id": format!("t{i}"),
                "date": "2026-01-01",
                "title": "Bulk",
                "status": "todo",
            })
        })
        .collect();

    let err = run(&db, "caller-a", tasks_batch(tasks)).unwrap_err();
    assert!(matches!(err, Error::CapacityExceeded { .. }));
    assert_eq!(export(db.connection(), "caller-a").unwrap().total_records(), 0);
}

#[test]
fn mixed_batch_round_trips_through_export() {
    let db = Database::open_in_memory().unwrap();
    let batch = SyncBatch {
        tasks: vec![json!({
            "id": "t1", "date": "2026-01-02", "title": "Plan week", "status": "todo",
        })],
        expenses: vec![json!({
            "id": "e1", "date": "2026-01-02", "title": "Groceries", "amount": 42.5,
        })],
        journals: vec![json!({
            "id": "j1", "date": "2026-01-02", "tasks": ["t1"], "expenses": ["e1"],
        })],
        reflections: vec![json!({
            "id": "r1", "date": "2026-01-02", "notes": "Good day",
            "waterIntake": 6, "studyMinutes": 45,
        })],
        goals: vec![json!({
            "id": "g1", "title": "Read 12 books", "type": "yearly", "year": 2026,
            "targetValue": 12.0, "currentValue": 1.0, "unit": "books",
        })],
        calendar_notes: vec![json!({
            "id": "c1", "date": "2026-01-02", "note": "Dentist at noon",
        })],
    };

    let summary = run(&db, "caller-a", batch).unwrap();
    assert_eq!(summary.total_synced(), 6);

    let state = export(db.connection(), "caller-a").unwrap();
    assert_eq!(state.total_records(), 6);
    assert_eq!(state.tasks[0].title, "Plan week");
    assert_eq!(state.expenses[0].amount, 42.5);
    assert_eq!(state.journals[0].tasks, vec!["t1".to_string()]);
    assert_eq!(state.reflections[0].water_intake, 6);
    assert_eq!(state.goals[0].goal_type, "yearly");
    assert_eq!(state.calendar_notes[0].note, "Dentist at noon");
}

#[test]
fn later_edit_wins_and_replayed_older_edit_cannot_regress() {
    let db = Database::open_in_memory().unwrap();
    // The stored instant is server-assigned on every applied write, so
    // an edit only applies when its timestamp beats the last write.
    let later = chrono::Utc::now().timestamp_millis() + 60_000;
    let older = json!({
        "id": "t1", "date": "2026-01-01", "title": "From phone", "status": "todo",
        "updatedAt": "2026-01-01T10:00:00Z",
    });
    let newer = json!({
        "id": "t1", "date": "2026-01-01", "title": "From laptop", "status": "todo",
        "updatedAt": later,
    });

    run(&db, "caller-a", tasks_batch(vec![older.clone()])).unwrap();
    run(&db, "caller-a", tasks_batch(vec![newer.clone()])).unwrap();
    assert_eq!(stored_title(&db, "t1", "caller-a"), "From laptop");

    // Replaying the older edit afterwards resolves as a conflict
    let replay = run(&db, "caller-a", tasks_batch(vec![older])).unwrap();
    assert_eq!(replay.conflicts_resolved, 1);
    assert_eq!(stored_title(&db, "t1", "caller-a"), "From laptop");
}
