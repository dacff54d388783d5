//! Database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get::<_, i32>(0).map(|v| v != 0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Migration to version 1: Initial schema (one table per entity kind)
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            date TEXT NOT NULL,
            title TEXT NOT NULL,
            status TEXT NOT NULL,
            spent_time INTEGER NOT NULL DEFAULT 0,
            time_logs TEXT,
            estimated_time INTEGER,
            is_useful INTEGER,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            deleted_at INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date);
        CREATE TABLE IF NOT EXISTS expenses (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            date TEXT NOT NULL,
            title TEXT NOT NULL,
            amount REAL NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            deleted_at INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_expenses_owner ON expenses(owner_id);
        CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
        CREATE TABLE IF NOT EXISTS journals (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            date TEXT NOT NULL,
            tasks TEXT NOT NULL DEFAULT '[]',
            expenses TEXT NOT NULL DEFAULT '[]',
            sleep_id TEXT,
            mood_id TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            deleted_at INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_journals_owner ON journals(owner_id);
        CREATE INDEX IF NOT EXISTS idx_journals_date ON journals(date);
        CREATE TABLE IF NOT EXISTS reflections (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            date TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            water_intake INTEGER NOT NULL DEFAULT 0,
            study_minutes INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            deleted_at INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_reflections_owner ON reflections(owner_id);
        CREATE INDEX IF NOT EXISTS idx_reflections_date ON reflections(date);
        CREATE TABLE IF NOT EXISTS goals (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            goal_type TEXT NOT NULL,
            year INTEGER NOT NULL,
            quarter INTEGER,
            month INTEGER,
            week INTEGER,
            target_value REAL NOT NULL,
            current_value REAL NOT NULL DEFAULT 0,
            unit TEXT NOT NULL,
            linked_task_ids TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'active',
            progress_type TEXT NOT NULL DEFAULT 'manual',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            completed_at INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_goals_owner ON goals(owner_id);
        CREATE INDEX IF NOT EXISTS idx_goals_year ON goals(year);
        CREATE TABLE IF NOT EXISTS calendar_notes (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            date TEXT NOT NULL,
            note TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_calendar_notes_owner ON calendar_notes(owner_id);
        CREATE INDEX IF NOT EXISTS idx_calendar_notes_date ON calendar_notes(date);
        INSERT INTO schema_version (version) VALUES (1);
        COMMIT;",
    )?;

    tracing::info!("Migrated database to version 1");
    Ok(())
}

/// Migration to version 2: covering indexes for the owner-scoped
/// lookup the upsert engine performs on every record
fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
        CREATE INDEX IF NOT EXISTS idx_tasks_owner_updated ON tasks(owner_id, updated_at DESC);
        CREATE INDEX IF NOT EXISTS idx_expenses_owner_updated ON expenses(owner_id, updated_at DESC);
        CREATE INDEX IF NOT EXISTS idx_journals_owner_updated ON journals(owner_id, updated_at DESC);
        CREATE INDEX IF NOT EXISTS idx_reflections_owner_updated ON reflections(owner_id, updated_at DESC);
        CREATE INDEX IF NOT EXISTS idx_goals_owner_updated ON goals(owner_id, updated_at DESC);
        CREATE INDEX IF NOT EXISTS idx_calendar_notes_owner_updated ON calendar_notes(owner_id, updated_at DESC);
        INSERT INTO schema_version (version) VALUES (2);
        COMMIT;",
    )?;

    tracing::info!("Migrated database to version {CURRENT_VERSION}");
    Ok(())
}
