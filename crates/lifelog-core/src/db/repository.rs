//! Per-kind record storage
//!
//! Each entity kind maps its fields to its own table explicitly, so a
//! payload column can never be written by accident; the generic lookup
//! helpers only rely on the `id`/`owner_id`/`updated_at` columns every
//! kind shares.

use rusqlite::{params, Connection, Row};

use crate::error::Result;
use crate::models::{CalendarNote, Expense, Goal, Journal, Reflection, Syncable, Task};

/// Storage operations every syncable kind implements
pub trait RecordStore: Syncable {
    /// Table holding this kind's rows
    const TABLE: &'static str;

    /// Column list matching `from_row`'s indexes
    const SELECT_COLUMNS: &'static str;

    /// Parse a record from a database row
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Insert a new row; `owner_id`, `created_at` and `updated_at` must
    /// already be set by the caller
    fn insert(&self, conn: &Connection) -> Result<()>;

    /// Overwrite all payload fields of the row with this record's id.
    /// Never touches `id`, `owner_id` or `created_at`.
    fn update_payload(&self, conn: &Connection) -> Result<()>;
}

/// Look up a record by id, scoped to the given owner
pub fn find_owned<T: RecordStore>(conn: &Connection, id: &str, owner: &str) -> Result<Option<T>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ? AND owner_id = ?",
        T::SELECT_COLUMNS,
        T::TABLE
    );
    match conn.query_row(&sql, params![id, owner], |row| T::from_row(row)) {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Owner of the row with this id, regardless of who that owner is
pub fn owner_of<T: RecordStore>(conn: &Connection, id: &str) -> Result<Option<String>> {
    let sql = format!("SELECT owner_id FROM {} WHERE id = ?", T::TABLE);
    match conn.query_row(&sql, params![id], |row| row.get(0)) {
        Ok(owner) => Ok(Some(owner)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All rows owned by the given caller, newest first
pub fn list_owned<T: RecordStore>(conn: &Connection, owner: &str) -> Result<Vec<T>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE owner_id = ? ORDER BY updated_at DESC",
        T::SELECT_COLUMNS,
        T::TABLE
    );
    let mut stmt = conn.prepare(&sql)?;
    let records = stmt
        .query_map(params![owner], |row| T::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

impl RecordStore for Task {
    const TABLE: &'static str = "tasks";
    const SELECT_COLUMNS: &'static str = "id, owner_id, date, title, status, spent_time, \
         time_logs, estimated_time, is_useful, created_at, updated_at, deleted_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            date: row.get(2)?,
            title: row.get(3)?,
            status: row.get(4)?,
            spent_time: row.get(5)?,
            time_logs: row.get(6)?,
            estimated_time: row.get(7)?,
            is_useful: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
            deleted_at: row.get(11)?,
        })
    }

    fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO tasks (id, owner_id, date, title, status, spent_time, time_logs,
             estimated_time, is_useful, created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                self.id,
                self.owner_id,
                self.date,
                self.title,
                self.status,
                self.spent_time,
                self.time_logs,
                self.estimated_time,
                self.is_useful,
                self.created_at,
                self.updated_at,
                self.deleted_at
            ],
        )?;
        Ok(())
    }

    fn update_payload(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE tasks SET date = ?, title = ?, status = ?, spent_time = ?, time_logs = ?,
             estimated_time = ?, is_useful = ?, updated_at = ?, deleted_at = ?
             WHERE id = ?",
            params![
                self.date,
                self.title,
                self.status,
                self.spent_time,
                self.time_logs,
                self.estimated_time,
                self.is_useful,
                self.updated_at,
                self.deleted_at,
                self.id
            ],
        )?;
        Ok(())
    }
}

impl RecordStore for Expense {
    const TABLE: &'static str = "expenses";
    const SELECT_COLUMNS: &'static str =
        "id, owner_id, date, title, amount, created_at, updated_at, deleted_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            date: row.get(2)?,
            title: row.get(3)?,
            amount: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
            deleted_at: row.get(7)?,
        })
    }

    fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO expenses (id, owner_id, date, title, amount, created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                self.id,
                self.owner_id,
                self.date,
                self.title,
                self.amount,
                self.created_at,
                self.updated_at,
                self.deleted_at
            ],
        )?;
        Ok(())
    }

    fn update_payload(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE expenses SET date = ?, title = ?, amount = ?, updated_at = ?, deleted_at = ?
             WHERE id = ?",
            params![
                self.date,
                self.title,
                self.amount,
                self.updated_at,
                self.deleted_at,
                self.id
            ],
        )?;
        Ok(())
    }
}

impl RecordStore for Journal {
    const TABLE: &'static str = "journals";
    const SELECT_COLUMNS: &'static str =
        "id, owner_id, date, tasks, expenses, sleep_id, mood_id, created_at, updated_at, deleted_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let tasks: String = row.get(3)?;
        let expenses: String = row.get(4)?;
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            date: row.get(2)?,
            tasks: serde_json::from_str(&tasks).unwrap_or_default(),
            expenses: serde_json::from_str(&expenses).unwrap_or_default(),
            sleep_id: row.get(5)?,
            mood_id: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
            deleted_at: row.get(9)?,
        })
    }

    fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO journals (id, owner_id, date, tasks, expenses, sleep_id, mood_id,
             created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                self.id,
                self.owner_id,
                self.date,
                serde_json::to_string(&self.tasks)?,
                serde_json::to_string(&self.expenses)?,
                self.sleep_id,
                self.mood_id,
                self.created_at,
                self.updated_at,
                self.deleted_at
            ],
        )?;
        Ok(())
    }

    fn update_payload(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE journals SET date = ?, tasks = ?, expenses = ?, sleep_id = ?, mood_id = ?,
             updated_at = ?, deleted_at = ?
             WHERE id = ?",
            params![
                self.date,
                serde_json::to_string(&self.tasks)?,
                serde_json::to_string(&self.expenses)?,
                self.sleep_id,
                self.mood_id,
                self.updated_at,
                self.deleted_at,
                self.id
            ],
        )?;
        Ok(())
    }
}

impl RecordStore for Reflection {
    const TABLE: &'static str = "reflections";
    const SELECT_COLUMNS: &'static str =
        "id, owner_id, date, notes, water_intake, study_minutes, created_at, updated_at, deleted_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            date: row.get(2)?,
            notes: row.get(3)?,
            water_intake: row.get(4)?,
            study_minutes: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
            deleted_at: row.get(8)?,
        })
    }

    fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO reflections (id, owner_id, date, notes, water_intake, study_minutes,
             created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                self.id,
                self.owner_id,
                self.date,
                self.notes,
                self.water_intake,
                self.study_minutes,
                self.created_at,
                self.updated_at,
                self.deleted_at
            ],
        )?;
        Ok(())
    }

    fn update_payload(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE reflections SET date = ?, notes = ?, water_intake = ?, study_minutes = ?,
             updated_at = ?, deleted_at = ?
             WHERE id = ?",
            params![
                self.date,
                self.notes,
                self.water_intake,
                self.study_minutes,
                self.updated_at,
                self.deleted_at,
                self.id
            ],
        )?;
        Ok(())
    }
}

impl RecordStore for Goal {
    const TABLE: &'static str = "goals";
    const SELECT_COLUMNS: &'static str = "id, owner_id, title, description, goal_type, year, \
         quarter, month, week, target_value, current_value, unit, linked_task_ids, status, \
         progress_type, created_at, updated_at, completed_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let linked: String = row.get(12)?;
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            goal_type: row.get(4)?,
            year: row.get(5)?,
            quarter: row.get(6)?,
            month: row.get(7)?,
            week: row.get(8)?,
            target_value: row.get(9)?,
            current_value: row.get(10)?,
            unit: row.get(11)?,
            linked_task_ids: serde_json::from_str(&linked).unwrap_or_default(),
            status: row.get(13)?,
            progress_type: row.get(14)?,
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
            completed_at: row.get(17)?,
        })
    }

    fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO goals (id, owner_id, title, description, goal_type, year, quarter,
             month, week, target_value, current_value, unit, linked_task_ids, status,
             progress_type, created_at, updated_at, completed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                self.id,
                self.owner_id,
                self.title,
                self.description,
                self.goal_type,
                self.year,
                self.quarter,
                self.month,
                self.week,
                self.target_value,
                self.current_value,
                self.unit,
                serde_json::to_string(&self.linked_task_ids)?,
                self.status,
                self.progress_type,
                self.created_at,
                self.updated_at,
                self.completed_at
            ],
        )?;
        Ok(())
    }

    fn update_payload(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE goals SET title = ?, description = ?, goal_type = ?, year = ?, quarter = ?,
             month = ?, week = ?, target_value = ?, current_value = ?, unit = ?,
             linked_task_ids = ?, status = ?, progress_type = ?, updated_at = ?, completed_at = ?
             WHERE id = ?",
            params![
                self.title,
                self.description,
                self.goal_type,
                self.year,
                self.quarter,
                self.month,
                self.week,
                self.target_value,
                self.current_value,
                self.unit,
                serde_json::to_string(&self.linked_task_ids)?,
                self.status,
                self.progress_type,
                self.updated_at,
                self.completed_at,
                self.id
            ],
        )?;
        Ok(())
    }
}

impl RecordStore for CalendarNote {
    const TABLE: &'static str = "calendar_notes";
    const SELECT_COLUMNS: &'static str = "id, owner_id, date, note, created_at, updated_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            date: row.get(2)?,
            note: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO calendar_notes (id, owner_id, date, note, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                self.id,
                self.owner_id,
                self.date,
                self.note,
                self.created_at,
                self.updated_at
            ],
        )?;
        Ok(())
    }

    fn update_payload(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE calendar_notes SET date = ?, note = ?, updated_at = ?
             WHERE id = ?",
            params![self.date, self.note, self.updated_at, self.id],
        )?;
        Ok(())
    }
}
