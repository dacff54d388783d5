//! Sync session orchestration
//!
//! Drives one batch through capacity and ownership pre-checks, then the
//! per-record upsert engine, kind by kind in a fixed order.

use std::sync::Mutex;

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::RecordStore;
use crate::error::{Error, Result};
use crate::models::{
    CalendarNote, EntityKind, Expense, Goal, Journal, Reflection, Syncable, Task,
};
use crate::rewards::RewardHooks;
use crate::sync::normalize::normalize;
use crate::sync::upsert::{upsert, Outcome};

/// Maximum total records accepted per sync request
pub const MAX_BATCH_ITEMS: usize = 1000;

/// How writes are committed within one batch.
///
/// `PerRecord` keeps the historical at-least-once semantics: a failure
/// partway through leaves earlier records committed. `Batch` wraps the
/// whole session in one transaction and rolls everything back on
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitMode {
    #[default]
    PerRecord,
    Batch,
}

/// One sync request: raw wire records grouped by entity kind
#[derive(Debug, Default, Deserialize)]
pub struct SyncBatch {
    #[serde(default)]
    pub tasks: Vec<Value>,
    #[serde(default)]
    pub expenses: Vec<Value>,
    #[serde(default)]
    pub journals: Vec<Value>,
    #[serde(default)]
    pub reflections: Vec<Value>,
    #[serde(default)]
    pub goals: Vec<Value>,
    #[serde(default, alias = "calendarNotes")]
    pub calendar_notes: Vec<Value>,
}

impl SyncBatch {
    pub fn total_items(&self) -> usize {
        self.tasks.len()
            + self.expenses.len()
            + self.journals.len()
            + self.reflections.len()
            + self.goals.len()
            + self.calendar_notes.len()
    }
}

/// Per-kind processed counts plus the global conflict counter.
///
/// A record kept by conflict resolution still counts as synced; the
/// client's copy was handled, just not applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub synced_tasks: usize,
    pub synced_expenses: usize,
    pub synced_journals: usize,
    pub synced_reflections: usize,
    pub synced_goals: usize,
    pub synced_calendar_notes: usize,
    pub conflicts_resolved: usize,
}

impl SyncSummary {
    pub const fn total_synced(&self) -> usize {
        self.synced_tasks
            + self.synced_expenses
            + self.synced_journals
            + self.synced_reflections
            + self.synced_goals
            + self.synced_calendar_notes
    }
}

/// Whole batch in canonical form, ownership already pre-checked
struct NormalizedBatch {
    tasks: Vec<Task>,
    expenses: Vec<Expense>,
    journals: Vec<Journal>,
    reflections: Vec<Reflection>,
    goals: Vec<Goal>,
    calendar_notes: Vec<CalendarNote>,
}

/// One batch-processing session for a single caller
pub struct SyncSession<'a> {
    conn: &'a Connection,
    caller: &'a str,
    hooks: &'a dyn RewardHooks,
    commit_mode: CommitMode,
}

impl<'a> SyncSession<'a> {
    pub fn new(conn: &'a Connection, caller: &'a str, hooks: &'a dyn RewardHooks) -> Self {
        Self {
            conn,
            caller,
            hooks,
            commit_mode: CommitMode::default(),
        }
    }

    #[must_use]
    pub const fn with_commit_mode(mut self, mode: CommitMode) -> Self {
        self.commit_mode = mode;
        self
    }

    /// Process one batch.
    ///
    /// The batch is normalized and ownership-checked in full before the
    /// first write, so validation and declared-owner failures never
    /// leave partial state behind. Writes then run kind by kind in a
    /// fixed order, records in submission order. In `Batch` mode reward
    /// hooks are held back until the transaction commits, so observers
    /// never hear about writes that get rolled back.
    pub fn run(&self, batch: SyncBatch) -> Result<SyncSummary> {
        let total = batch.total_items();
        if total > MAX_BATCH_ITEMS {
            return Err(Error::CapacityExceeded {
                submitted: total,
                max: MAX_BATCH_ITEMS,
            });
        }

        let normalized = self.normalize_batch(batch)?;

        let mut summary = SyncSummary::default();
        match self.commit_mode {
            CommitMode::PerRecord => self.apply(normalized, self.hooks, &mut summary)?,
            CommitMode::Batch => {
                let deferred = DeferredRewards::default();
                let tx = self.conn.unchecked_transaction()?;
                self.apply(normalized, &deferred, &mut summary)?;
                tx.commit()?;
                deferred.replay(self.hooks);
            }
        }

        tracing::info!(
            total,
            conflicts_resolved = summary.conflicts_resolved,
            "Synced batch"
        );
        Ok(summary)
    }

    fn normalize_batch(&self, batch: SyncBatch) -> Result<NormalizedBatch> {
        Ok(NormalizedBatch {
            tasks: self.normalize_kind(batch.tasks)?,
            expenses: self.normalize_kind(batch.expenses)?,
            journals: self.normalize_kind(batch.journals)?,
            reflections: self.normalize_kind(batch.reflections)?,
            goals: self.normalize_kind(batch.goals)?,
            calendar_notes: self.normalize_kind(batch.calendar_notes)?,
        })
    }

    /// Normalize every record of one kind and pre-check declared owners.
    ///
    /// The declared-owner scan is uniform across all kinds: any record
    /// claiming another owner fails the whole batch before a single
    /// write happens.
    fn normalize_kind<T>(&self, raw: Vec<Value>) -> Result<Vec<T>>
    where
        T: Syncable + DeserializeOwned,
    {
        let records = raw
            .into_iter()
            .map(normalize::<T>)
            .collect::<Result<Vec<_>>>()?;

        for record in &records {
            if let Some(owner) = record.owner_id() {
                if owner != self.caller {
                    return Err(Error::OwnershipViolation {
                        kind: T::KIND,
                        id: record.id().to_string(),
                    });
                }
            }
        }

        Ok(records)
    }

    fn apply(
        &self,
        batch: NormalizedBatch,
        hooks: &dyn RewardHooks,
        summary: &mut SyncSummary,
    ) -> Result<()> {
        let conflicts = &mut summary.conflicts_resolved;
        self.sync_kind(batch.tasks, hooks, &mut summary.synced_tasks, conflicts)?;
        self.sync_kind(batch.expenses, hooks, &mut summary.synced_expenses, conflicts)?;
        self.sync_kind(batch.journals, hooks, &mut summary.synced_journals, conflicts)?;
        self.sync_kind(
            batch.reflections,
            hooks,
            &mut summary.synced_reflections,
            conflicts,
        )?;
        self.sync_kind(batch.goals, hooks, &mut summary.synced_goals, conflicts)?;
        self.sync_kind(
            batch.calendar_notes,
            hooks,
            &mut summary.synced_calendar_notes,
            conflicts,
        )?;
        Ok(())
    }

    fn sync_kind<T: RecordStore>(
        &self,
        records: Vec<T>,
        hooks: &dyn RewardHooks,
        synced: &mut usize,
        conflicts: &mut usize,
    ) -> Result<()> {
        for record in records {
            match upsert(self.conn, record, self.caller, hooks)? {
                Outcome::ConflictKept => {
                    *conflicts += 1;
                    *synced += 1;
                }
                Outcome::Created | Outcome::Updated => *synced += 1,
            }
        }
        Ok(())
    }
}

enum RewardEvent {
    Created {
        owner: String,
        kind: EntityKind,
    },
    Transition {
        owner: String,
        kind: EntityKind,
        from: String,
        to: String,
    },
}

/// Hook sink used in `Batch` mode: events accumulate while the
/// transaction is open and replay only once it has committed.
#[derive(Default)]
struct DeferredRewards {
    events: Mutex<Vec<RewardEvent>>,
}

impl DeferredRewards {
    fn replay(self, hooks: &dyn RewardHooks) {
        for event in self.events.into_inner().unwrap_or_default() {
            match event {
                RewardEvent::Created { owner, kind } => hooks.on_created(&owner, kind),
                RewardEvent::Transition {
                    owner,
                    kind,
                    from,
                    to,
                } => hooks.on_transition(&owner, kind, &from, &to),
            }
        }
    }
}

impl RewardHooks for DeferredRewards {
    fn on_created(&self, owner: &str, kind: EntityKind) {
        if let Ok(mut events) = self.events.lock() {
            events.push(RewardEvent::Created {
                owner: owner.to_string(),
                kind,
            });
        }
    }

    fn on_transition(&self, owner: &str, kind: EntityKind, from: &str, to: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(RewardEvent::Transition {
                owner: owner.to_string(),
                kind,
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }
}
