use std::sync::atomic::{AtomicU64, Ordering};

use lifelog_core::{EntityKind, RewardHooks};

/// Reward hook sink that logs progress events and keeps running
/// counters for the health endpoint.
///
/// The point system itself lives client-side; the backend only needs
/// an audit trail of the events that feed it.
#[derive(Default)]
pub struct TracingRewards {
    records_created: AtomicU64,
    tasks_completed: AtomicU64,
    goals_completed: AtomicU64,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct RewardMetricsSnapshot {
    pub records_created: u64,
    pub tasks_completed: u64,
    pub goals_completed: u64,
}

impl TracingRewards {
    pub fn metrics_snapshot(&self) -> RewardMetricsSnapshot {
        RewardMetricsSnapshot {
            records_created: self.records_created.load(Ordering::Relaxed),
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            goals_completed: self.goals_completed.load(Ordering::Relaxed),
        }
    }
}

impl RewardHooks for TracingRewards {
    fn on_created(&self, owner: &str, kind: EntityKind) {
        self.records_created.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(user = owner, kind = %kind, "Record created");
    }

    fn on_transition(&self, owner: &str, kind: EntityKind, from: &str, to: &str) {
        match (kind, to) {
            (EntityKind::Task, "done") => {
                self.tasks_completed.fetch_add(1, Ordering::Relaxed);
                tracing::info!(user = owner, from, "Task completed");
            }
            (EntityKind::Goal, "completed") => {
                self.goals_completed.fetch_add(1, Ordering::Relaxed);
                tracing::info!(user = owner, from, "Goal completed");
            }
            _ => {
                tracing::debug!(user = owner, kind = %kind, from, to, "State transition");
            }
        }
    }
}
