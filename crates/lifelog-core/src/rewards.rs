//! Reward-signal seam
//!
//! Gamification lives outside this crate; the sync engine only emits
//! events through this trait, synchronously after a successful write.

use crate::models::EntityKind;

/// Callbacks invoked by the upsert engine after successful writes
pub trait RewardHooks: Send + Sync {
    /// A record was created for the first time
    fn on_created(&self, _owner: &str, _kind: EntityKind) {}

    /// An applied update changed a record's status field
    fn on_transition(&self, _owner: &str, _kind: EntityKind, _from: &str, _to: &str) {}
}

/// No-op hooks for callers that don't track rewards
pub struct NoRewards;

impl RewardHooks for NoRewards {}
