//! lifelog-core - Core library for Lifelog
//!
//! This crate contains the shared models, database layer, and sync engine
//! used by the Lifelog backend. The sync engine reconciles batches of
//! client-held records against the server store with per-owner isolation
//! and last-write-wins conflict resolution.

pub mod db;
pub mod error;
pub mod models;
pub mod rewards;
pub mod sync;

pub use db::Database;
pub use error::{Error, Result};
pub use models::EntityKind;
pub use rewards::{NoRewards, RewardHooks};
pub use sync::{export, CommitMode, FullState, Outcome, SyncBatch, SyncSession, SyncSummary};
