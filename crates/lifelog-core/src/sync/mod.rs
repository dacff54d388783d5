//! Synchronization engine
//!
//! A sync session accepts a batch of client-held records across all
//! entity kinds, normalizes them into the canonical shape, resolves
//! conflicts per record with last-write-wins, and persists the winners
//! under strict per-owner isolation.

pub mod export;
pub mod normalize;
pub mod resolve;
pub mod session;
pub mod upsert;

pub use export::{export, FullState};
pub use normalize::normalize;
pub use resolve::{resolve, Resolution};
pub use session::{CommitMode, SyncBatch, SyncSession, SyncSummary, MAX_BATCH_ITEMS};
pub use upsert::{upsert, Outcome};
