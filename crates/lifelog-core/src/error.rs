//! Error types for lifelog-core

use thiserror::Error;

use crate::models::EntityKind;

/// Result type alias using lifelog-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lifelog-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed record that cannot be normalized (e.g. missing `id`)
    #[error("Invalid record: {0}")]
    Validation(String),

    /// A record's identifier or declared owner belongs to another user
    #[error("Cannot modify {kind} record {id} belonging to another user")]
    OwnershipViolation { kind: EntityKind, id: String },

    /// Batch exceeds the per-request record cap
    #[error("Too many items to sync at once: {submitted} submitted, maximum is {max}")]
    CapacityExceeded { submitted: usize, max: usize },

    /// Underlying storage failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
