//! Error types for compensation pools and liquidation.

use thiserror::Error;

/// Errors surfaced by [`crate::aggregator::CompensationAggregator`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompensationError {
    /// A compensation of zero grams carries no mass to record.
    #[error("compensation must be at least 1 gram")]
    InvalidGrams,

    /// The pool kept changing underneath us (or stayed mid-liquidation) for
    /// every allowed attempt.
    #[error("pool update conflict for project {project_id} after {attempts} attempts")]
    PoolUpdateConflict { project_id: String, attempts: u32 },

    /// The registry refused the liquidation; the pool was left untouched.
    #[error("liquidation of {tons} t for project {project_id} failed: {reason}")]
    LiquidationFailed {
        project_id: String,
        tons: u64,
        reason: String,
    },

    /// The registry could not be reached after retries; the pool was left
    /// untouched.
    #[error("liquidation registry unreachable: {0}")]
    RegistryUnreachable(String),

    /// Adding the grams would overflow the pool's counters.
    #[error("compensation of {grams} g overflows the pool of project {project_id}")]
    Overflow { project_id: String, grams: u64 },

    /// Storage backend failure.
    #[error("pool store error: {0}")]
    Store(#[from] StoreError),

    /// A provider webhook could not be turned into a compensation request.
    #[error("invalid compensation webhook: {0}")]
    InvalidWebhook(String),

    /// The configuration is invalid.
    #[error("invalid compensation configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Errors produced by a [`crate::store::PoolStore`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The conditional write lost a race: the stored version moved on.
    #[error("version conflict on pool {project_id}: expected {expected}, found {actual}")]
    VersionConflict {
        project_id: String,
        expected: u64,
        actual: u64,
    },

    /// Any other backend failure (connection, serialization, …).
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Errors returned by a [`crate::registry::LiquidationRegistry`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Transient: the registry could not be reached. Safe to retry.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// Permanent: the registry answered and refused the event.
    #[error("rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, CompensationError>;
