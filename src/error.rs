//! Error taxonomy for the task store
//!
//! Lookups never fail: a missing record is an `Option::None`. Everything that
//! touches the disk or the git journal surfaces as a [`StoreError`], and input
//! problems are caught as a [`ValidationError`] before any write happens.

use thiserror::Error;

/// Failures of the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the data file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tables could not be encoded as TOML
    #[error("failed to encode data file: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The data file exists but is not a valid task document
    #[error("failed to decode data file: {0}")]
    Deserialize(#[from] toml::de::Error),

    /// Committing the data file to the git journal failed
    #[error("git journal error: {0}")]
    Git(String),

    /// A blocking worker panicked or was cancelled
    #[error("background worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid priority '{0}'. Valid priorities: high, medium, low")]
    InvalidPriority(String),

    #[error("invalid status '{0}'. Valid statuses: new, in_progress, completed")]
    InvalidStatus(String),

    #[error(
        "invalid filter '{0}'. Valid filters: all, completed, in_progress, high_priority, overdue"
    )]
    InvalidFilter(String),

    #[error("invalid date '{0}'. Use YYYY-MM-DD, YYYY-MM-DD HH:MM or RFC 3339")]
    InvalidDate(String),
}

/// Top-level error returned by repository and ordering operations.
#[derive(Debug, Error)]
pub enum AnjezError {
    /// The referenced task or subtask does not exist
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type Result<T> = std::result::Result<T, AnjezError>;
