//! Error types for store adapter operations.

use thiserror::Error;

/// Errors that can occur while talking to a relational store.
///
/// The engine treats every adapter failure as fatal for the current
/// operation; there are no retries and no transient classification.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite driver failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The described or queried table does not exist.
    #[error("no such table: {0}")]
    NoSuchTable(String),

    /// A row contained a value with no semantic mapping (e.g. a BLOB).
    #[error("unsupported value in column '{column}': {detail}")]
    UnsupportedValue {
        /// Column the value was read from.
        column: String,
        /// Driver-level description of the value.
        detail: String,
    },
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
