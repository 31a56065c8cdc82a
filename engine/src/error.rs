//! Error types for engine operations.
//!
//! All variants are caller-visible domain errors and none are transient:
//! the engine performs no retries and no partial-failure recovery. Builder
//! misuse and store failures are wrapped so the transport layer sees a
//! single error type.

use data_domain_core::{FieldType, ValidationError};
use data_domain_sql::BuildError;
use data_domain_store::StoreError;
use thiserror::Error;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No entity with the given code exists.
    #[error("entity type not found: {0}")]
    EntityTypeNotFound(String),

    /// Input data contained keys matching no field code.
    #[error("unknown fields: {}", .0.join(", "))]
    UnknownFields(Vec<String>),

    /// A mandatory field was absent or null on creation.
    #[error("missing mandatory field: {0}")]
    MissingMandatoryField(String),

    /// A read filter lacked a value for an identifier field.
    #[error("missing identifier field: {0}")]
    MissingIdentifierField(String),

    /// A mutation lacked a defined value for an identifier field.
    #[error("missing identifier value: {0}")]
    MissingIdentifierValue(String),

    /// Introspection found a native column type with no semantic mapping.
    #[error("unsupported column type '{native_type}' for column '{column}' of table '{table}'")]
    UnsupportedColumnType {
        /// Table being introspected.
        table: String,
        /// Offending column.
        column: String,
        /// The native type as reported by the adapter.
        native_type: String,
    },

    /// A single-row mutation affected a different number of rows.
    ///
    /// This signals a violated consistency invariant, not a retryable
    /// condition.
    #[error("expected exactly one affected row, got {0}")]
    UnexpectedAffectedRowCount(u64),

    /// The verifying read after an update returned a different number of
    /// rows than one. Defensive; should be unreachable given the
    /// affected-row-count check.
    #[error("expected exactly one row from verifying read, got {0}")]
    UnexpectedReadCount(usize),

    /// A raw row value could not be decoded as the field's semantic type.
    #[error("cannot decode column '{column}' as {}", .expected.as_str())]
    ValueDecode {
        /// Column the value was read from.
        column: String,
        /// The semantic type decoding was attempted against.
        expected: FieldType,
    },

    /// Loaded or introspected metadata violated a structural invariant.
    #[error("invalid metadata for entity '{code}': {}", .problems.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidMetadata {
        /// Offending entity code.
        code: String,
        /// The individual violations.
        problems: Vec<ValidationError>,
    },

    /// A persisted metadata row could not be interpreted (e.g. an unknown
    /// field type string after a direct edit).
    #[error("corrupt metadata: {0}")]
    CorruptMetadata(String),

    /// The metadata table prefix contains invalid characters.
    #[error("invalid metadata prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),

    /// The metadata store did not report an id for an inserted row.
    #[error("metadata store did not report an id for an inserted row")]
    IdentityNotReported,

    /// Statement construction failure.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Store adapter failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for results with [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;
