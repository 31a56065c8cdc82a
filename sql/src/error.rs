//! Error types for statement construction.
//!
//! All variants are caller-visible usage errors: a clause that is required
//! but absent, a clause set twice, or a null value passed where the
//! restriction does not accept one. None are transient.

use thiserror::Error;

/// Errors that can occur while building a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A select statement was built without a source table.
    #[error("select statement has no source table")]
    FromNotSet,

    /// The select source table was set more than once.
    #[error("select source table is already set")]
    FromAlreadySet,

    /// An insert statement was built without a target table.
    #[error("insert statement has no target table")]
    IntoNotSet,

    /// The insert target table was set more than once.
    #[error("insert target table is already set")]
    IntoAlreadySet,

    /// An update or delete statement was built without a target table.
    #[error("statement has no target table")]
    TableNotSet,

    /// The update or delete target table was set more than once.
    #[error("statement target table is already set")]
    TableAlreadySet,

    /// An insert statement was built without any field assignments.
    #[error("insert statement sets no fields")]
    NoFieldsSet,

    /// An update statement was built without any SET attributions.
    #[error("update statement has no attributions")]
    NoAttributionsSet,

    /// An update or delete statement was built without WHERE restrictions.
    #[error("statement has no where restrictions")]
    NoWhereRestrictions,

    /// A null value was passed to a restriction that does not accept one.
    #[error("null value not accepted for column '{0}'")]
    NullNotAccepted(String),
}

/// Convenience alias for results with [`BuildError`].
pub type Result<T> = std::result::Result<T, BuildError>;
