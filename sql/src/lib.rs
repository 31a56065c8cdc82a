//! Parameterized SQL statement builders.
//!
//! This crate produces `(statement_text, ordered_parameters)` pairs for the
//! four operations the data domain engine performs — SELECT, INSERT,
//! UPDATE, DELETE — deferring execution to the store adapter.
//!
//! # Design
//!
//! - Builders are plain values: every method consumes `self` and returns
//!   the extended builder, so there is never shared mutable builder state.
//! - Placeholders are positional (`?`); parameters render in clause order,
//!   left to right.
//! - Required clauses are enforced at [`build`](Select::build) time with a
//!   specific [`BuildError`] per missing clause; setting a
//!   set-exactly-once clause twice fails at the call site.
//! - Identifiers render double-quoted with embedded quotes doubled, and
//!   are **not** validated: only ever pass identifiers sourced from
//!   trusted metadata, never raw user input.
//!
//! # Example
//!
//! ```
//! use data_domain_sql::{Insert, Select};
//!
//! let insert = Insert::new()
//!     .into("user")
//!     .unwrap()
//!     .set("first_name", "Douglas")
//!     .set("last_name", "Adams")
//!     .build()
//!     .unwrap();
//! assert_eq!(
//!     insert.sql,
//!     "INSERT INTO \"user\" (\"first_name\", \"last_name\") VALUES (?, ?)"
//! );
//!
//! let select = Select::new()
//!     .from("user")
//!     .unwrap()
//!     .equal("last_name", "Adams")
//!     .unwrap()
//!     .limit(1)
//!     .build()
//!     .unwrap();
//! assert_eq!(
//!     select.sql,
//!     "SELECT * FROM \"user\" WHERE \"last_name\" = ? LIMIT ?"
//! );
//! ```

mod clause;
mod delete;
mod error;
mod insert;
mod select;
mod statement;
mod update;

pub use clause::{SetClause, WhereClause};
pub use delete::Delete;
pub use error::{BuildError, Result};
pub use insert::Insert;
pub use select::Select;
pub use statement::Statement;
pub use update::Update;
