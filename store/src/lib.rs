//! Relational store adapter for the data domain engine.
//!
//! This crate defines the minimal capability surface the engine requires
//! from a relational database — list tables, describe columns, run a
//! parameterized query, run a parameterized statement with row-count and
//! last-insert-id feedback — and provides the SQLite implementation.
//!
//! The engine consumes *both* of its databases (the metadata store and
//! the domain store) through [`RelationalStore`], so any backend
//! implementing the trait can host either side.
//!
//! # Example
//!
//! ```
//! use data_domain_core::Value;
//! use data_domain_store::{RelationalStore, SqliteStore};
//!
//! let store = SqliteStore::open_in_memory().unwrap();
//! store
//!     .execute(
//!         "CREATE TABLE user (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
//!         &[],
//!     )
//!     .unwrap();
//!
//! let result = store
//!     .execute("INSERT INTO user (name) VALUES (?)", &[Value::from("Ada")])
//!     .unwrap();
//! assert_eq!(result.affected_rows, 1);
//!
//! let columns = store.describe_columns("user").unwrap();
//! assert!(columns[0].primary_key);
//! ```

mod adapter;
mod error;
mod sqlite;

pub use adapter::{ColumnDescription, ExecuteResult, RelationalStore, Row};
pub use error::{Result, StoreError};
pub use sqlite::SqliteStore;
