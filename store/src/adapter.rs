//! The capability surface the engine requires from a relational store.

use data_domain_core::{Record, Value};

use crate::error::Result;

/// A raw row, keyed by physical column name in column order.
///
/// Values are limited to `Null`, `Integer`, `Real`, and `Text`; semantic
/// decoding happens in the engine, driven by field metadata.
pub type Row = Record;

/// One column of a table description, in physical column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    /// Physical column name.
    pub name: String,
    /// The store's declared type for the column, as reported by the
    /// driver (e.g. `INTEGER`, `VARCHAR(80)`).
    pub native_type: String,
    /// Whether the column is (part of) the table's primary key.
    pub primary_key: bool,
    /// Whether the column is declared NOT NULL.
    pub not_null: bool,
}

/// Feedback from executing a mutating statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteResult {
    /// Number of rows the statement affected.
    pub affected_rows: u64,
    /// Row id produced by the most recent successful INSERT on the
    /// connection, if any. Only meaningful directly after an INSERT.
    pub last_insert_id: Option<i64>,
}

/// Minimal relational database capability consumed by the engine.
///
/// Both the metadata store and the domain store are accessed exclusively
/// through this trait, so any backend that can list tables, describe
/// columns, and run parameterized statements can host either side.
///
/// Connection lifecycle, pooling, and timeouts are the implementation's
/// concern; the engine treats any failure as fatal for the current
/// operation and never retries.
pub trait RelationalStore: Send + Sync {
    /// Lists the store's table names, excluding the store's own internal
    /// bookkeeping tables, in a stable order.
    fn list_tables(&self) -> Result<Vec<String>>;

    /// Describes a table's columns in physical column order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoSuchTable`](crate::StoreError::NoSuchTable)
    /// if the table does not exist.
    fn describe_columns(&self, table: &str) -> Result<Vec<ColumnDescription>>;

    /// Runs a query, returning all result rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Runs a mutating statement, reporting the affected-row count and
    /// last-inserted row id.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecuteResult>;
}
