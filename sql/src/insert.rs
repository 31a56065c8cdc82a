//! INSERT statement builder.

use data_domain_core::Value;

use crate::clause::quote;
use crate::error::{BuildError, Result};
use crate::statement::Statement;

/// Builds a parameterized `INSERT` statement.
///
/// Columns and values render in [`set`](Insert::set) call order; the
/// executing adapter reports the affected-row count and last-inserted id.
///
/// # Examples
///
/// ```
/// use data_domain_sql::Insert;
///
/// let stmt = Insert::new()
///     .into("user")
///     .unwrap()
///     .set("first_name", "Douglas")
///     .set("last_name", "Adams")
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     stmt.sql,
///     "INSERT INTO \"user\" (\"first_name\", \"last_name\") VALUES (?, ?)"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Insert {
    into: Option<String>,
    values: Vec<(String, Value)>,
}

impl Insert {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target table. Must be called exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::IntoAlreadySet`] if a target table was
    /// already set.
    pub fn into(mut self, table: impl Into<String>) -> Result<Self> {
        if self.into.is_some() {
            return Err(BuildError::IntoAlreadySet);
        }
        self.into = Some(table.into());
        Ok(self)
    }

    /// Adds a column assignment. Null is a legal value — it inserts an
    /// explicit `NULL`; omit the call entirely to let the store apply its
    /// column default.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push((column.into(), value.into()));
        self
    }

    /// Renders the statement.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::IntoNotSet`] if no target table was set, or
    /// [`BuildError::NoFieldsSet`] if no assignments were added.
    pub fn build(self) -> Result<Statement> {
        let table = self.into.ok_or(BuildError::IntoNotSet)?;
        if self.values.is_empty() {
            return Err(BuildError::NoFieldsSet);
        }

        let columns: Vec<String> = self.values.iter().map(|(c, _)| quote(c)).collect();
        let placeholders: Vec<&str> = self.values.iter().map(|_| "?").collect();
        let params: Vec<Value> = self.values.into_iter().map(|(_, v)| v).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote(&table),
            columns.join(", "),
            placeholders.join(", ")
        );

        Ok(Statement { sql, params })
    }
}
