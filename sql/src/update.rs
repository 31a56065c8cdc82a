//! UPDATE statement builder.

use data_domain_core::Value;

use crate::clause::{SetClause, WhereClause, quote};
use crate::error::{BuildError, Result};
use crate::statement::Statement;

/// Builds a parameterized `UPDATE` statement.
///
/// Requires a target table, at least one SET attribution, and at least one
/// WHERE restriction — an unrestricted update is always a usage error.
/// Parameters render SET-values first, then WHERE-values.
///
/// # Examples
///
/// ```
/// use data_domain_sql::Update;
///
/// let stmt = Update::new()
///     .table("user")
///     .unwrap()
///     .set("first_name", "Rick")
///     .equal("id", 1)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(stmt.sql, "UPDATE \"user\" SET \"first_name\" = ? WHERE \"id\" = ?");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Update {
    table: Option<String>,
    attributions: SetClause,
    restrictions: WhereClause,
}

impl Update {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target table. Must be called exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::TableAlreadySet`] if a target table was
    /// already set.
    pub fn table(mut self, table: impl Into<String>) -> Result<Self> {
        if self.table.is_some() {
            return Err(BuildError::TableAlreadySet);
        }
        self.table = Some(table.into());
        Ok(self)
    }

    /// Adds a SET attribution. Null is a legal value — it sets the column
    /// to `NULL`.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributions = self.attributions.set(column, value);
        self
    }

    /// Adds an equality restriction, AND-combined in call order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NullNotAccepted`] if the value is null; use
    /// [`equal_nullable`](Update::equal_nullable) to match nulls.
    pub fn equal(mut self, column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        self.restrictions = self.restrictions.equal(column, value)?;
        Ok(self)
    }

    /// Adds an equality restriction that admits null (rendered `IS NULL`).
    pub fn equal_nullable(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.restrictions = self.restrictions.equal_nullable(column, value);
        self
    }

    /// Renders the statement.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::TableNotSet`], [`BuildError::NoAttributionsSet`],
    /// or [`BuildError::NoWhereRestrictions`] when the corresponding clause
    /// is missing.
    pub fn build(self) -> Result<Statement> {
        let table = self.table.ok_or(BuildError::TableNotSet)?;
        if self.attributions.is_empty() {
            return Err(BuildError::NoAttributionsSet);
        }
        if self.restrictions.is_empty() {
            return Err(BuildError::NoWhereRestrictions);
        }

        let mut sql = format!("UPDATE {}", quote(&table));
        let mut params = Vec::new();
        self.attributions.render(&mut sql, &mut params);
        self.restrictions.render(&mut sql, &mut params);

        Ok(Statement { sql, params })
    }
}
