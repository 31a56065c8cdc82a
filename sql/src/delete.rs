//! DELETE statement builder.

use data_domain_core::Value;

use crate::clause::{WhereClause, quote};
use crate::error::{BuildError, Result};
use crate::statement::Statement;

/// Builds a parameterized `DELETE` statement.
///
/// Requires a target table and at least one WHERE restriction — an
/// unrestricted delete is always a usage error. Parameters are
/// WHERE-values only.
///
/// # Examples
///
/// ```
/// use data_domain_sql::Delete;
///
/// let stmt = Delete::new()
///     .from("user")
///     .unwrap()
///     .equal("id", 1)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(stmt.sql, "DELETE FROM \"user\" WHERE \"id\" = ?");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Delete {
    from: Option<String>,
    restrictions: WhereClause,
}

impl Delete {
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
    pub fn from(mut self, table: impl Into<String>) -> Result<Self> {
        if self.from.is_some() {
            return Err(BuildError::TableAlreadySet);
        }
        self.from = Some(table.into());
        Ok(self)
    }

    /// Adds an equality restriction, AND-combined in call order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NullNotAccepted`] if the value is null; use
    /// [`equal_nullable`](Delete::equal_nullable) to match nulls.
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
    /// Returns [`BuildError::TableNotSet`] if no target table was set, or
    /// [`BuildError::NoWhereRestrictions`] if the WHERE clause is empty.
    pub fn build(self) -> Result<Statement> {
        let table = self.from.ok_or(BuildError::TableNotSet)?;
        if self.restrictions.is_empty() {
            return Err(BuildError::NoWhereRestrictions);
        }

        let mut sql = format!("DELETE FROM {}", quote(&table));
        let mut params = Vec::new();
        self.restrictions.render(&mut sql, &mut params);

        Ok(Statement { sql, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_with_composite_restriction() {
        let stmt = Delete::new()
            .from("order_line")
            .unwrap()
            .equal("order_id", 7)
            .unwrap()
            .equal("line_no", 2)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "DELETE FROM \"order_line\" WHERE \"order_id\" = ? AND \"line_no\" = ?"
        );
        assert_eq!(stmt.params, vec![Value::Integer(7), Value::Integer(2)]);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let err = Delete::new().equal("id", 1).unwrap().build().unwrap_err();
        assert_eq!(err, BuildError::TableNotSet);
    }

    #[test]
    fn test_no_restrictions_is_an_error() {
        let err = Delete::new().from("user").unwrap().build().unwrap_err();
        assert_eq!(err, BuildError::NoWhereRestrictions);
    }
}
