//! SELECT statement builder.

use data_domain_core::Value;

use crate::clause::{WhereClause, quote};
use crate::error::{BuildError, Result};
use crate::statement::Statement;

/// Builds a parameterized `SELECT` statement.
///
/// Clause order is fixed: projection, `FROM`, `WHERE` (if any), `LIMIT`
/// (if any); each clause contributes its parameters left to right. The
/// projection defaults to `*` unless [`column`](Select::column) is called.
///
/// # Examples
///
/// ```
/// use data_domain_sql::Select;
///
/// let stmt = Select::new()
///     .from("user")
///     .unwrap()
///     .equal("last_name", "Adams")
///     .unwrap()
///     .limit(10)
///     .build()
///     .unwrap();
///
/// assert_eq!(stmt.sql, "SELECT * FROM \"user\" WHERE \"last_name\" = ? LIMIT ?");
/// assert_eq!(stmt.params.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Select {
    from: Option<String>,
    projection: Vec<String>,
    restrictions: WhereClause,
    limit: Option<u64>,
}

impl Select {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source table. Must be called exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::FromAlreadySet`] if a source table was
    /// already set.
    pub fn from(mut self, table: impl Into<String>) -> Result<Self> {
        if self.from.is_some() {
            return Err(BuildError::FromAlreadySet);
        }
        self.from = Some(table.into());
        Ok(self)
    }

    /// Adds a column to the projection. Without any calls the projection
    /// renders as `*`.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.projection.push(column.into());
        self
    }

    /// Adds an equality restriction, AND-combined in call order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NullNotAccepted`] if the value is null; use
    /// [`equal_nullable`](Select::equal_nullable) to match nulls.
    pub fn equal(mut self, column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        self.restrictions = self.restrictions.equal(column, value)?;
        Ok(self)
    }

    /// Adds an equality restriction that admits null (rendered `IS NULL`).
    pub fn equal_nullable(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.restrictions = self.restrictions.equal_nullable(column, value);
        self
    }

    /// Caps the number of returned rows.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Renders the statement.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::FromNotSet`] if no source table was set.
    pub fn build(self) -> Result<Statement> {
        let table = self.from.ok_or(BuildError::FromNotSet)?;
        let mut sql = String::from("SELECT ");
        let mut params = Vec::new();

        if self.projection.is_empty() {
            sql.push('*');
        } else {
            let columns: Vec<String> = self.projection.iter().map(|c| quote(c)).collect();
            sql.push_str(&columns.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(&quote(&table));

        self.restrictions.render(&mut sql, &mut params);

        if let Some(n) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(n as i64));
        }

        Ok(Statement { sql, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_select() {
        let stmt = Select::new().from("user").unwrap().build().unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM \"user\"");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_projection_renders_quoted_columns() {
        let stmt = Select::new()
            .from("user")
            .unwrap()
            .column("id")
            .column("first_name")
            .build()
            .unwrap();
        assert_eq!(stmt.sql, "SELECT \"id\", \"first_name\" FROM \"user\"");
    }

    #[test]
    fn test_restrictions_and_limit_parameter_order() {
        let stmt = Select::new()
            .from("user")
            .unwrap()
            .equal("first_name", "Douglas")
            .unwrap()
            .equal("last_name", "Adams")
            .unwrap()
            .limit(5)
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM \"user\" WHERE \"first_name\" = ? AND \"last_name\" = ? LIMIT ?"
        );
        assert_eq!(
            stmt.params,
            vec![
                Value::Text("Douglas".into()),
                Value::Text("Adams".into()),
                Value::Integer(5),
            ]
        );
    }

    #[test]
    fn test_missing_from_is_an_error() {
        assert_eq!(Select::new().build().unwrap_err(), BuildError::FromNotSet);
    }

    #[test]
    fn test_from_twice_is_an_error() {
        let err = Select::new()
            .from("a")
            .unwrap()
            .from("b")
            .unwrap_err();
        assert_eq!(err, BuildError::FromAlreadySet);
    }

    #[test]
    fn test_null_restriction_rejected_by_default() {
        let err = Select::new()
            .from("user")
            .unwrap()
            .equal("middle_name", Value::Null)
            .unwrap_err();
        assert_eq!(err, BuildError::NullNotAccepted("middle_name".into()));
    }

    #[test]
    fn test_zero_limit_is_rendered() {
        let stmt = Select::new()
            .from("user")
            .unwrap()
            .limit(0)
            .build()
            .unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM \"user\" LIMIT ?");
        assert_eq!(stmt.params, vec![Value::Integer(0)]);
    }
}
