//! Shared clause builders for WHERE restrictions and SET attributions.
//!
//! Both builders are immutable in spirit: every method consumes `self` and
//! returns the extended clause, so a statement under construction is always
//! a plain value with no shared mutable state.

use data_domain_core::Value;

use crate::error::{BuildError, Result};

/// Renders an identifier as a double-quoted literal.
///
/// Embedded double quotes are doubled. Identifier *content* is not
/// validated: callers must only pass identifiers sourced from trusted
/// metadata, never raw user input. This is the sole injection boundary of
/// the builder.
pub(crate) fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

#[derive(Debug, Clone)]
enum Restriction {
    Equal { column: String, value: Value },
    IsNull { column: String },
}

/// An ordered conjunction of equality restrictions.
///
/// Restrictions combine with `AND` in call order. A null value is rejected
/// by [`equal`](WhereClause::equal) and only admitted through
/// [`equal_nullable`](WhereClause::equal_nullable), which renders the
/// restriction as `IS NULL` (an `= NULL` comparison would never match).
///
/// # Examples
///
/// ```
/// use data_domain_sql::WhereClause;
/// use data_domain_core::Value;
///
/// let clause = WhereClause::new()
///     .equal("last_name", "Adams")
///     .unwrap()
///     .equal_nullable("middle_name", Value::Null);
/// assert_eq!(clause.len(), 2);
///
/// // Null through the strict method is an error
/// assert!(WhereClause::new().equal("x", Value::Null).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    restrictions: Vec<Restriction>,
}

impl WhereClause {
    /// Creates an empty clause.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality restriction on a column.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NullNotAccepted`] naming the column if the
    /// value is [`Value::Null`].
    pub fn equal(mut self, column: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let column = column.into();
        let value = value.into();
        if value.is_null() {
            return Err(BuildError::NullNotAccepted(column));
        }
        self.restrictions.push(Restriction::Equal { column, value });
        Ok(self)
    }

    /// Adds an equality restriction that admits null.
    ///
    /// A null value renders as `column IS NULL`; any other value behaves
    /// like [`equal`](Self::equal).
    pub fn equal_nullable(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let column = column.into();
        let value = value.into();
        if value.is_null() {
            self.restrictions.push(Restriction::IsNull { column });
        } else {
            self.restrictions.push(Restriction::Equal { column, value });
        }
        self
    }

    /// Returns the number of restrictions.
    pub fn len(&self) -> usize {
        self.restrictions.len()
    }

    /// Returns `true` if no restrictions were added.
    pub fn is_empty(&self) -> bool {
        self.restrictions.is_empty()
    }

    /// Renders the clause as `WHERE …` and appends its parameters.
    ///
    /// Renders nothing for an empty clause.
    pub(crate) fn render(&self, sql: &mut String, params: &mut Vec<Value>) {
        for (i, restriction) in self.restrictions.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            match restriction {
                Restriction::Equal { column, value } => {
                    sql.push_str(&quote(column));
                    sql.push_str(" = ?");
                    params.push(value.clone());
                }
                Restriction::IsNull { column } => {
                    sql.push_str(&quote(column));
                    sql.push_str(" IS NULL");
                }
            }
        }
    }
}

/// An ordered sequence of SET attributions.
///
/// # Examples
///
/// ```
/// use data_domain_sql::SetClause;
///
/// let clause = SetClause::new().set("first_name", "Rick").set("age", 42);
/// assert_eq!(clause.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SetClause {
    assignments: Vec<(String, Value)>,
}

impl SetClause {
    /// Creates an empty clause.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribution. Null is a legal value here — it means
    /// "set the column to NULL".
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    /// Returns the number of attributions.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns `true` if no attributions were added.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Renders the clause as `SET …` and appends its parameters.
    pub(crate) fn render(&self, sql: &mut String, params: &mut Vec<Value>) {
        for (i, (column, value)) in self.assignments.iter().enumerate() {
            sql.push_str(if i == 0 { " SET " } else { ", " });
            sql.push_str(&quote(column));
            sql.push_str(" = ?");
            params.push(value.clone());
        }
    }
}
