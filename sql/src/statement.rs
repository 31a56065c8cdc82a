//! The rendered form of a built statement.

use data_domain_core::Value;

/// A rendered SQL statement with its ordered parameters.
///
/// Placeholders are positional (`?`); `params` supplies them left to
/// right. Execution is deferred to the store adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The statement text with `?` placeholders.
    pub sql: String,
    /// Parameter values in placeholder order.
    pub params: Vec<Value>,
}
