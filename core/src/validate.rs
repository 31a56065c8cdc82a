//! Entity metadata validation.
//!
//! Validates structural invariants of entity metadata, catching problems
//! such as missing fields, duplicate field codes, and empty identifiers
//! before they cause downstream issues. The engine validates entities
//! after introspection and after every metadata-store load, since the
//! metadata store is user-editable.
//!
//! # Examples
//!
//! ```
//! use data_domain_core::*;
//!
//! let entity = EntityMeta {
//!     id: None,
//!     code: "user".into(),
//!     name: "User".into(),
//!     table: "user".into(),
//!     title_format: TitleFormat::default(),
//!     fields: vec![],
//! };
//!
//! // Invalid: an entity must have at least one field
//! let errors = validate_entity(&entity);
//! assert!(errors.iter().any(|e| matches!(e, ValidationError::NoFields(_))));
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::meta::EntityMeta;

/// Entity metadata validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Entity code is empty or whitespace-only.
    #[error("entity code cannot be empty")]
    EmptyEntityCode,
    /// Entity table name is empty or whitespace-only.
    #[error("entity '{0}' has an empty table name")]
    EmptyTable(String),
    /// Entity declares no fields at all.
    #[error("entity '{0}' has no fields")]
    NoFields(String),
    /// A field code is empty or whitespace-only.
    #[error("entity '{0}' has a field with an empty code")]
    EmptyFieldCode(String),
    /// A field column name is empty or whitespace-only.
    #[error("field '{field}' of entity '{entity}' has an empty column name")]
    EmptyColumn {
        /// Owning entity code.
        entity: String,
        /// Offending field code.
        field: String,
    },
    /// Two fields in the same entity share a code.
    #[error("duplicate field code '{field}' in entity '{entity}'")]
    DuplicateFieldCode {
        /// Owning entity code.
        entity: String,
        /// Duplicated field code.
        field: String,
    },
    /// More than one field is marked as store-generated.
    #[error("entity '{0}' has more than one generated field")]
    MultipleGeneratedFields(String),
}

/// Validates an entity's structural invariants.
///
/// Checks for empty codes, an empty table name, missing fields, duplicate
/// field codes, empty column names, and multiple generated fields. An
/// entity with no identifier fields is valid — it simply cannot be
/// addressed by single-row operations.
///
/// # Examples
///
/// ```
/// use data_domain_core::*;
///
/// let entity = EntityMeta {
///     id: None,
///     code: "user".into(),
///     name: "User".into(),
///     table: "user".into(),
///     title_format: TitleFormat::default(),
///     fields: vec![FieldMeta {
///         id: None,
///         code: "id".into(),
///         column: "id".into(),
///         name: "Id".into(),
///         placeholder: None,
///         field_type: FieldType::Number,
///         identifier: true,
///         hidden: true,
///         mandatory: false,
///         generated: true,
///     }],
/// };
///
/// assert!(validate_entity(&entity).is_empty());
/// ```
pub fn validate_entity(entity: &EntityMeta) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if entity.code.trim().is_empty() {
        errors.push(ValidationError::EmptyEntityCode);
        return errors;
    }

    if entity.table.trim().is_empty() {
        errors.push(ValidationError::EmptyTable(entity.code.clone()));
    }

    if entity.fields.is_empty() {
        errors.push(ValidationError::NoFields(entity.code.clone()));
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut generated = 0usize;
    for field in &entity.fields {
        let code = field.code.trim();
        if code.is_empty() {
            errors.push(ValidationError::EmptyFieldCode(entity.code.clone()));
            continue;
        }
        if !seen.insert(code) {
            errors.push(ValidationError::DuplicateFieldCode {
                entity: entity.code.clone(),
                field: code.to_string(),
            });
        }
        if field.column.trim().is_empty() {
            errors.push(ValidationError::EmptyColumn {
                entity: entity.code.clone(),
                field: code.to_string(),
            });
        }
        if field.generated {
            generated += 1;
        }
    }

    if generated > 1 {
        errors.push(ValidationError::MultipleGeneratedFields(entity.code.clone()));
    }

    errors
}
