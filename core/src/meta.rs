//! Entity metadata type definitions.
//!
//! This module defines the data model produced by table introspection and
//! persisted in the metadata store. The types are designed for serialization
//! with [`serde`] so an outer transport layer can expose them directly.

use serde::{Deserialize, Serialize};

/// Semantic type of a field, decoupled from the column's native type.
///
/// Introspection maps native column types onto this enum (integer-like
/// columns become [`Number`](FieldType::Number), text-like columns become
/// [`String`](FieldType::String)). The temporal variants are never inferred
/// but may be assigned by editing the metadata store directly; row decoding
/// honors all five.
///
/// # Examples
///
/// ```
/// use data_domain_core::FieldType;
///
/// assert_eq!(FieldType::Number.as_str(), "number");
/// assert_eq!(FieldType::parse("datetime"), Some(FieldType::DateTime));
/// assert_eq!(FieldType::parse("blob"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Textual value.
    String,
    /// Integer or floating-point value.
    Number,
    /// Calendar date (`YYYY-MM-DD`).
    Date,
    /// Date and time of day (`YYYY-MM-DD HH:MM:SS`).
    DateTime,
    /// Time of day (`HH:MM:SS`).
    Time,
}

impl FieldType {
    /// Returns the storage string for this type, as persisted in the
    /// metadata store.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Time => "time",
        }
    }

    /// Parses a storage string back into a [`FieldType`].
    ///
    /// Returns `None` for unknown strings; the caller decides how to
    /// surface the failure.
    pub fn parse(s: &str) -> Option<FieldType> {
        match s {
            "string" => Some(FieldType::String),
            "number" => Some(FieldType::Number),
            "date" => Some(FieldType::Date),
            "datetime" => Some(FieldType::DateTime),
            "time" => Some(FieldType::Time),
            _ => None,
        }
    }
}

/// Display templates for rendering an entity row as a title and subtitle.
///
/// Templates reference field codes as `#{field_code}`. Expansion is the
/// caller's concern; the engine only derives and stores the templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TitleFormat {
    /// Template for the one-line title (first 2 non-hidden fields).
    pub title: String,
    /// Template for the subtitle (first 3 non-hidden fields).
    pub subtitle: String,
}

/// Describes one column mapping of an entity.
///
/// `code` is the external, user-renameable key under which the field is
/// exposed; `column` is the physical column name and is immutable once
/// introspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Identity assigned by the metadata store; `None` before persistence.
    pub id: Option<i64>,
    /// External field identifier, unique within the owning entity.
    pub code: String,
    /// Physical column name in the domain store.
    pub column: String,
    /// Human-readable label, derived from the column name.
    pub name: String,
    /// Example value for UI hinting, sampled from an existing row at
    /// introspection time. `None` for identifier fields or empty tables.
    pub placeholder: Option<String>,
    /// Semantic type driving row decoding.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the column is (part of) the table's primary key.
    pub identifier: bool,
    /// Whether the field is hidden from end users by default.
    pub hidden: bool,
    /// Whether the column is declared NOT NULL.
    pub mandatory: bool,
    /// Whether the store produces the value itself on insertion.
    pub generated: bool,
}

/// Describes one manageable entity, normally backed by one table.
///
/// `code` is the external, user-renameable lookup key; `table` is the
/// physical table name and is immutable once introspected.
///
/// # Examples
///
/// ```
/// use data_domain_core::{EntityMeta, FieldMeta, FieldType, TitleFormat};
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
/// assert!(entity.field("id").is_some());
/// assert_eq!(entity.identifier_fields().count(), 1);
/// assert_eq!(entity.generated_field().map(|f| f.code.as_str()), Some("id"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMeta {
    /// Identity assigned by the metadata store; `None` before persistence.
    pub id: Option<i64>,
    /// External entity identifier, unique across the metadata store.
    pub code: String,
    /// Human-readable label, derived from the table name.
    pub name: String,
    /// Physical table name in the domain store.
    pub table: String,
    /// Display templates derived from the leading non-hidden fields.
    pub title_format: TitleFormat,
    /// Ordered fields, unique by `code` within the entity.
    pub fields: Vec<FieldMeta>,
}

impl EntityMeta {
    /// Looks up a field by its external code.
    pub fn field(&self, code: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.code == code)
    }

    /// Iterates the fields forming the primary key, in declaration order.
    pub fn identifier_fields(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter().filter(|f| f.identifier)
    }

    /// Returns the store-generated field, if the entity has one.
    ///
    /// At most one field can be generated (a single auto-incrementing
    /// numeric identifier).
    pub fn generated_field(&self) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.generated)
    }

    /// Iterates the fields surfaced to end users, in declaration order.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter().filter(|f| !f.hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(code: &str, identifier: bool) -> FieldMeta {
        FieldMeta {
            id: None,
            code: code.to_string(),
            column: code.to_string(),
            name: code.to_string(),
            placeholder: None,
            field_type: FieldType::String,
            identifier,
            hidden: identifier,
            mandatory: false,
            generated: false,
        }
    }

    #[test]
    fn test_field_type_round_trips_through_storage_string() {
        for ty in [
            FieldType::String,
            FieldType::Number,
            FieldType::Date,
            FieldType::DateTime,
            FieldType::Time,
        ] {
            assert_eq!(FieldType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(FieldType::parse("decimal"), None);
    }

    #[test]
    fn test_field_lookup_by_code() {
        let entity = EntityMeta {
            id: None,
            code: "user".into(),
            name: "User".into(),
            table: "user".into(),
            title_format: TitleFormat::default(),
            fields: vec![field("id", true), field("first_name", false)],
        };

        assert_eq!(entity.field("first_name").unwrap().code, "first_name");
        assert!(entity.field("missing").is_none());
        assert_eq!(entity.identifier_fields().count(), 1);
        assert_eq!(entity.visible_fields().count(), 1);
    }

    #[test]
    fn test_field_type_serializes_lowercase() {
        let json = serde_json::to_string(&FieldType::DateTime).unwrap();
        assert_eq!(json, "\"datetime\"");
        let back: FieldType = serde_json::from_str("\"number\"").unwrap();
        assert_eq!(back, FieldType::Number);
    }
}
