//! Core entity metadata model and value primitives.
//!
//! This crate defines the foundational types for the metadata-driven data
//! access layer:
//!
//! - [`EntityMeta`] — one manageable entity (normally one table) with its
//!   external code, physical table name, display templates, and fields.
//! - [`FieldMeta`] — one column mapping with its external code, physical
//!   column, semantic [`FieldType`], and identifier/mandatory/generated
//!   flags.
//! - [`Value`] and [`Record`] — scalar values and insertion-ordered maps
//!   exchanged with the stores; an absent key means "no value supplied"
//!   while [`Value::Null`] is an explicit SQL `NULL`.
//!
//! Naming helpers ([`display_name`], [`derive_title_format`]) derive
//! human-readable labels and `#{code}` display templates from physical
//! snake_case identifiers.
//!
//! Validation ([`validate_entity`]) catches structural errors such as
//! entities without fields or duplicate field codes — relevant because the
//! metadata store is user-editable.
//!
//! # Example
//!
//! ```
//! use data_domain_core::*;
//!
//! let fields = vec![
//!     FieldMeta {
//!         id: None,
//!         code: "id".into(),
//!         column: "id".into(),
//!         name: display_name("id"),
//!         placeholder: None,
//!         field_type: FieldType::Number,
//!         identifier: true,
//!         hidden: true,
//!         mandatory: false,
//!         generated: true,
//!     },
//!     FieldMeta {
//!         id: None,
//!         code: "first_name".into(),
//!         column: "first_name".into(),
//!         name: display_name("first_name"),
//!         placeholder: None,
//!         field_type: FieldType::String,
//!         identifier: false,
//!         hidden: false,
//!         mandatory: true,
//!         generated: false,
//!     },
//! ];
//!
//! let entity = EntityMeta {
//!     id: None,
//!     code: "user".into(),
//!     name: display_name("user"),
//!     table: "user".into(),
//!     title_format: derive_title_format(&fields),
//!     fields,
//! };
//!
//! assert_eq!(entity.name, "User");
//! assert_eq!(entity.title_format.title, "#{first_name}");
//! assert!(validate_entity(&entity).is_empty());
//! ```

mod meta;
mod naming;
mod validate;
mod value;

pub use meta::{EntityMeta, FieldMeta, FieldType, TitleFormat};
pub use naming::{derive_title_format, display_name};
pub use validate::{ValidationError, validate_entity};
pub use value::{DATE_FORMAT, DATETIME_FORMAT, Record, TIME_FORMAT, Value};
