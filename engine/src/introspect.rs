//! Table introspection.
//!
//! Turns a physical table description into entity metadata: semantic
//! types are inferred from native column types, identifier columns come
//! from the primary-key declaration, and a single sampled row supplies
//! placeholder values for UI hinting.
//!
//! The native-to-semantic map is deliberately narrow — integer-like
//! columns become numbers, text-like columns become strings, and any
//! other native type aborts introspection of the table. A best-effort
//! fallback would make the inferred model untrustworthy.

use data_domain_core::{EntityMeta, FieldMeta, FieldType, Value, derive_title_format, display_name};
use data_domain_sql::Select;
use data_domain_store::{RelationalStore, Row};
use tracing::debug;

use crate::error::{EngineError, Result};

/// Builds entity metadata for one unmapped table.
///
/// The returned metadata carries no store identities (`id` is `None`
/// throughout); persisting it is the caller's concern.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedColumnType`] if any column's native
/// type has no semantic mapping.
pub(crate) fn introspect_table(store: &dyn RelationalStore, table: &str) -> Result<EntityMeta> {
    let columns = store.describe_columns(table)?;
    let sample = sample_row(store, table)?;
    debug!(
        table,
        columns = columns.len(),
        sampled = sample.is_some(),
        "introspecting table"
    );

    let mut fields = Vec::with_capacity(columns.len());
    for column in &columns {
        let field_type = map_native_type(table, &column.name, &column.native_type)?;
        let identifier = column.primary_key;
        let placeholder = if identifier {
            None
        } else {
            sample
                .as_ref()
                .and_then(|row| row.get(&column.name))
                .filter(|value| !value.is_null())
                .map(Value::to_string)
        };

        fields.push(FieldMeta {
            id: None,
            code: column.name.clone(),
            column: column.name.clone(),
            name: display_name(&column.name),
            placeholder,
            field_type,
            identifier,
            hidden: identifier,
            mandatory: column.not_null,
            generated: false,
        });
    }

    // A single numeric primary key is assumed to be store-generated
    // (auto-increment); composite or textual keys are caller-supplied.
    let mut identifier_indexes = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.identifier)
        .map(|(i, _)| i);
    if let (Some(index), None) = (identifier_indexes.next(), identifier_indexes.next()) {
        if fields[index].field_type == FieldType::Number {
            fields[index].generated = true;
        }
    }

    let title_format = derive_title_format(&fields);
    Ok(EntityMeta {
        id: None,
        code: table.to_string(),
        name: display_name(table),
        table: table.to_string(),
        title_format,
        fields,
    })
}

/// Fetches at most one existing row for placeholder sampling.
fn sample_row(store: &dyn RelationalStore, table: &str) -> Result<Option<Row>> {
    let stmt = Select::new().from(table)?.limit(1).build()?;
    Ok(store.query(&stmt.sql, &stmt.params)?.into_iter().next())
}

/// Maps a native column type onto a semantic field type.
///
/// Matching follows SQLite's affinity rules for the two supported
/// families: any type name containing `INT` is integer-like, and any
/// containing `CHAR`, `TEXT`, or `CLOB` is text-like.
fn map_native_type(table: &str, column: &str, native_type: &str) -> Result<FieldType> {
    let upper = native_type.to_ascii_uppercase();
    if upper.contains("INT") {
        Ok(FieldType::Number)
    } else if upper.contains("CHAR") || upper.contains("TEXT") || upper.contains("CLOB") {
        Ok(FieldType::String)
    } else {
        Err(EngineError::UnsupportedColumnType {
            table: table.to_string(),
            column: column.to_string(),
            native_type: native_type.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_domain_store::SqliteStore;

    fn domain_store(ddl: &str) -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.execute(ddl, &[]).unwrap();
        store
    }

    #[test]
    fn test_introspects_user_table() {
        let store = domain_store(
            "CREATE TABLE user (\
             id INTEGER PRIMARY KEY AUTOINCREMENT, \
             first_name TEXT NOT NULL, \
             middle_name TEXT, \
             last_name TEXT NOT NULL, \
             birth_date TEXT)",
        );

        let entity = introspect_table(&store, "user").unwrap();
        assert_eq!(entity.code, "user");
        assert_eq!(entity.name, "User");
        assert_eq!(entity.table, "user");
        assert!(entity.id.is_none());

        let codes: Vec<_> = entity.fields.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["id", "first_name", "middle_name", "last_name", "birth_date"]
        );

        let id = entity.field("id").unwrap();
        assert!(id.identifier);
        assert!(id.hidden);
        assert!(id.generated);
        assert_eq!(id.field_type, FieldType::Number);

        let first_name = entity.field("first_name").unwrap();
        assert!(!first_name.identifier);
        assert!(!first_name.hidden);
        assert!(first_name.mandatory);
        assert_eq!(first_name.field_type, FieldType::String);

        assert!(!entity.field("middle_name").unwrap().mandatory);

        assert_eq!(entity.title_format.title, "#{first_name} #{middle_name}");
        assert_eq!(
            entity.title_format.subtitle,
            "#{first_name} #{middle_name} #{last_name}"
        );
    }

    #[test]
    fn test_placeholders_come_from_sampled_row() {
        let store = domain_store(
            "CREATE TABLE user (\
             id INTEGER PRIMARY KEY AUTOINCREMENT, \
             first_name TEXT NOT NULL, \
             middle_name TEXT)",
        );
        store
            .execute(
                "INSERT INTO user (first_name, middle_name) VALUES (?, ?)",
                &[Value::from("Douglas"), Value::Null],
            )
            .unwrap();

        let entity = introspect_table(&store, "user").unwrap();
        // Identifier fields never get a placeholder
        assert_eq!(entity.field("id").unwrap().placeholder, None);
        assert_eq!(
            entity.field("first_name").unwrap().placeholder,
            Some("Douglas".into())
        );
        // Null sample values yield no placeholder
        assert_eq!(entity.field("middle_name").unwrap().placeholder, None);
    }

    #[test]
    fn test_empty_table_yields_no_placeholders() {
        let store = domain_store(
            "CREATE TABLE user (id INTEGER PRIMARY KEY, first_name TEXT NOT NULL)",
        );
        let entity = introspect_table(&store, "user").unwrap();
        assert!(entity.fields.iter().all(|f| f.placeholder.is_none()));
    }

    #[test]
    fn test_unsupported_native_type_fails_hard() {
        let store = domain_store("CREATE TABLE reading (id INTEGER PRIMARY KEY, value REAL)");
        let err = introspect_table(&store, "reading").unwrap_err();
        match err {
            EngineError::UnsupportedColumnType {
                table,
                column,
                native_type,
            } => {
                assert_eq!(table, "reading");
                assert_eq!(column, "value");
                assert_eq!(native_type, "REAL");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_composite_key_is_not_generated() {
        let store = domain_store(
            "CREATE TABLE order_line (\
             order_id INTEGER NOT NULL, \
             line_no INTEGER NOT NULL, \
             sku TEXT NOT NULL, \
             PRIMARY KEY (order_id, line_no))",
        );
        let entity = introspect_table(&store, "order_line").unwrap();
        assert_eq!(entity.identifier_fields().count(), 2);
        assert!(entity.generated_field().is_none());
    }

    #[test]
    fn test_single_text_key_is_not_generated() {
        let store = domain_store(
            "CREATE TABLE setting (key TEXT PRIMARY KEY, value TEXT)",
        );
        let entity = introspect_table(&store, "setting").unwrap();
        assert!(entity.generated_field().is_none());
    }

    #[test]
    fn test_varchar_maps_to_string() {
        let store = domain_store(
            "CREATE TABLE label (id INTEGER PRIMARY KEY, caption VARCHAR(80) NOT NULL)",
        );
        let entity = introspect_table(&store, "label").unwrap();
        assert_eq!(
            entity.field("caption").unwrap().field_type,
            FieldType::String
        );
    }
}
