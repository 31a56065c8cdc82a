//! Persistence of entity metadata.
//!
//! The metadata store holds two tables — one row per entity type and one
//! row per field — created on demand with idempotent DDL. Table names are
//! prefixed with a configurable string so multiple isolated metadata sets
//! (or the metadata and domain stores themselves) can share one database.
//!
//! Entity and field rows are inserted once, when a table is first
//! introspected, and never updated or deleted by the engine; user
//! overrides happen by editing these tables directly and become visible
//! on the next cache reload.

use std::sync::Arc;

use data_domain_core::{EntityMeta, FieldMeta, FieldType, Record, TitleFormat, Value};
use data_domain_sql::{Insert, Select};
use data_domain_store::RelationalStore;

use crate::error::{EngineError, Result};

/// Validates that a table prefix contains only alphanumeric characters
/// and underscores. An empty prefix is allowed.
pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if !prefix.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(EngineError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Repository for entity metadata in a relational store.
///
/// All reads and writes go through the statement builders and the
/// [`RelationalStore`] adapter, so any backend can host the metadata.
/// The DDL itself targets SQLite (`AUTOINCREMENT` identities), matching
/// the reference deployment.
pub struct MetadataStore {
    store: Arc<dyn RelationalStore>,
    prefix: String,
}

/// Snapshot of the metadata store's state.
///
/// Returned by [`MetadataStore::status`].
#[derive(Debug, Clone)]
pub struct MetadataStatus {
    /// Whether the metadata tables exist.
    pub tables_exist: bool,
    /// Number of persisted entity types.
    pub entity_count: usize,
    /// Number of persisted fields across all entity types.
    pub field_count: usize,
}

impl MetadataStore {
    /// Creates a repository over the given store and table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPrefix`] if the prefix contains
    /// characters other than alphanumerics and underscores.
    pub fn new(store: Arc<dyn RelationalStore>, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self { store, prefix })
    }

    /// Name of the entity-type table, including the prefix.
    pub fn entity_table(&self) -> String {
        format!("{}entity_types", self.prefix)
    }

    /// Name of the field table, including the prefix.
    pub fn field_table(&self) -> String {
        format!("{}entity_type_fields", self.prefix)
    }

    /// Creates the metadata tables and index if they do not exist.
    ///
    /// Safe to call repeatedly.
    pub fn migrate(&self) -> Result<()> {
        let entity_table = self.entity_table();
        let field_table = self.field_table();

        self.store.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS \"{entity_table}\" (\n\
                 id INTEGER PRIMARY KEY AUTOINCREMENT,\n\
                 code TEXT NOT NULL UNIQUE,\n\
                 name TEXT NOT NULL,\n\
                 \"table\" TEXT NOT NULL UNIQUE,\n\
                 title_format_title TEXT NOT NULL,\n\
                 title_format_subtitle TEXT NOT NULL\n\
                 )"
            ),
            &[],
        )?;

        self.store.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS \"{field_table}\" (\n\
                 id INTEGER PRIMARY KEY AUTOINCREMENT,\n\
                 entity_type_id INTEGER NOT NULL,\n\
                 name TEXT NOT NULL,\n\
                 code TEXT NOT NULL,\n\
                 \"column\" TEXT NOT NULL,\n\
                 placeholder TEXT,\n\
                 field_type TEXT NOT NULL,\n\
                 is_identifier INTEGER NOT NULL DEFAULT 0,\n\
                 is_hidden INTEGER NOT NULL DEFAULT 0,\n\
                 is_mandatory INTEGER NOT NULL DEFAULT 0,\n\
                 is_generated INTEGER NOT NULL DEFAULT 0,\n\
                 UNIQUE (entity_type_id, code),\n\
                 FOREIGN KEY (entity_type_id) REFERENCES \"{entity_table}\"(id) ON DELETE CASCADE\n\
                 )"
            ),
            &[],
        )?;

        self.store.execute(
            &format!(
                "CREATE INDEX IF NOT EXISTS \"idx_{field_table}_entity\" \
                 ON \"{field_table}\"(entity_type_id)"
            ),
            &[],
        )?;

        Ok(())
    }

    /// Returns whether the tables exist and how many rows each holds.
    pub fn status(&self) -> Result<MetadataStatus> {
        let tables = self.store.list_tables()?;
        if !tables.contains(&self.entity_table()) {
            return Ok(MetadataStatus {
                tables_exist: false,
                entity_count: 0,
                field_count: 0,
            });
        }

        Ok(MetadataStatus {
            tables_exist: true,
            entity_count: self.count_rows(&self.entity_table())?,
            field_count: self.count_rows(&self.field_table())?,
        })
    }

    /// Loads every persisted entity with its fields.
    ///
    /// Entities are ordered by their store-assigned id, fields likewise —
    /// the order they were introspected and persisted in.
    pub fn load_all(&self) -> Result<Vec<EntityMeta>> {
        let stmt = Select::new().from(self.entity_table())?.build()?;
        let mut rows = self.store.query(&stmt.sql, &stmt.params)?;
        rows.sort_by_key(|row| int_or_zero(row, "id"));

        let mut entities = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = int(row, "id")?;
            entities.push(EntityMeta {
                id: Some(id),
                code: text(row, "code")?,
                name: text(row, "name")?,
                table: text(row, "table")?,
                title_format: TitleFormat {
                    title: text(row, "title_format_title")?,
                    subtitle: text(row, "title_format_subtitle")?,
                },
                fields: self.load_fields(id)?,
            });
        }
        Ok(entities)
    }

    fn load_fields(&self, entity_id: i64) -> Result<Vec<FieldMeta>> {
        let stmt = Select::new()
            .from(self.field_table())?
            .equal("entity_type_id", entity_id)?
            .build()?;
        let mut rows = self.store.query(&stmt.sql, &stmt.params)?;
        rows.sort_by_key(|row| int_or_zero(row, "id"));

        let mut fields = Vec::with_capacity(rows.len());
        for row in &rows {
            let type_text = text(row, "field_type")?;
            let field_type = FieldType::parse(&type_text).ok_or_else(|| {
                EngineError::CorruptMetadata(format!("unknown field type: {type_text}"))
            })?;
            fields.push(FieldMeta {
                id: Some(int(row, "id")?),
                code: text(row, "code")?,
                column: text(row, "column")?,
                name: text(row, "name")?,
                placeholder: opt_text(row, "placeholder")?,
                field_type,
                identifier: flag(row, "is_identifier")?,
                hidden: flag(row, "is_hidden")?,
                mandatory: flag(row, "is_mandatory")?,
                generated: flag(row, "is_generated")?,
            });
        }
        Ok(fields)
    }

    /// Persists one entity row, returning the assigned id.
    pub fn insert_entity(&self, entity: &EntityMeta) -> Result<i64> {
        let stmt = Insert::new()
            .into(self.entity_table())?
            .set("code", entity.code.as_str())
            .set("name", entity.name.as_str())
            .set("table", entity.table.as_str())
            .set("title_format_title", entity.title_format.title.as_str())
            .set(
                "title_format_subtitle",
                entity.title_format.subtitle.as_str(),
            )
            .build()?;
        let result = self.store.execute(&stmt.sql, &stmt.params)?;
        result.last_insert_id.ok_or(EngineError::IdentityNotReported)
    }

    /// Persists one field row for an entity, returning the assigned id.
    pub fn insert_field(&self, entity_id: i64, field: &FieldMeta) -> Result<i64> {
        let stmt = Insert::new()
            .into(self.field_table())?
            .set("entity_type_id", entity_id)
            .set("name", field.name.as_str())
            .set("code", field.code.as_str())
            .set("column", field.column.as_str())
            .set("placeholder", field.placeholder.clone())
            .set("field_type", field.field_type.as_str())
            .set("is_identifier", field.identifier as i64)
            .set("is_hidden", field.hidden as i64)
            .set("is_mandatory", field.mandatory as i64)
            .set("is_generated", field.generated as i64)
            .build()?;
        let result = self.store.execute(&stmt.sql, &stmt.params)?;
        result.last_insert_id.ok_or(EngineError::IdentityNotReported)
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let quoted = table.replace('"', "\"\"");
        let rows = self
            .store
            .query(&format!("SELECT COUNT(*) AS n FROM \"{quoted}\""), &[])?;
        match rows.first() {
            Some(row) => Ok(int(row, "n")? as usize),
            None => Ok(0),
        }
    }
}

fn text(row: &Record, key: &str) -> Result<String> {
    match row.get(key) {
        Some(Value::Text(s)) => Ok(s.clone()),
        other => Err(EngineError::CorruptMetadata(format!(
            "expected text in '{key}', got {other:?}"
        ))),
    }
}

fn opt_text(row: &Record, key: &str) -> Result<Option<String>> {
    match row.get(key) {
        Some(Value::Null) | None => Ok(None),
        Some(Value::Text(s)) => Ok(Some(s.clone())),
        other => Err(EngineError::CorruptMetadata(format!(
            "expected text or null in '{key}', got {other:?}"
        ))),
    }
}

fn int(row: &Record, key: &str) -> Result<i64> {
    match row.get(key) {
        Some(Value::Integer(n)) => Ok(*n),
        other => Err(EngineError::CorruptMetadata(format!(
            "expected integer in '{key}', got {other:?}"
        ))),
    }
}

fn int_or_zero(row: &Record, key: &str) -> i64 {
    match row.get(key) {
        Some(Value::Integer(n)) => *n,
        _ => 0,
    }
}

fn flag(row: &Record, key: &str) -> Result<bool> {
    Ok(int(row, key)? != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_domain_core::{derive_title_format, display_name};
    use data_domain_store::SqliteStore;

    fn metadata_store() -> MetadataStore {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        MetadataStore::new(store, "dd_").unwrap()
    }

    fn sample_entity() -> EntityMeta {
        let fields = vec![
            FieldMeta {
                id: None,
                code: "id".into(),
                column: "id".into(),
                name: display_name("id"),
                placeholder: None,
                field_type: FieldType::Number,
                identifier: true,
                hidden: true,
                mandatory: false,
                generated: true,
            },
            FieldMeta {
                id: None,
                code: "first_name".into(),
                column: "first_name".into(),
                name: display_name("first_name"),
                placeholder: Some("Douglas".into()),
                field_type: FieldType::String,
                identifier: false,
                hidden: false,
                mandatory: true,
                generated: false,
            },
        ];
        EntityMeta {
            id: None,
            code: "user".into(),
            name: display_name("user"),
            table: "user".into(),
            title_format: derive_title_format(&fields),
            fields,
        }
    }

    #[test]
    fn test_prefix_validation() {
        let store: Arc<dyn RelationalStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        assert!(MetadataStore::new(store.clone(), "dd_").is_ok());
        assert!(MetadataStore::new(store.clone(), "").is_ok());
        assert!(matches!(
            MetadataStore::new(store, "drop;--"),
            Err(EngineError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let metadata = metadata_store();
        metadata.migrate().unwrap();
        metadata.migrate().unwrap();
        let status = metadata.status().unwrap();
        assert!(status.tables_exist);
        assert_eq!(status.entity_count, 0);
    }

    #[test]
    fn test_status_before_migrate() {
        let metadata = metadata_store();
        let status = metadata.status().unwrap();
        assert!(!status.tables_exist);
    }

    #[test]
    fn test_persist_and_load_round_trip() {
        let metadata = metadata_store();
        metadata.migrate().unwrap();

        let mut entity = sample_entity();
        let entity_id = metadata.insert_entity(&entity).unwrap();
        entity.id = Some(entity_id);
        for field in &mut entity.fields {
            field.id = Some(metadata.insert_field(entity_id, field).unwrap());
        }

        let loaded = metadata.load_all().unwrap();
        assert_eq!(loaded, vec![entity]);
    }

    #[test]
    fn test_load_preserves_field_insertion_order() {
        let metadata = metadata_store();
        metadata.migrate().unwrap();

        let entity = sample_entity();
        let entity_id = metadata.insert_entity(&entity).unwrap();
        for field in &entity.fields {
            metadata.insert_field(entity_id, field).unwrap();
        }

        let loaded = metadata.load_all().unwrap();
        let codes: Vec<_> = loaded[0].fields.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["id", "first_name"]);
    }

    #[test]
    fn test_duplicate_entity_code_is_rejected_by_the_store() {
        let metadata = metadata_store();
        metadata.migrate().unwrap();

        let entity = sample_entity();
        metadata.insert_entity(&entity).unwrap();
        assert!(metadata.insert_entity(&entity).is_err());
    }
}
