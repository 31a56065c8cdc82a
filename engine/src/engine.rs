//! The data domain engine.
//!
//! Orchestrates the full metadata lifecycle — load persisted entity
//! metadata, discover and introspect unmapped domain tables, persist the
//! inferred metadata — and serves generic create/read/update/delete
//! against the domain store using the statement builders and that
//! metadata.

use std::collections::HashSet;
use std::sync::Arc;

use data_domain_core::{EntityMeta, Record, Value, validate_entity};
use data_domain_sql::{Delete, Insert, Select, Update};
use data_domain_store::{RelationalStore, Row};
use tracing::{debug, info};

use crate::cache::SingleFlight;
use crate::decode::decode_field;
use crate::error::{EngineError, Result};
use crate::introspect::introspect_table;
use crate::metadata::MetadataStore;

/// Configuration for a [`DataDomain`] instance.
///
/// # Examples
///
/// ```
/// use data_domain_engine::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.metadata_prefix, "dd_");
/// assert!(config.excluded_tables.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Prefix for the metadata tables. Alphanumerics and underscores
    /// only; may be empty.
    pub metadata_prefix: String,
    /// Domain-store tables to ignore during discovery, in addition to
    /// the metadata tables themselves.
    pub excluded_tables: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            metadata_prefix: "dd_".to_string(),
            excluded_tables: Vec::new(),
        }
    }
}

/// Options for [`DataDomain::read`].
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Identifier values keyed by field code. When present, every
    /// identifier field of the entity must have a value here;
    /// non-identifier keys are ignored.
    pub ids: Option<Record>,
    /// Maximum number of rows to return.
    pub limit: Option<u64>,
}

/// Metadata-driven data access over a pair of relational stores.
///
/// One instance serves one (metadata store, domain store) pair. Entity
/// metadata is loaded lazily on first access, memoized for the engine's
/// lifetime, and refreshed only through
/// [`invalidate_entity_types`](DataDomain::invalidate_entity_types) — at
/// most one introspect-and-persist sequence runs at a time, and
/// concurrent first callers observe the single in-flight result.
///
/// Mutations are not wrapped in transactions with their verifying
/// read-back; the engine relies on the store's own concurrency control
/// and enforces the single-row invariant after the fact.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use data_domain_core::{Record, Value};
/// use data_domain_engine::{DataDomain, ReadOptions};
/// use data_domain_store::{RelationalStore, SqliteStore};
///
/// let metadata = Arc::new(SqliteStore::open_in_memory().unwrap());
/// let domain = Arc::new(SqliteStore::open_in_memory().unwrap());
/// domain
///     .execute(
///         "CREATE TABLE user (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)",
///         &[],
///     )
///     .unwrap();
///
/// let engine = DataDomain::new(metadata, domain).unwrap();
///
/// let mut data = Record::new();
/// data.insert("name".to_string(), Value::from("Ada"));
/// let created = engine.create("user", data).unwrap();
/// assert_eq!(created["id"], Value::Integer(1));
///
/// let rows = engine.read("user", ReadOptions::default()).unwrap();
/// assert_eq!(rows.len(), 1);
/// ```
pub struct DataDomain {
    metadata: MetadataStore,
    domain: Arc<dyn RelationalStore>,
    cache: SingleFlight<Arc<Vec<EntityMeta>>>,
    excluded_tables: Vec<String>,
}

impl DataDomain {
    /// Creates an engine with the default configuration, ensuring the
    /// metadata tables exist.
    pub fn new(
        metadata_store: Arc<dyn RelationalStore>,
        domain_store: Arc<dyn RelationalStore>,
    ) -> Result<Self> {
        Self::with_config(metadata_store, domain_store, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration, ensuring the
    /// metadata tables exist.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPrefix`] for a bad metadata prefix,
    /// or a store error if the metadata DDL fails.
    pub fn with_config(
        metadata_store: Arc<dyn RelationalStore>,
        domain_store: Arc<dyn RelationalStore>,
        config: EngineConfig,
    ) -> Result<Self> {
        let metadata = MetadataStore::new(metadata_store, config.metadata_prefix)?;
        metadata.migrate()?;

        let mut excluded_tables = config.excluded_tables;
        // The metadata tables are never domain entities, even when both
        // stores share one database.
        excluded_tables.push(metadata.entity_table());
        excluded_tables.push(metadata.field_table());

        Ok(Self {
            metadata,
            domain: domain_store,
            cache: SingleFlight::new(),
            excluded_tables,
        })
    }

    /// Returns all entity metadata, introspecting and persisting any
    /// domain tables not yet mapped.
    ///
    /// Mapped entities come first in metadata-store order, then newly
    /// introspected entities in table-listing order. The result is
    /// cached until [`invalidate_entity_types`](Self::invalidate_entity_types).
    pub fn entity_types(&self) -> Result<Vec<EntityMeta>> {
        Ok(self.cached_entity_types()?.as_ref().clone())
    }

    /// Looks up one entity by its external code.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EntityTypeNotFound`] naming the code.
    pub fn entity_type(&self, code: &str) -> Result<EntityMeta> {
        self.cached_entity_types()?
            .iter()
            .find(|e| e.code == code)
            .cloned()
            .ok_or_else(|| EngineError::EntityTypeNotFound(code.to_string()))
    }

    /// Drops the cached entity metadata.
    ///
    /// The next access reloads from the metadata store, picking up
    /// external edits such as renamed codes.
    pub fn invalidate_entity_types(&self) {
        self.cache.invalidate();
    }

    /// Creates one entity row from data keyed by field code.
    ///
    /// Unknown keys are rejected; mandatory (non-generated) fields must
    /// carry a non-null value; absent keys let the store apply its
    /// column default. When the entity has a store-generated field, the
    /// reported last-inserted id is merged into the returned data under
    /// that field's code. The returned data is otherwise the input,
    /// not re-read from the store.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownFields`] listing every unmatched key, or
    /// [`EngineError::MissingMandatoryField`] naming the first mandatory
    /// field without a value.
    pub fn create(&self, entity_type_code: &str, data: Record) -> Result<Record> {
        let entity = self.entity_type(entity_type_code)?;

        let unknown: Vec<String> = data
            .keys()
            .filter(|key| entity.field(key).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(EngineError::UnknownFields(unknown));
        }

        let mut insert = Insert::new().into(entity.table.as_str())?;
        for field in &entity.fields {
            let value = data.get(&field.code);
            let missing = matches!(value, None | Some(Value::Null));
            if missing && field.mandatory && !field.generated {
                return Err(EngineError::MissingMandatoryField(field.code.clone()));
            }
            if let Some(value) = value {
                insert = insert.set(field.column.as_str(), value.clone());
            }
        }

        let stmt = insert.build()?;
        let result = self.domain.execute(&stmt.sql, &stmt.params)?;
        debug!(
            entity = entity_type_code,
            affected = result.affected_rows,
            "created entity row"
        );

        let mut created = data;
        if let (Some(generated), Some(id)) = (entity.generated_field(), result.last_insert_id) {
            created.insert(generated.code.clone(), Value::Integer(id));
        }
        Ok(created)
    }

    /// Reads entity rows, optionally filtered by identifier values and
    /// capped by a row limit.
    ///
    /// Every returned record carries exactly the entity's field codes as
    /// keys, in field declaration order, with values decoded per each
    /// field's semantic type.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingIdentifierField`] if `ids` is given
    /// but lacks a value for some identifier field.
    pub fn read(&self, entity_type_code: &str, options: ReadOptions) -> Result<Vec<Record>> {
        let entity = self.entity_type(entity_type_code)?;

        let mut select = Select::new().from(entity.table.as_str())?;
        if let Some(ids) = &options.ids {
            for field in entity.identifier_fields() {
                let value = ids
                    .get(&field.code)
                    .ok_or_else(|| EngineError::MissingIdentifierField(field.code.clone()))?;
                select = select.equal(field.column.as_str(), value.clone())?;
            }
        }
        if let Some(limit) = options.limit {
            select = select.limit(limit);
        }

        let stmt = select.build()?;
        let rows = self.domain.query(&stmt.sql, &stmt.params)?;
        rows.iter().map(|row| decode_row(&entity, row)).collect()
    }

    /// Updates one entity row addressed by its identifier values.
    ///
    /// Every identifier field must have a defined (non-null) value in
    /// `data`; those become the WHERE restrictions. Every non-identifier
    /// field present in `data` becomes a SET attribution — an explicit
    /// null sets the column to NULL, an absent key leaves it unchanged.
    ///
    /// The store must report exactly one affected row; the updated row
    /// is then re-read by the same identifiers and returned. The update
    /// and the verifying read are not one transaction, so a concurrent
    /// mutation can be visible in the returned row.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingIdentifierValue`],
    /// [`EngineError::UnexpectedAffectedRowCount`], or
    /// [`EngineError::UnexpectedReadCount`].
    pub fn update(&self, entity_type_code: &str, data: Record) -> Result<Record> {
        let entity = self.entity_type(entity_type_code)?;

        let mut update = Update::new().table(entity.table.as_str())?;
        for field in entity.identifier_fields() {
            update = update.equal(
                field.column.as_str(),
                identifier_value(&data, &field.code)?,
            )?;
        }
        for field in entity.fields.iter().filter(|f| !f.identifier) {
            if let Some(value) = data.get(&field.code) {
                update = update.set(field.column.as_str(), value.clone());
            }
        }

        let stmt = update.build()?;
        let result = self.domain.execute(&stmt.sql, &stmt.params)?;
        if result.affected_rows != 1 {
            return Err(EngineError::UnexpectedAffectedRowCount(result.affected_rows));
        }

        let mut rows = self.read(
            entity_type_code,
            ReadOptions {
                ids: Some(data),
                limit: None,
            },
        )?;
        if rows.len() != 1 {
            return Err(EngineError::UnexpectedReadCount(rows.len()));
        }
        Ok(rows.remove(0))
    }

    /// Deletes one entity row addressed by its identifier values.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingIdentifierValue`] or
    /// [`EngineError::UnexpectedAffectedRowCount`].
    pub fn delete(&self, entity_type_code: &str, ids: Record) -> Result<()> {
        let entity = self.entity_type(entity_type_code)?;

        let mut delete = Delete::new().from(entity.table.as_str())?;
        for field in entity.identifier_fields() {
            delete = delete.equal(
                field.column.as_str(),
                identifier_value(&ids, &field.code)?,
            )?;
        }

        let stmt = delete.build()?;
        let result = self.domain.execute(&stmt.sql, &stmt.params)?;
        if result.affected_rows != 1 {
            return Err(EngineError::UnexpectedAffectedRowCount(result.affected_rows));
        }
        Ok(())
    }

    /// Direct access to the metadata repository, mainly for status
    /// inspection and tests.
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    fn cached_entity_types(&self) -> Result<Arc<Vec<EntityMeta>>> {
        self.cache
            .get_or_load(|| self.load_entity_types().map(Arc::new))
    }

    /// Loads mapped entities, then introspects and persists any domain
    /// tables they do not cover.
    fn load_entity_types(&self) -> Result<Vec<EntityMeta>> {
        let mut entities = self.metadata.load_all()?;
        for entity in &entities {
            check_valid(entity)?;
        }
        debug!(mapped = entities.len(), "loaded entity metadata");

        let mapped_tables: HashSet<String> =
            entities.iter().map(|e| e.table.clone()).collect();
        let unmapped: Vec<String> = self
            .domain
            .list_tables()?
            .into_iter()
            .filter(|table| {
                !mapped_tables.contains(table) && !self.excluded_tables.contains(table)
            })
            .collect();

        if unmapped.is_empty() {
            return Ok(entities);
        }

        for table in unmapped {
            let mut entity = introspect_table(self.domain.as_ref(), &table)?;
            check_valid(&entity)?;

            let entity_id = self.metadata.insert_entity(&entity)?;
            entity.id = Some(entity_id);
            for field in &mut entity.fields {
                field.id = Some(self.metadata.insert_field(entity_id, field)?);
            }
            info!(
                entity = %entity.code,
                fields = entity.fields.len(),
                "introspected and persisted new entity"
            );
            entities.push(entity);
        }

        Ok(entities)
    }
}

fn check_valid(entity: &EntityMeta) -> Result<()> {
    let problems = validate_entity(entity);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(EngineError::InvalidMetadata {
            code: entity.code.clone(),
            problems,
        })
    }
}

/// Resolves one identifier value from caller data: present and non-null,
/// or the operation cannot address a single row.
fn identifier_value(data: &Record, code: &str) -> Result<Value> {
    match data.get(code) {
        Some(value) if !value.is_null() => Ok(value.clone()),
        _ => Err(EngineError::MissingIdentifierValue(code.to_string())),
    }
}

/// Maps a raw row from physical column keys to field-code keys, decoding
/// every declared field in declaration order.
fn decode_row(entity: &EntityMeta, row: &Row) -> Result<Record> {
    let mut out = Record::new();
    for field in &entity.fields {
        let raw = match row.get(&field.column) {
            Some(value) => value.clone(),
            None => Value::Null,
        };
        out.insert(field.code.clone(), decode_field(field, &raw)?);
    }
    Ok(out)
}
