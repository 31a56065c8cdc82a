//! Metadata-driven data access engine.
//!
//! Given a pair of relational stores — a **metadata store** holding the
//! engine's own entity/field tables and a **domain store** holding
//! arbitrary, externally-owned tables — the engine:
//!
//! - loads persisted entity metadata, discovers domain tables not yet
//!   covered, introspects them into [`EntityMeta`](data_domain_core::EntityMeta),
//!   and persists the inferred metadata;
//! - serves generic [`create`](DataDomain::create), [`read`](DataDomain::read),
//!   [`update`](DataDomain::update), and [`delete`](DataDomain::delete)
//!   against the domain store, driven entirely by that metadata.
//!
//! The entity-metadata cache is single-flight: concurrent first callers
//! coalesce on one introspect-and-persist sequence, so the same table is
//! never mapped twice. The cache memoizes until
//! [`invalidate_entity_types`](DataDomain::invalidate_entity_types),
//! which is how external metadata edits (e.g. a renamed field code)
//! become visible.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use data_domain_core::{Record, Value};
//! use data_domain_engine::{DataDomain, ReadOptions};
//! use data_domain_store::{RelationalStore, SqliteStore};
//!
//! let metadata = Arc::new(SqliteStore::open_in_memory().unwrap());
//! let domain = Arc::new(SqliteStore::open_in_memory().unwrap());
//! domain
//!     .execute(
//!         "CREATE TABLE user (\
//!          id INTEGER PRIMARY KEY AUTOINCREMENT, \
//!          first_name TEXT NOT NULL, \
//!          last_name TEXT NOT NULL)",
//!         &[],
//!     )
//!     .unwrap();
//!
//! let engine = DataDomain::new(metadata, domain).unwrap();
//!
//! // Discovery: the user table is introspected and persisted
//! let types = engine.entity_types().unwrap();
//! assert_eq!(types.len(), 1);
//! assert_eq!(types[0].code, "user");
//!
//! // Generic CRUD, keyed by field code
//! let mut data = Record::new();
//! data.insert("first_name".to_string(), Value::from("Douglas"));
//! data.insert("last_name".to_string(), Value::from("Adams"));
//! let created = engine.create("user", data).unwrap();
//! assert_eq!(created["id"], Value::Integer(1));
//!
//! let mut ids = Record::new();
//! ids.insert("id".to_string(), Value::Integer(1));
//! let rows = engine
//!     .read("user", ReadOptions { ids: Some(ids), limit: None })
//!     .unwrap();
//! assert_eq!(rows[0]["last_name"], Value::from("Adams"));
//! ```

mod cache;
mod decode;
mod engine;
mod error;
mod introspect;
mod metadata;

pub use engine::{DataDomain, EngineConfig, ReadOptions};
pub use error::{EngineError, Result};
pub use metadata::{MetadataStatus, MetadataStore};
