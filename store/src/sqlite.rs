//! SQLite implementation of the store adapter.

use std::sync::Mutex;

use data_domain_core::{DATE_FORMAT, DATETIME_FORMAT, TIME_FORMAT, Value};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, params_from_iter};

use crate::adapter::{ColumnDescription, ExecuteResult, RelationalStore, Row};
use crate::error::{Result, StoreError};

/// A [`RelationalStore`] backed by a single SQLite connection.
///
/// The connection is guarded by a mutex so the store is `Send + Sync` and
/// can be shared across threads; statements serialize on the lock, which
/// matches SQLite's own single-writer model.
///
/// # Examples
///
/// ```
/// use data_domain_store::{RelationalStore, SqliteStore};
///
/// let store = SqliteStore::open_in_memory().unwrap();
/// store
///     .execute("CREATE TABLE user (id INTEGER PRIMARY KEY, name TEXT)", &[])
///     .unwrap();
/// assert_eq!(store.list_tables().unwrap(), vec!["user"]);
/// ```
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wraps an existing connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens a database file, creating it if missing.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(Connection::open(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Connection::open_in_memory()?))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("connection mutex poisoned")
    }
}

impl RelationalStore for SqliteStore {
    fn list_tables(&self) -> Result<Vec<String>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn describe_columns(&self, table: &str) -> Result<Vec<ColumnDescription>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "PRAGMA table_info(\"{}\")",
            table.replace('"', "\"\"")
        ))?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnDescription {
                    name: row.get::<_, String>("name")?,
                    native_type: row.get::<_, String>("type")?,
                    primary_key: row.get::<_, i64>("pk")? > 0,
                    not_null: row.get::<_, i64>("notnull")? != 0,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Err(StoreError::NoSuchTable(table.to_string()));
        }
        Ok(columns)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;
        let column_names: Vec<String> =
            stmt.column_names().iter().map(|n| n.to_string()).collect();

        let mut rows = stmt.query(params_from_iter(params.iter().map(bind_value)))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (i, name) in column_names.iter().enumerate() {
                record.insert(name.clone(), read_value(row.get_ref(i)?, name)?);
            }
            out.push(record);
        }
        Ok(out)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecuteResult> {
        let conn = self.lock();
        let affected = conn.execute(sql, params_from_iter(params.iter().map(bind_value)))?;
        let rowid = conn.last_insert_rowid();
        Ok(ExecuteResult {
            affected_rows: affected as u64,
            last_insert_id: (rowid != 0).then_some(rowid),
        })
    }
}

/// Converts an engine value into a SQLite binding. Temporal values bind
/// as their canonical text forms.
fn bind_value(value: &Value) -> rusqlite::types::Value {
    use rusqlite::types::Value as Sql;
    match value {
        Value::Null => Sql::Null,
        Value::Integer(n) => Sql::Integer(*n),
        Value::Real(n) => Sql::Real(*n),
        Value::Text(s) => Sql::Text(s.clone()),
        Value::Date(d) => Sql::Text(d.format(DATE_FORMAT).to_string()),
        Value::DateTime(dt) => Sql::Text(dt.format(DATETIME_FORMAT).to_string()),
        Value::Time(t) => Sql::Text(t.format(TIME_FORMAT).to_string()),
    }
}

/// Converts a SQLite value reference into a raw engine value.
fn read_value(value: ValueRef<'_>, column: &str) -> Result<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(n) => Ok(Value::Integer(n)),
        ValueRef::Real(n) => Ok(Value::Real(n)),
        ValueRef::Text(bytes) => Ok(Value::Text(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(_) => Err(StoreError::UnsupportedValue {
            column: column.to_string(),
            detail: "BLOB".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_user_table() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute(
                "CREATE TABLE user (\
                 id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 first_name TEXT NOT NULL, \
                 middle_name TEXT, \
                 last_name TEXT NOT NULL)",
                &[],
            )
            .unwrap();
        store
    }

    #[test]
    fn test_list_tables_excludes_sqlite_internals() {
        let store = store_with_user_table();
        // AUTOINCREMENT creates sqlite_sequence; it must not be listed
        store
            .execute(
                "INSERT INTO user (first_name, last_name) VALUES (?, ?)",
                &[Value::from("Douglas"), Value::from("Adams")],
            )
            .unwrap();
        assert_eq!(store.list_tables().unwrap(), vec!["user"]);
    }

    #[test]
    fn test_list_tables_orders_by_name() {
        let store = store_with_user_table();
        store
            .execute("CREATE TABLE account (id INTEGER PRIMARY KEY)", &[])
            .unwrap();
        assert_eq!(store.list_tables().unwrap(), vec!["account", "user"]);
    }

    #[test]
    fn test_describe_columns_reports_flags_in_order() {
        let store = store_with_user_table();
        let columns = store.describe_columns("user").unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "first_name", "middle_name", "last_name"]);

        assert!(columns[0].primary_key);
        assert!(!columns[0].not_null);
        assert_eq!(columns[0].native_type, "INTEGER");

        assert!(!columns[1].primary_key);
        assert!(columns[1].not_null);
        assert_eq!(columns[1].native_type, "TEXT");

        assert!(!columns[2].not_null);
    }

    #[test]
    fn test_describe_missing_table_fails() {
        let store = store_with_user_table();
        let err = store.describe_columns("nope").unwrap_err();
        assert!(matches!(err, StoreError::NoSuchTable(t) if t == "nope"));
    }

    #[test]
    fn test_execute_reports_rowid_and_affected_count() {
        let store = store_with_user_table();
        let result = store
            .execute(
                "INSERT INTO user (first_name, last_name) VALUES (?, ?)",
                &[Value::from("Douglas"), Value::from("Adams")],
            )
            .unwrap();
        assert_eq!(result.affected_rows, 1);
        assert_eq!(result.last_insert_id, Some(1));

        let result = store
            .execute(
                "UPDATE user SET first_name = ? WHERE id = ?",
                &[Value::from("Rick"), Value::from(1)],
            )
            .unwrap();
        assert_eq!(result.affected_rows, 1);
    }

    #[test]
    fn test_query_rows_keyed_by_column_in_order() {
        let store = store_with_user_table();
        store
            .execute(
                "INSERT INTO user (first_name, middle_name, last_name) VALUES (?, ?, ?)",
                &[
                    Value::from("Douglas"),
                    Value::Null,
                    Value::from("Adams"),
                ],
            )
            .unwrap();

        let rows = store.query("SELECT * FROM user", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        let keys: Vec<_> = row.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "first_name", "middle_name", "last_name"]);
        assert_eq!(row["id"], Value::Integer(1));
        assert_eq!(row["first_name"], Value::Text("Douglas".into()));
        assert_eq!(row["middle_name"], Value::Null);
    }

    #[test]
    fn test_blob_value_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute("CREATE TABLE raw (data BLOB)", &[])
            .unwrap();
        store
            .execute("INSERT INTO raw (data) VALUES (x'00ff')", &[])
            .unwrap();
        let err = store.query("SELECT data FROM raw", &[]).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_file_backed_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domain.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .execute("CREATE TABLE note (body TEXT)", &[])
                .unwrap();
            store
                .execute(
                    "INSERT INTO note (body) VALUES (?)",
                    &[Value::from("persisted")],
                )
                .unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let rows = store.query("SELECT body FROM note", &[]).unwrap();
        assert_eq!(rows[0]["body"], Value::Text("persisted".into()));
    }
}
