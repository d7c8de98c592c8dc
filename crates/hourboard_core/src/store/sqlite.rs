//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist JSON values in the `kv_entries` table.
//! - Run each `update` as one SQLite transaction behind a connection mutex.
//!
//! # Invariants
//! - Values are written as JSON text. `get` reports text that does not
//!   parse; `update` hands the mutator `None` for it so the write replaces it.

use super::{KeyValueStore, StoreError, StoreResult};
use log::warn;
use crate::db::migrations::latest_version;
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Key-value store over one migrated SQLite connection.
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Wraps an already migrated connection.
    ///
    /// # Errors
    /// - `StoreError::UninitializedConnection` when the connection schema
    ///   version is not the latest known one.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let actual_version = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens (and migrates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned("sqlite connection"))
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let conn = self.lock()?;
        read_value(&conn, key)
    }

    fn update(
        &self,
        key: &str,
        mutator: &mut dyn FnMut(Option<Value>) -> Value,
    ) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let current = match read_value(&tx, key) {
            Ok(current) => current,
            Err(StoreError::InvalidData(reason)) => {
                warn!("event=kv_update module=store status=degraded key={key} reason={reason}");
                None
            }
            Err(err) => return Err(err),
        };
        let next = serde_json::to_string(&mutator(current))?;
        tx.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, next],
        )?;
        tx.commit()?;
        Ok(())
    }
}

fn read_value(conn: &Connection, key: &str) -> StoreResult<Option<Value>> {
    let text: Option<String> = conn
        .query_row(
            "SELECT value FROM kv_entries WHERE key = ?1;",
            [key],
            |row| row.get(0),
        )
        .optional()?;
    match text {
        Some(text) => serde_json::from_str(&text).map(Some).map_err(|err| {
            StoreError::InvalidData(format!("kv_entries.value for `{key}` is not json: {err}"))
        }),
        None => Ok(None),
    }
}
