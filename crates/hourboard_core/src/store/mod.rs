//! Key-value store contract used by persistence sync.
//!
//! # Responsibility
//! - Define the two-operation store API (`get`, `update`) the board relies on.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - `update` is atomic per call: no other store operation interleaves between
//!   its read and its write.
//! - Values are JSON documents; the store does not interpret their shape.

use crate::db::DbError;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::sync::Arc;

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store transport and data errors.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
    /// A previous holder of the store lock panicked.
    LockPoisoned(&'static str),
    /// The connection was opened without the board schema.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "store value is not valid json: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
            Self::LockPoisoned(what) => write!(f, "{what} lock poisoned"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected \
                 {expected_version}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// External key-value store.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Atomically replaces the value under `key` with `mutator(current)`.
    ///
    /// `mutator` receives `None` when the key was never written.
    fn update(
        &self,
        key: &str,
        mutator: &mut dyn FnMut(Option<Value>) -> Value,
    ) -> StoreResult<()>;

    /// Returns the stored value or `default` when absent.
    fn get_or(&self, key: &str, default: Value) -> StoreResult<Value> {
        Ok(self.get(key)?.unwrap_or(default))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).get(key)
    }

    fn update(
        &self,
        key: &str,
        mutator: &mut dyn FnMut(Option<Value>) -> Value,
    ) -> StoreResult<()> {
        (**self).update(key, mutator)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).get(key)
    }

    fn update(
        &self,
        key: &str,
        mutator: &mut dyn FnMut(Option<Value>) -> Value,
    ) -> StoreResult<()> {
        (**self).update(key, mutator)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).get(key)
    }

    fn update(
        &self,
        key: &str,
        mutator: &mut dyn FnMut(Option<Value>) -> Value,
    ) -> StoreResult<()> {
        (**self).update(key, mutator)
    }
}
