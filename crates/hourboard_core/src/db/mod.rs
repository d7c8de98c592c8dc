//! SQLite storage bootstrap for the board's key-value store.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply schema migrations before any store access.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Store code never touches a connection whose migrations failed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The board file was written by a newer build with a later schema.
    UnsupportedSchemaVersion {
        location: String,
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "board database error: {err}"),
            Self::UnsupportedSchemaVersion {
                location,
                db_version,
                latest_supported,
            } => write!(
                f,
                "{location} has board schema v{db_version}; this build reads up to \
                 v{latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
