//! Saved-task synchronization with the external key-value store.
//!
//! # Responsibility
//! - Load saved notes once at startup.
//! - Write one row's note through on save.
//! - Clear every saved note at day rollover.
//!
//! # Invariants
//! - All saved notes live in one JSON object under one storage key, keyed by
//!   the decimal row index.
//! - A key exists only for rows that were saved at least once; absent means
//!   an empty note.
//! - `save` and `reset_all` are each exactly one atomic store `update`.
//! - Note text is never written to logs, only its length.

use crate::model::row::HOURS_PER_DAY;
use crate::store::{KeyValueStore, StoreError, StoreResult};
use log::{info, warn};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Storage key the board uses unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "saved-tasks";

/// Saved note text by row index.
pub type SavedTasks = BTreeMap<u32, String>;

/// Persistence sync for hour-row notes.
pub struct TaskPersistence<K: KeyValueStore> {
    store: K,
    key: String,
}

impl<K: KeyValueStore> TaskPersistence<K> {
    pub fn new(store: K) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: K, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Reads every saved note.
    ///
    /// Unreadable or non-object stored values load as empty; the next save
    /// or reset overwrites them. Keys that are not hour indexes and
    /// non-string values are skipped. Each case logs a warning.
    pub fn load(&self) -> StoreResult<SavedTasks> {
        let stored = match self.store.get_or(&self.key, Value::Object(Map::new())) {
            Ok(stored) => stored,
            Err(StoreError::InvalidData(reason)) => {
                warn!(
                    "event=task_load module=persistence status=degraded key={} reason={reason}",
                    self.key
                );
                return Ok(SavedTasks::new());
            }
            Err(err) => return Err(err),
        };
        let Value::Object(entries) = stored else {
            warn!(
                "event=task_load module=persistence status=degraded key={} reason=not_an_object",
                self.key
            );
            return Ok(SavedTasks::new());
        };

        let mut tasks = SavedTasks::new();
        for (raw_index, value) in entries {
            let index = match raw_index.parse::<u32>() {
                Ok(index) if index < HOURS_PER_DAY => index,
                _ => {
                    warn!(
                        "event=task_load module=persistence status=skipped \
                         reason=bad_index index={raw_index}"
                    );
                    continue;
                }
            };
            match value {
                Value::String(text) => {
                    tasks.insert(index, text);
                }
                _ => warn!(
                    "event=task_load module=persistence status=skipped \
                     reason=not_a_string row={index}"
                ),
            }
        }

        info!(
            "event=task_load module=persistence status=ok key={} rows={}",
            self.key,
            tasks.len()
        );
        Ok(tasks)
    }

    /// Stores `note_text` for `row_index`, keeping every other saved row.
    pub fn save(&self, row_index: u32, note_text: &str) -> StoreResult<()> {
        self.store
            .update(&self.key, &mut |current: Option<Value>| {
                let mut entries = into_object(current);
                entries.insert(row_index.to_string(), Value::String(note_text.to_string()));
                Value::Object(entries)
            })?;
        info!(
            "event=task_save module=persistence status=ok row={row_index} text_len={}",
            note_text.chars().count()
        );
        Ok(())
    }

    /// Removes every saved note, leaving an empty object behind.
    pub fn reset_all(&self) -> StoreResult<()> {
        let mut cleared = 0;
        self.store
            .update(&self.key, &mut |current: Option<Value>| {
                let mut entries = into_object(current);
                cleared = entries.len();
                entries.clear();
                Value::Object(entries)
            })?;
        info!("event=task_reset module=persistence status=ok cleared={cleared}");
        Ok(())
    }
}

fn into_object(value: Option<Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(entries)) => entries,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskPersistence, DEFAULT_STORAGE_KEY};
    use crate::store::{InMemoryStore, KeyValueStore};
    use serde_json::json;

    #[test]
    fn load_skips_malformed_entries() {
        let store = InMemoryStore::new().with_entry(
            DEFAULT_STORAGE_KEY,
            json!({"5": "lunch", "24": "nope", "x": "nope", "7": 3}),
        );
        let tasks = TaskPersistence::new(store).load().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.get(&5).map(String::as_str), Some("lunch"));
    }

    #[test]
    fn load_treats_non_object_as_empty() {
        let store = InMemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, json!("garbage"));
        assert!(TaskPersistence::new(store).load().unwrap().is_empty());
    }

    #[test]
    fn save_replaces_non_object_value() {
        let store = InMemoryStore::new().with_entry(DEFAULT_STORAGE_KEY, json!([1, 2]));
        let sync = TaskPersistence::new(store);
        sync.save(3, "gym").unwrap();
        assert_eq!(
            sync.store().get(DEFAULT_STORAGE_KEY).unwrap(),
            Some(json!({"3": "gym"}))
        );
    }

    #[test]
    fn reset_on_missing_key_writes_empty_object() {
        let sync = TaskPersistence::with_key(InMemoryStore::new(), "custom");
        sync.reset_all().unwrap();
        assert_eq!(sync.store().get("custom").unwrap(), Some(json!({})));
        assert_eq!(sync.store().write_count(), 1);
    }
}
