//! Process-local key-value store.

use super::{KeyValueStore, StoreError, StoreResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Mutex-guarded map; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
    writes: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one entry without counting it as a write.
    pub fn with_entry(self, key: impl Into<String>, value: Value) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.into(), value);
        }
        self
    }

    /// Number of completed `update` calls.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::LockPoisoned("in-memory store"))?;
        Ok(entries.get(key).cloned())
    }

    fn update(
        &self,
        key: &str,
        mutator: &mut dyn FnMut(Option<Value>) -> Value,
    ) -> StoreResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::LockPoisoned("in-memory store"))?;
        let next = mutator(entries.remove(key));
        entries.insert(key.to_string(), next);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
