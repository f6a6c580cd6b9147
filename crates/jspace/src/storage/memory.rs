//! In-memory store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

use crate::storage::{PersistenceGateway, StorageError};

/// Store that keeps values in memory.
///
/// Clones share the same map, so a clone kept outside a session observes
/// everything the session writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.values
            .lock()
            .map_err(|_| StorageError::new("Memory store lock poisoned"))
    }
}

impl PersistenceGateway for MemoryStore {
    #[instrument(skip(self))]
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self.lock()?.get(key).cloned();
        debug!(found = value.is_some(), "Read key");
        Ok(value)
    }

    #[instrument(skip(self, value))]
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        debug!("Wrote key");
        Ok(())
    }

    #[instrument(skip(self))]
    fn reset(&self) -> Result<(), StorageError> {
        self.lock()?.clear();
        debug!("Cleared memory store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_values() {
        let store = MemoryStore::new();
        let observer = store.clone();

        store.write("player", "{}").expect("write");
        assert_eq!(observer.read("player").expect("read").as_deref(), Some("{}"));

        observer.reset().expect("reset");
        assert_eq!(store.read("player").expect("read"), None);
    }
}
