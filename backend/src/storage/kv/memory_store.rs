use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::validate_key;
use crate::error::StorageError;
use crate::storage::traits::KeyValueStore;

/// In-memory store for ephemeral sessions and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a store, e.g. with records written by another version
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("pawfect_history").unwrap(), None);
        store.set("pawfect_history", "[]").unwrap();
        assert_eq!(store.get("pawfect_history").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_with_values() {
        let store = MemoryStore::with_values([("pawfect_active-pet-index", "1")]);
        assert_eq!(store.get("pawfect_active-pet-index").unwrap().as_deref(), Some("1"));
    }
}
