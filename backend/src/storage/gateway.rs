//! # Persistence Gateway
//!
//! Typed access to the key-value store. Values are JSON strings; anything
//! that is missing, unreadable, or fails to parse loads as absent so a
//! corrupted local record degrades to a fresh start instead of an error.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::error::StorageError;
use crate::storage::traits::KeyValueStore;

pub const DEFAULT_KEY_PREFIX: &str = "pawfect";

/// The logical records and the concrete keys they are stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub pets: String,
    pub active_pet_index: String,
    pub last_reset_day: String,
    pub history: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        let key = |name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}_{}", prefix, name)
            }
        };
        Self {
            pets: key("pets"),
            active_pet_index: key("active-pet-index"),
            last_reset_day: key("last-reset-day"),
            history: key("history"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

pub struct PersistenceGateway<S: KeyValueStore> {
    store: Arc<S>,
    keys: StorageKeys,
}

// Manual impl: cloning shares the store and must not require `S: Clone`
impl<S: KeyValueStore> Clone for PersistenceGateway<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            keys: self.keys.clone(),
        }
    }
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    pub fn new(store: Arc<S>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Read the unparsed value under `key`; absent or unreadable is None
    pub fn load_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(Some(raw)) => Some(raw),
            Ok(None) => {
                debug!("No stored value for {}", key);
                None
            }
            Err(e) => {
                warn!("Failed to read {}, treating as absent: {}", key, e);
                None
            }
        }
    }

    /// Load and parse the record under `key`; absent or malformed is None
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.load_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Malformed value for {}, treating as absent: {}", key, e);
                None
            }
        }
    }

    /// Like [`load`](Self::load) but falls back to the type's default
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load(key).unwrap_or_default()
    }

    /// Serialize `value` and write it under `key` before returning
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }
}
