use log::{debug, warn};
use serde_json::Value;

use crate::domain::models::HistoryEntry;
use crate::error::StorageError;
use crate::storage::gateway::PersistenceGateway;
use crate::storage::traits::{HistoryStorage, KeyValueStore};

/// Repository for the daily completion history
pub struct HistoryRepository<S: KeyValueStore> {
    gateway: PersistenceGateway<S>,
}

impl<S: KeyValueStore> Clone for HistoryRepository<S> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<S: KeyValueStore> HistoryRepository<S> {
    pub fn new(gateway: PersistenceGateway<S>) -> Self {
        Self { gateway }
    }
}

impl<S: KeyValueStore> HistoryStorage for HistoryRepository<S> {
    /// Rows that fail to parse are skipped one by one; only a record that is
    /// not a JSON list at all loads as empty.
    fn load_history(&self) -> Vec<HistoryEntry> {
        let rows: Vec<Value> = self.gateway.load_or_default(&self.gateway.keys().history);
        let total = rows.len();
        let entries: Vec<HistoryEntry> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping malformed history entry: {}", e);
                    None
                }
            })
            .collect();
        debug!("Loaded {} of {} history entries", entries.len(), total);
        entries
    }

    fn store_history(&self, entries: &[HistoryEntry]) -> Result<(), StorageError> {
        self.gateway.save(&self.gateway.keys().history, entries)?;
        debug!("Stored {} history entries", entries.len());
        Ok(())
    }
}
