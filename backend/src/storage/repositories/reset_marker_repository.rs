use chrono::NaiveDate;
use log::{info, warn};

use crate::domain::calendar;
use crate::error::StorageError;
use crate::storage::gateway::PersistenceGateway;
use crate::storage::traits::{KeyValueStore, ResetMarkerStorage};

/// Repository for the last-reset-day marker used by the nightly rollover
pub struct ResetMarkerRepository<S: KeyValueStore> {
    gateway: PersistenceGateway<S>,
}

impl<S: KeyValueStore> Clone for ResetMarkerRepository<S> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<S: KeyValueStore> ResetMarkerRepository<S> {
    pub fn new(gateway: PersistenceGateway<S>) -> Self {
        Self { gateway }
    }
}

impl<S: KeyValueStore> ResetMarkerStorage for ResetMarkerRepository<S> {
    fn load_last_reset(&self) -> Option<NaiveDate> {
        let raw = self.gateway.load_raw(&self.gateway.keys().last_reset_day)?;
        // Older versions wrote the marker as a bare, unquoted string
        let text = serde_json::from_str::<String>(&raw).unwrap_or_else(|_| raw.clone());
        let day = calendar::parse_day_key(&text);
        if day.is_none() {
            warn!("Ignoring malformed last reset marker: {:?}", raw);
        }
        day
    }

    fn store_last_reset(&self, day: NaiveDate) -> Result<(), StorageError> {
        let key = calendar::format_day_key(day);
        self.gateway.save(&self.gateway.keys().last_reset_day, &key)?;
        info!("Stored last reset day: {}", key);
        Ok(())
    }
}
