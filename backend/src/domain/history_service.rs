use log::{debug, info};

use crate::domain::calendar;
use crate::domain::commands::history::{RecordHistoryCommand, RecordHistoryResult};
use crate::domain::models::{HistoryEntry, HistoryLedger, PetRegistry};
use crate::error::PetCareError;
use crate::storage::traits::{HistoryStorage, KeyValueStore};
use crate::storage::{HistoryRepository, PersistenceGateway};

pub const DEFAULT_RETENTION_MONTHS: u32 = 1;

/// Service for the rolling per-day completion history
pub struct HistoryService<S: KeyValueStore> {
    history_repository: HistoryRepository<S>,
    retention_months: u32,
}

impl<S: KeyValueStore> HistoryService<S> {
    pub fn new(gateway: PersistenceGateway<S>, retention_months: u32) -> Self {
        Self {
            history_repository: HistoryRepository::new(gateway),
            retention_months,
        }
    }

    pub fn load_ledger(&self) -> HistoryLedger {
        HistoryLedger::new(self.history_repository.load_history())
    }

    /// Write the day's summary for a pet, drop entries that fell out of the
    /// retention window, then persist the ledger.
    pub fn record_today(
        &self,
        ledger: &mut HistoryLedger,
        command: RecordHistoryCommand,
    ) -> Result<RecordHistoryResult, PetCareError> {
        let upsert = ledger.upsert(
            command.date,
            &command.pet_id,
            &command.pet_name,
            command.completed,
            command.total,
        );

        let cutoff = calendar::retention_cutoff(command.date, self.retention_months);
        let pruned = ledger.prune_before(cutoff);
        if pruned > 0 {
            info!(
                "Pruned {} history entries older than {}",
                pruned,
                calendar::format_day_key(cutoff)
            );
        }

        self.history_repository.store_history(ledger.entries())?;

        debug!(
            "Recorded history for {} on {}: {}/{} ({:?})",
            command.pet_name,
            calendar::format_day_key(command.date),
            command.completed,
            command.total,
            upsert
        );
        Ok(RecordHistoryResult { upsert, pruned })
    }

    /// Entries in chronological order, with names taken from the registry
    /// for pets that still exist
    pub fn list(&self, ledger: &HistoryLedger, registry: &PetRegistry) -> Vec<HistoryEntry> {
        ledger
            .entries()
            .iter()
            .map(|entry| {
                let mut entry = entry.clone();
                if let Some(pet) = entry.pet_id.as_deref().and_then(|id| registry.find_by_id(id)) {
                    entry.pet_name = pet.name.clone();
                }
                entry
            })
            .collect()
    }
}
