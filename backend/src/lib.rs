//! # Pawfect Day backend
//!
//! Non-UI logic for the daily pet-care checklist: pets and their tasks,
//! the midnight rollover, and the rolling completion history.
//!
//! ## Architecture
//!
//! ```text
//! Rendering layer
//!     ↓
//! IO Layer (PetCareApi, DTO mappers, refresh events)
//!     ↓
//! PetCare controller + RolloverScheduler
//!     ↓
//! Domain Layer (services, models, calendar)
//!     ↓
//! Storage Layer (gateway, repositories, key-value stores)
//! ```
//!
//! [`PetCare`] owns the in-memory state. Every mutating call writes through
//! to storage before it returns.

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod scheduler;
pub mod storage;

use chrono::{NaiveDate, Utc};
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::AppConfig;
use crate::domain::commands::history::RecordHistoryCommand;
use crate::domain::commands::pet::{CreatePetCommand, CreatePetResult, SelectPetResult};
use crate::domain::commands::task::{
    ResetTasksResult, TaskProgress, ToggleTaskCommand, ToggleTaskResult,
};
use crate::domain::models::{HistoryEntry, HistoryLedger, Pet, PetRegistry};
use crate::domain::{
    Clock, HistoryService, PetService, RolloverOutcome, RolloverService, TaskService,
};
use crate::error::PetCareError;
use crate::storage::{KeyValueStore, PersistenceGateway};

pub use crate::error::StorageError;

/// The pet-care session: loaded state plus the services that mutate it
pub struct PetCare<S: KeyValueStore> {
    registry: PetRegistry,
    ledger: HistoryLedger,
    pet_service: PetService<S>,
    task_service: TaskService<S>,
    history_service: HistoryService<S>,
    rollover_service: RolloverService<S>,
    clock: Arc<dyn Clock>,
    last_rollover: RolloverOutcome,
}

impl<S: KeyValueStore> PetCare<S> {
    /// Load all state from `store` and run the startup rollover check
    pub fn open(
        store: Arc<S>,
        config: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PetCareError> {
        let gateway = PersistenceGateway::new(store, config.storage_keys());

        let pet_service = PetService::new(gateway.clone());
        let task_service = TaskService::new(gateway.clone());
        let history_service = HistoryService::new(gateway.clone(), config.history_retention_months);
        let mut rollover_service = RolloverService::new(gateway);

        let mut registry = pet_service.load_registry();
        let ledger = history_service.load_ledger();
        let last_rollover = rollover_service.check(&mut registry, clock.now())?;

        info!(
            "Opened pet care session: {} pets, {} history entries",
            registry.len(),
            ledger.len()
        );

        Ok(Self {
            registry,
            ledger,
            pet_service,
            task_service,
            history_service,
            rollover_service,
            clock,
            last_rollover,
        })
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn registry(&self) -> &PetRegistry {
        &self.registry
    }

    pub fn pets(&self) -> &[Pet] {
        self.registry.pets()
    }

    pub fn active_pet(&self) -> Option<&Pet> {
        self.registry.active_pet()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.registry.active_index()
    }

    /// History in chronological order with current pet names
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history_service.list(&self.ledger, &self.registry)
    }

    pub fn all_completed(&self) -> bool {
        self.task_service.all_completed(&self.registry)
    }

    pub fn progress(&self) -> Option<TaskProgress> {
        self.task_service.progress(&self.registry)
    }

    /// The most recent rollover check, startup included
    pub fn last_rollover(&self) -> &RolloverOutcome {
        &self.last_rollover
    }

    pub fn add_pet(&mut self, command: CreatePetCommand) -> Result<CreatePetResult, PetCareError> {
        let now = self.clock.now().with_timezone(&Utc);
        self.pet_service.add_pet(&mut self.registry, command, now)
    }

    pub fn select_next(&mut self) -> Result<SelectPetResult, PetCareError> {
        self.pet_service.select_next(&mut self.registry)
    }

    pub fn select_previous(&mut self) -> Result<SelectPetResult, PetCareError> {
        self.pet_service.select_previous(&mut self.registry)
    }

    /// Toggle a task of the active pet, then record today's summary for it.
    /// The registry is persisted before the history.
    pub fn toggle_task(
        &mut self,
        command: ToggleTaskCommand,
    ) -> Result<Option<ToggleTaskResult>, PetCareError> {
        let Some(result) = self.task_service.toggle(&mut self.registry, command)? else {
            return Ok(None);
        };

        self.history_service.record_today(
            &mut self.ledger,
            RecordHistoryCommand {
                date: self.clock.today(),
                pet_id: result.pet_id.clone(),
                pet_name: result.pet_name.clone(),
                completed: saturating_u32(result.completed_count),
                total: saturating_u32(result.total),
            },
        )?;

        Ok(Some(result))
    }

    /// Clear the active pet's checklist without touching history
    pub fn reset_today(&mut self) -> Result<Option<ResetTasksResult>, PetCareError> {
        self.task_service.reset_all(&mut self.registry)
    }

    /// Re-run the day-boundary check against the current clock
    pub fn run_rollover_check(&mut self) -> Result<RolloverOutcome, PetCareError> {
        let now = self.clock.now();
        debug!("Running rollover check at {}", now);
        let outcome = self.rollover_service.check(&mut self.registry, now)?;
        self.last_rollover = outcome.clone();
        Ok(outcome)
    }
}

/// A session shared between API callers and the rollover scheduler
pub type SharedPetCare<S> = Arc<Mutex<PetCare<S>>>;

/// Lock a shared session. A panic while holding the lock leaves the state as
/// the last completed write, so poisoning is ignored.
pub(crate) fn lock_care<S: KeyValueStore>(care: &Mutex<PetCare<S>>) -> MutexGuard<'_, PetCare<S>> {
    care.lock().unwrap_or_else(PoisonError::into_inner)
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
