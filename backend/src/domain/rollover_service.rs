//! Nightly reset of every pet's checklist.
//!
//! The check is idempotent per local day: the last day a reset was applied is
//! persisted, and a reset only happens when that marker differs from today.

use chrono::{DateTime, Local, NaiveDate};
use log::{debug, info};
use std::time::Duration;

use crate::domain::calendar;
use crate::domain::models::PetRegistry;
use crate::error::PetCareError;
use crate::storage::traits::{KeyValueStore, PetStorage, ResetMarkerStorage};
use crate::storage::{PersistenceGateway, PetRepository, ResetMarkerRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RolloverState {
    #[default]
    Idle,
    Checking,
}

/// Result of one rollover check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverOutcome {
    pub reset_performed: bool,
    /// The local day the check ran on
    pub day: NaiveDate,
    /// Completion flags cleared across all pets
    pub cleared: usize,
    pub next_check_at: DateTime<Local>,
    pub next_check_in: Duration,
}

pub struct RolloverService<S: KeyValueStore> {
    pet_repository: PetRepository<S>,
    marker_repository: ResetMarkerRepository<S>,
    state: RolloverState,
}

impl<S: KeyValueStore> RolloverService<S> {
    pub fn new(gateway: PersistenceGateway<S>) -> Self {
        Self {
            pet_repository: PetRepository::new(gateway.clone()),
            marker_repository: ResetMarkerRepository::new(gateway),
            state: RolloverState::Idle,
        }
    }

    pub fn state(&self) -> RolloverState {
        self.state
    }

    /// Reset all pets if the stored marker is not today, then report when the
    /// next check is due.
    ///
    /// The registry is persisted before the marker, so a failure in between
    /// repeats the reset on the next check instead of skipping it.
    pub fn check(
        &mut self,
        registry: &mut PetRegistry,
        now: DateTime<Local>,
    ) -> Result<RolloverOutcome, PetCareError> {
        self.state = RolloverState::Checking;
        let result = self.run_check(registry, now);
        self.state = RolloverState::Idle;
        result
    }

    fn run_check(
        &self,
        registry: &mut PetRegistry,
        now: DateTime<Local>,
    ) -> Result<RolloverOutcome, PetCareError> {
        let today = now.date_naive();
        let last_reset = self.marker_repository.load_last_reset();

        let reset_performed = last_reset != Some(today);
        let mut cleared = 0;
        if reset_performed {
            cleared = registry.reset_all_tasks();
            self.pet_repository.store_pets(registry.pets())?;
            self.marker_repository.store_last_reset(today)?;
            info!(
                "Daily rollover for {} (last reset {:?}): cleared {} tasks across {} pets",
                calendar::format_day_key(today),
                last_reset.map(calendar::format_day_key),
                cleared,
                registry.len()
            );
        } else {
            debug!("Rollover check: already reset today");
        }

        let next_check_at = calendar::next_local_midnight(&now);
        let next_check_in = calendar::duration_until_next_midnight(&now);
        debug!("Next rollover check at {} (in {:?})", next_check_at, next_check_in);

        Ok(RolloverOutcome {
            reset_performed,
            day: today,
            cleared,
            next_check_at,
            next_check_in,
        })
    }
}
