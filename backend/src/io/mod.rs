//! # IO Module
//!
//! The interface layer between a rendering layer and the domain logic.
//!
//! [`PetCareApi`] translates requests into domain operations on a shared
//! [`PetCare`] session and returns `shared` DTOs. Redraw notifications are
//! pushed through a `tokio::sync::broadcast` channel so a renderer never has
//! to poll for the midnight rollover.
//!
//! ## Supported Operations
//!
//! - **get_active_pet / get_all_pets / get_checklist**: read the current state
//! - **add_pet / select_next / select_previous**: manage the registry
//! - **toggle_task / reset_today / is_all_completed**: the daily checklist
//! - **get_history**: retained daily summaries, oldest first
//! - **subscribe / start_scheduler / shutdown**: refresh events and the timer

pub mod mappers;

use log::{info, warn};
use shared::{
    ActivePetResponse, ChecklistResponse, CreatePetRequest, CreatePetResponse, HistoryResponse,
    PetListResponse, RefreshEvent, ResetTodayResponse, SelectPetResponse, ToggleTaskRequest,
    ToggleTaskResponse,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::domain::calendar;
use crate::domain::Clock;
use crate::error::PetCareError;
use crate::scheduler::RolloverScheduler;
use crate::storage::KeyValueStore;
use crate::{lock_care, PetCare, SharedPetCare};
use mappers::{HistoryMapper, PetMapper};

const REFRESH_CHANNEL_CAPACITY: usize = 16;

pub struct PetCareApi<S: KeyValueStore> {
    care: SharedPetCare<S>,
    events: broadcast::Sender<RefreshEvent>,
    scheduler: Mutex<Option<RolloverScheduler>>,
}

impl<S: KeyValueStore + 'static> PetCareApi<S> {
    /// Open a session over `store`; the startup rollover check has already
    /// run when this returns
    pub fn open(
        store: Arc<S>,
        config: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PetCareError> {
        let care = PetCare::open(store, config, clock)?;
        Ok(Self::new(care))
    }

    pub fn new(care: PetCare<S>) -> Self {
        let (events, _) = broadcast::channel(REFRESH_CHANNEL_CAPACITY);
        Self {
            care: Arc::new(Mutex::new(care)),
            events,
            scheduler: Mutex::new(None),
        }
    }

    /// Receive a [`RefreshEvent`] whenever the state changed underneath the renderer
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.events.subscribe()
    }

    /// Start the midnight timer. Calling it again while it runs does nothing.
    pub fn start_scheduler(&self) {
        let mut slot = self.scheduler.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(RolloverScheduler::is_running) {
            warn!("Rollover scheduler already running");
            return;
        }
        *slot = Some(RolloverScheduler::spawn(
            Arc::clone(&self.care),
            self.events.clone(),
        ));
    }

    /// Stop the midnight timer if it is running
    pub async fn shutdown(&self) {
        let scheduler = self
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(scheduler) = scheduler {
            scheduler.shutdown().await;
        }
        info!("Pet care API shut down");
    }

    pub fn get_active_pet(&self) -> ActivePetResponse {
        let care = lock_care(&self.care);
        let today = care.today();
        ActivePetResponse {
            pet: care.active_pet().map(|p| PetMapper::to_dto(p, today)),
            index: care.active_index(),
            pet_count: care.pets().len(),
        }
    }

    pub fn get_all_pets(&self) -> PetListResponse {
        let care = lock_care(&self.care);
        PetListResponse {
            pets: PetMapper::to_dto_list(care.pets(), care.today()),
            active_index: care.active_index(),
        }
    }

    pub fn get_history(&self) -> HistoryResponse {
        let care = lock_care(&self.care);
        HistoryResponse {
            entries: HistoryMapper::to_dto_list(&care.history()),
        }
    }

    pub fn is_all_completed(&self) -> bool {
        lock_care(&self.care).all_completed()
    }

    /// Active pet, progress and celebration flag for drawing the home page
    pub fn get_checklist(&self) -> ChecklistResponse {
        let care = lock_care(&self.care);
        let today = care.today();
        let progress = care.progress();
        ChecklistResponse {
            date_display: calendar::format_date_for_display(today),
            pet: care.active_pet().map(|p| PetMapper::to_dto(p, today)),
            completed: progress.map_or(0, |p| p.completed),
            total: progress.map_or(0, |p| p.total),
            all_completed: care.all_completed(),
            show_switcher: care.pets().len() > 1,
        }
    }

    pub fn toggle_task(
        &self,
        request: ToggleTaskRequest,
    ) -> Result<ToggleTaskResponse, PetCareError> {
        let mut care = lock_care(&self.care);
        let result = care.toggle_task(PetMapper::to_toggle_command(&request))?;
        let today = care.today();
        Ok(ToggleTaskResponse {
            pet: result
                .and_then(|_| care.active_pet())
                .map(|p| PetMapper::to_dto(p, today)),
            all_completed: care.all_completed(),
        })
    }

    pub fn add_pet(&self, request: CreatePetRequest) -> Result<CreatePetResponse, PetCareError> {
        let mut care = lock_care(&self.care);
        let result = care.add_pet(PetMapper::to_create_command(request))?;
        let today = care.today();
        Ok(CreatePetResponse {
            success_message: format!("{} has been added", result.pet.name),
            pet: PetMapper::to_dto(&result.pet, today),
            active_index: result.active_index,
        })
    }

    pub fn select_next(&self) -> Result<SelectPetResponse, PetCareError> {
        let mut care = lock_care(&self.care);
        let result = care.select_next()?;
        Ok(Self::selection_response(&care, result.active_index))
    }

    pub fn select_previous(&self) -> Result<SelectPetResponse, PetCareError> {
        let mut care = lock_care(&self.care);
        let result = care.select_previous()?;
        Ok(Self::selection_response(&care, result.active_index))
    }

    /// Clear the active pet's checklist for today; history is unchanged
    pub fn reset_today(&self) -> Result<ResetTodayResponse, PetCareError> {
        let mut care = lock_care(&self.care);
        let cleared = care.reset_today()?.map_or(0, |r| r.cleared);
        let today = care.today();
        Ok(ResetTodayResponse {
            pet: care.active_pet().map(|p| PetMapper::to_dto(p, today)),
            cleared,
        })
    }

    fn selection_response(care: &PetCare<S>, active_index: Option<usize>) -> SelectPetResponse {
        SelectPetResponse {
            active_index,
            pet: care
                .active_pet()
                .map(|p| PetMapper::to_dto(p, care.today())),
        }
    }
}
