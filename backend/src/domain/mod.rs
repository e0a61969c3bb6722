//! # Domain Module
//!
//! Business logic for the daily pet-care checklist. It operates independently
//! of any rendering layer and only talks to storage through the repositories.
//!
//! ## Module Organization
//!
//! - **models**: pets, tasks, the pet registry and the history ledger
//! - **commands**: input and result types of the services
//! - **pet_service**: loading the registry, creating pets, switching the active pet
//! - **task_service**: toggling and resetting the active pet's tasks
//! - **history_service**: per-day completion summaries with a retention window
//! - **rollover_service**: the once-per-local-day reset of every checklist
//! - **calendar**: local day keys, display dates and midnight arithmetic
//! - **clock**: the wall-clock seam used by everything that depends on "today"
//!
//! ## Business Rules
//!
//! - A pet's name is non-empty and at most 100 characters
//! - The first pet created becomes the active pet
//! - A checklist is complete only if it has at least one task and all are done
//! - Every task of every pet is cleared at most once per local day
//! - History keeps one entry per day and pet, for one calendar month by default

pub mod calendar;
pub mod clock;
pub mod commands;
pub mod history_service;
pub mod models;
pub mod pet_service;
pub mod rollover_service;
pub mod task_service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use history_service::{HistoryService, DEFAULT_RETENTION_MONTHS};
pub use pet_service::PetService;
pub use rollover_service::{RolloverOutcome, RolloverService, RolloverState};
pub use task_service::TaskService;
