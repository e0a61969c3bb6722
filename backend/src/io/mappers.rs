//! Conversions between domain types and the `shared` DTOs.

use chrono::NaiveDate;
use shared::{
    CreatePetRequest, HistoryEntry as HistoryEntryDto, Pet as PetDto, RefreshEvent, RefreshReason,
    Task as TaskDto, ToggleTaskRequest,
};

use crate::domain::calendar;
use crate::domain::commands::pet::CreatePetCommand;
use crate::domain::commands::task::ToggleTaskCommand;
use crate::domain::models::{HistoryEntry, Pet, Task};
use crate::domain::RolloverOutcome;

pub struct PetMapper;

impl PetMapper {
    pub fn task_to_dto(task: &Task) -> TaskDto {
        TaskDto {
            name: task.name.clone(),
            completed: task.completed,
        }
    }

    /// Convert a domain pet to its DTO; `today` drives the derived age
    pub fn to_dto(pet: &Pet, today: NaiveDate) -> PetDto {
        PetDto {
            id: pet.id.clone(),
            name: pet.name.clone(),
            birthday: pet.birthday.clone(),
            age: pet.age,
            years_since_birthday: pet.years_since_birthday(today),
            tasks: pet.tasks.iter().map(Self::task_to_dto).collect(),
        }
    }

    pub fn to_dto_list(pets: &[Pet], today: NaiveDate) -> Vec<PetDto> {
        pets.iter().map(|p| Self::to_dto(p, today)).collect()
    }

    pub fn to_create_command(request: CreatePetRequest) -> CreatePetCommand {
        CreatePetCommand {
            name: request.name,
            birthday: request.birthday,
            age: request.age,
            tasks: request.tasks,
        }
    }

    pub fn to_toggle_command(request: &ToggleTaskRequest) -> ToggleTaskCommand {
        ToggleTaskCommand {
            task_index: request.task_index,
            completed: request.completed,
        }
    }
}

pub struct HistoryMapper;

impl HistoryMapper {
    pub fn to_dto(entry: &HistoryEntry) -> HistoryEntryDto {
        HistoryEntryDto {
            date: calendar::format_day_key(entry.date),
            pet_id: entry.pet_id.clone(),
            pet_name: entry.pet_name.clone(),
            completed: entry.completed,
            total: entry.total,
        }
    }

    pub fn to_dto_list(entries: &[HistoryEntry]) -> Vec<HistoryEntryDto> {
        entries.iter().map(Self::to_dto).collect()
    }
}

pub struct RefreshMapper;

impl RefreshMapper {
    pub fn rollover_event(outcome: &RolloverOutcome) -> RefreshEvent {
        RefreshEvent {
            reason: RefreshReason::Rollover,
            day: calendar::format_day_key(outcome.day),
            reset_performed: outcome.reset_performed,
        }
    }
}
