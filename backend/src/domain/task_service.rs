use log::{debug, info, warn};

use crate::domain::commands::task::{
    ResetTasksResult, TaskProgress, ToggleTaskCommand, ToggleTaskResult,
};
use crate::domain::models::PetRegistry;
use crate::error::PetCareError;
use crate::storage::traits::{KeyValueStore, PetStorage};
use crate::storage::{PersistenceGateway, PetRepository};

/// Service for the active pet's daily checklist
pub struct TaskService<S: KeyValueStore> {
    pet_repository: PetRepository<S>,
}

impl<S: KeyValueStore> TaskService<S> {
    pub fn new(gateway: PersistenceGateway<S>) -> Self {
        Self {
            pet_repository: PetRepository::new(gateway),
        }
    }

    /// Set the completion flag of one task of the active pet and persist the
    /// registry. Returns None when there is no active pet.
    pub fn toggle(
        &self,
        registry: &mut PetRegistry,
        command: ToggleTaskCommand,
    ) -> Result<Option<ToggleTaskResult>, PetCareError> {
        let Some(pet) = registry.active_pet_mut() else {
            debug!("Toggle ignored: no active pet");
            return Ok(None);
        };

        let task_count = pet.task_count();
        let Some(task) = pet.tasks.get_mut(command.task_index) else {
            warn!(
                "Task index {} out of range for pet {} ({} tasks)",
                command.task_index, pet.name, task_count
            );
            return Err(PetCareError::TaskNotFound {
                index: command.task_index,
                pet_name: pet.name.clone(),
                task_count,
            });
        };

        let previous = task.completed;
        task.completed = command.completed;
        let task = task.clone();
        let result = ToggleTaskResult {
            pet_id: pet.id.clone(),
            pet_name: pet.name.clone(),
            task,
            completed_count: pet.completed_count(),
            total: task_count,
            all_completed: pet.all_completed(),
        };

        if let Err(e) = self.pet_repository.store_pets(registry.pets()) {
            if let Some(task) = registry
                .active_pet_mut()
                .and_then(|p| p.tasks.get_mut(command.task_index))
            {
                task.completed = previous;
            }
            warn!("Failed to save task change, reverted: {}", e);
            return Err(e.into());
        }

        info!(
            "Set task '{}' of {} to {} ({}/{})",
            result.task.name,
            result.pet_name,
            command.completed,
            result.completed_count,
            result.total
        );
        Ok(Some(result))
    }

    /// Clear every task of the active pet. History is left untouched.
    pub fn reset_all(
        &self,
        registry: &mut PetRegistry,
    ) -> Result<Option<ResetTasksResult>, PetCareError> {
        let Some(pet) = registry.active_pet_mut() else {
            debug!("Reset ignored: no active pet");
            return Ok(None);
        };

        let before = pet.tasks.clone();
        let cleared = pet.reset_tasks();
        let pet_id = pet.id.clone();
        let pet_name = pet.name.clone();

        if let Err(e) = self.pet_repository.store_pets(registry.pets()) {
            if let Some(pet) = registry.active_pet_mut() {
                pet.tasks = before;
            }
            warn!("Failed to save reset of {}, reverted: {}", pet_name, e);
            return Err(e.into());
        }

        info!("Reset {} tasks of {}", cleared, pet_name);
        Ok(Some(ResetTasksResult { pet_id, cleared }))
    }

    /// True iff the active pet has at least one task and all are done
    pub fn all_completed(&self, registry: &PetRegistry) -> bool {
        registry.active_pet().is_some_and(|p| p.all_completed())
    }

    pub fn progress(&self, registry: &PetRegistry) -> Option<TaskProgress> {
        registry.active_pet().map(|p| TaskProgress {
            completed: p.completed_count(),
            total: p.task_count(),
        })
    }
}
