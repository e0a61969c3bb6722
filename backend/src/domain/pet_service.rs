use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::domain::commands::pet::{CreatePetCommand, CreatePetResult, SelectPetResult};
use crate::domain::models::{Pet, PetRegistry, Task};
use crate::error::PetCareError;
use crate::storage::traits::{KeyValueStore, PetStorage};
use crate::storage::{PersistenceGateway, PetRepository};

const MAX_NAME_LENGTH: usize = 100;

/// Service for the pet registry: loading, creation and selection
pub struct PetService<S: KeyValueStore> {
    pet_repository: PetRepository<S>,
}

impl<S: KeyValueStore> PetService<S> {
    pub fn new(gateway: PersistenceGateway<S>) -> Self {
        Self {
            pet_repository: PetRepository::new(gateway),
        }
    }

    /// Load the stored registry.
    ///
    /// Pets persisted before ids existed are given one and written back so
    /// history can refer to them.
    pub fn load_registry(&self) -> PetRegistry {
        let mut pets = self.pet_repository.load_pets();
        let stored_index = self.pet_repository.load_active_index();

        let mut assigned = 0;
        for pet in pets.iter_mut().filter(|p| p.id.is_empty()) {
            pet.id = Pet::generate_id();
            assigned += 1;
        }
        if assigned > 0 {
            info!("Assigned ids to {} legacy pets", assigned);
            if let Err(e) = self.pet_repository.store_pets(&pets) {
                warn!("Failed to write back pet ids: {}", e);
            }
        }

        let registry = PetRegistry::new(pets, stored_index);
        if let Some(index) = registry.active_index().filter(|i| Some(*i) != stored_index) {
            if stored_index.is_some() {
                warn!(
                    "Stored active pet index {:?} out of range for {} pets, using {}",
                    stored_index,
                    registry.len(),
                    index
                );
            }
            if let Err(e) = self.pet_repository.store_active_index(index) {
                warn!("Failed to write back active pet index: {}", e);
            }
        }
        debug!(
            "Loaded registry: {} pets, active {:?}",
            registry.len(),
            registry.active_index()
        );
        registry
    }

    /// Create a pet from the setup form and append it to the registry
    pub fn add_pet(
        &self,
        registry: &mut PetRegistry,
        command: CreatePetCommand,
        now: DateTime<Utc>,
    ) -> Result<CreatePetResult, PetCareError> {
        info!("Creating pet: name={}, tasks={}", command.name, command.tasks.len());

        self.validate_create_command(&command)?;

        let pet = Pet {
            id: Pet::generate_id(),
            name: command.name.trim().to_string(),
            birthday: command.birthday.trim().to_string(),
            age: command.age,
            tasks: command.tasks.into_iter().map(Task::new).collect(),
            created_at: Some(now),
        };

        let was_empty = registry.is_empty();
        let index = registry.push(pet.clone());
        if let Err(e) = self.pet_repository.store_pets(registry.pets()) {
            registry.remove_last();
            warn!("Failed to save new pet {}, discarded: {}", pet.name, e);
            return Err(e.into());
        }
        // a missing index loads as the first pet, so this is not fatal
        if was_empty {
            if let Err(e) = self.pet_repository.store_active_index(index) {
                warn!("Failed to save active pet index: {}", e);
            }
        }

        info!("Created pet: {} with ID: {}", pet.name, pet.id);

        Ok(CreatePetResult {
            pet,
            index,
            active_index: registry.active_index(),
        })
    }

    /// Make the following pet active, wrapping from last to first
    pub fn select_next(&self, registry: &mut PetRegistry) -> Result<SelectPetResult, PetCareError> {
        let selected = registry.select_next();
        self.persist_selection(registry, selected)
    }

    /// Make the preceding pet active, wrapping from first to last
    pub fn select_previous(
        &self,
        registry: &mut PetRegistry,
    ) -> Result<SelectPetResult, PetCareError> {
        let selected = registry.select_previous();
        self.persist_selection(registry, selected)
    }

    fn persist_selection(
        &self,
        registry: &PetRegistry,
        selected: Option<usize>,
    ) -> Result<SelectPetResult, PetCareError> {
        match selected {
            Some(index) => {
                self.pet_repository.store_active_index(index)?;
                info!("Switched active pet to index {}", index);
                Ok(SelectPetResult {
                    active_index: Some(index),
                    changed: true,
                })
            }
            None => {
                debug!("Pet rotation skipped: {} pets", registry.len());
                Ok(SelectPetResult {
                    active_index: registry.active_index(),
                    changed: false,
                })
            }
        }
    }

    fn validate_create_command(&self, command: &CreatePetCommand) -> Result<(), PetCareError> {
        let name = command.name.trim();
        if name.is_empty() {
            return Err(PetCareError::Validation("Pet name cannot be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(PetCareError::Validation(format!(
                "Pet name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        if !command.age.is_finite() || command.age < 0.0 {
            return Err(PetCareError::Validation(format!(
                "Invalid age: {}",
                command.age
            )));
        }
        Ok(())
    }
}
