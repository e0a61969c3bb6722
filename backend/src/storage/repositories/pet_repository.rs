use log::{debug, info};

use crate::domain::models::Pet;
use crate::error::StorageError;
use crate::storage::gateway::PersistenceGateway;
use crate::storage::traits::{KeyValueStore, PetStorage};

/// Repository for pet profiles and the active-pet index
pub struct PetRepository<S: KeyValueStore> {
    gateway: PersistenceGateway<S>,
}

impl<S: KeyValueStore> Clone for PetRepository<S> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<S: KeyValueStore> PetRepository<S> {
    pub fn new(gateway: PersistenceGateway<S>) -> Self {
        Self { gateway }
    }
}

impl<S: KeyValueStore> PetStorage for PetRepository<S> {
    fn load_pets(&self) -> Vec<Pet> {
        let pets: Vec<Pet> = self.gateway.load_or_default(&self.gateway.keys().pets);
        debug!("Loaded {} pets", pets.len());
        pets
    }

    fn store_pets(&self, pets: &[Pet]) -> Result<(), StorageError> {
        self.gateway.save(&self.gateway.keys().pets, pets)?;
        debug!("Stored {} pets", pets.len());
        Ok(())
    }

    fn load_active_index(&self) -> Option<usize> {
        self.gateway.load(&self.gateway.keys().active_pet_index)
    }

    fn store_active_index(&self, index: usize) -> Result<(), StorageError> {
        self.gateway
            .save(&self.gateway.keys().active_pet_index, &index)?;
        info!("Stored active pet index: {}", index);
        Ok(())
    }
}
