use thiserror::Error;

/// Failures of the key-value store and the (de)serialization around it
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by the pet-care operations
#[derive(Debug, Error)]
pub enum PetCareError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("task {index} not found for pet '{pet_name}' ({task_count} tasks)")]
    TaskNotFound {
        index: usize,
        pet_name: String,
        task_count: usize,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
