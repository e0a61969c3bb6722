//! Domain-level command and result types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed to the rendering layer. `io::mappers` converts between them and
//! the DTOs in the `shared` crate.

pub mod pet {
    use crate::domain::models::Pet;

    /// Input for creating a new pet from the setup form.
    #[derive(Debug, Clone)]
    pub struct CreatePetCommand {
        pub name: String,
        pub birthday: String,
        pub age: f64,
        /// Task names in display order
        pub tasks: Vec<String>,
    }

    /// Result of creating a pet.
    #[derive(Debug, Clone)]
    pub struct CreatePetResult {
        pub pet: Pet,
        /// Position of the new pet in the registry
        pub index: usize,
        pub active_index: Option<usize>,
    }

    /// Result of rotating the active pet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SelectPetResult {
        pub active_index: Option<usize>,
        /// False when the rotation was a no-op (fewer than two pets)
        pub changed: bool,
    }
}

pub mod task {
    use crate::domain::models::Task;

    /// Input for checking or unchecking one task of the active pet.
    #[derive(Debug, Clone, Copy)]
    pub struct ToggleTaskCommand {
        pub task_index: usize,
        pub completed: bool,
    }

    /// Result of a toggle, with the post-toggle counts the history needs.
    #[derive(Debug, Clone)]
    pub struct ToggleTaskResult {
        pub pet_id: String,
        pub pet_name: String,
        pub task: Task,
        pub completed_count: usize,
        pub total: usize,
        pub all_completed: bool,
    }

    /// Result of resetting the active pet's day.
    #[derive(Debug, Clone)]
    pub struct ResetTasksResult {
        pub pet_id: String,
        pub cleared: usize,
    }

    /// Completed and total task counts for one pet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TaskProgress {
        pub completed: usize,
        pub total: usize,
    }
}

pub mod history {
    use chrono::NaiveDate;

    use crate::domain::models::Upsert;

    /// Input for recording a day's summary for a pet.
    #[derive(Debug, Clone)]
    pub struct RecordHistoryCommand {
        pub date: NaiveDate,
        pub pet_id: String,
        pub pet_name: String,
        pub completed: u32,
        pub total: u32,
    }

    /// Result of recording a summary.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RecordHistoryResult {
        pub upsert: Upsert,
        /// Entries dropped by the retention window
        pub pruned: usize,
    }
}
