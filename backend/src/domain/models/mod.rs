//! Domain models: the state the services mutate and persist.

pub mod history;
pub mod pet;

pub use history::{HistoryEntry, HistoryLedger, Upsert};
pub use pet::{Pet, PetRegistry, Task};
