//! # Storage Traits
//!
//! Storage abstractions the domain layer is written against. The raw
//! [`KeyValueStore`] holds strings under string keys; the per-record traits
//! describe what each repository loads and saves on top of it.
//!
//! Loads never fail: an absent or unreadable record comes back as its empty
//! default. Saves are synchronous and report failures.

use chrono::NaiveDate;

use crate::domain::models::{HistoryEntry, Pet};
use crate::error::StorageError;

/// A string-keyed, string-valued persistence store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, None if nothing is stored
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Pet profiles and the active-pet pointer
pub trait PetStorage: Send + Sync {
    /// Load all pets in insertion order
    fn load_pets(&self) -> Vec<Pet>;

    /// Persist the full pet list
    fn store_pets(&self, pets: &[Pet]) -> Result<(), StorageError>;

    /// Load the stored active-pet index, if any
    fn load_active_index(&self) -> Option<usize>;

    /// Persist the active-pet index
    fn store_active_index(&self, index: usize) -> Result<(), StorageError>;
}

/// The daily completion history
pub trait HistoryStorage: Send + Sync {
    /// Load entries in storage (chronological) order
    fn load_history(&self) -> Vec<HistoryEntry>;

    /// Persist the full history list
    fn store_history(&self, entries: &[HistoryEntry]) -> Result<(), StorageError>;
}

/// The local day the nightly reset was last applied
pub trait ResetMarkerStorage: Send + Sync {
    /// Load the marker; a missing or malformed marker is None
    fn load_last_reset(&self) -> Option<NaiveDate>;

    /// Persist the marker
    fn store_last_reset(&self, day: NaiveDate) -> Result<(), StorageError>;
}
