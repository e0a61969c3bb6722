//! # Storage Module
//!
//! Persists pets, the active-pet pointer, the rollover marker and the
//! completion history in a string key-value store.
//!
//! ## Layers
//!
//! - **kv**: raw stores (`FileStore` on disk, `MemoryStore` in memory)
//! - **gateway**: typed JSON load/save over any store; malformed records load as absent
//! - **repositories**: one repository per record, each behind a storage trait
//!
//! Every save is synchronous and happens before the calling operation
//! returns. Records are independent: nothing reconciles them after a crash
//! between two saves.

pub mod gateway;
pub mod kv;
pub mod repositories;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use gateway::{PersistenceGateway, StorageKeys, DEFAULT_KEY_PREFIX};
pub use kv::{FileStore, MemoryStore};
pub use repositories::{HistoryRepository, PetRepository, ResetMarkerRepository};
pub use traits::{HistoryStorage, KeyValueStore, PetStorage, ResetMarkerStorage};
