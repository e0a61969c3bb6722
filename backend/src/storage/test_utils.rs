//! Test utilities shared by the storage and domain unit tests.
//!
//! [`TestEnvironment`] owns a temporary data directory that is removed when
//! the environment is dropped, even if the test panics.

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use crate::domain::clock::FixedClock;
use crate::domain::models::{Pet, Task};
use crate::storage::gateway::{PersistenceGateway, StorageKeys};
use crate::error::StorageError;
use crate::storage::kv::{FileStore, MemoryStore};
use crate::storage::repositories::{HistoryRepository, PetRepository, ResetMarkerRepository};
use crate::storage::traits::KeyValueStore;

/// A file-backed store in a temporary directory
pub struct TestEnvironment {
    pub store: Arc<FileStore>,
    pub gateway: PersistenceGateway<FileStore>,
    /// Data directory path for manual inspection if needed
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let store = Arc::new(FileStore::new(temp_dir.path())?);
        let gateway = PersistenceGateway::new(Arc::clone(&store), StorageKeys::default());
        Ok(Self {
            store,
            gateway,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    pub fn pet_repository(&self) -> PetRepository<FileStore> {
        PetRepository::new(self.gateway.clone())
    }

    pub fn history_repository(&self) -> HistoryRepository<FileStore> {
        HistoryRepository::new(self.gateway.clone())
    }

    pub fn reset_marker_repository(&self) -> ResetMarkerRepository<FileStore> {
        ResetMarkerRepository::new(self.gateway.clone())
    }
}

/// A memory store whose writes can be switched to fail, as on a full disk
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// A gateway with the default keys over this store
    pub fn gateway(self: &Arc<Self>) -> PersistenceGateway<FailingStore> {
        PersistenceGateway::new(Arc::clone(self), StorageKeys::default())
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }
}

/// A local instant, panicking on times that do not exist in the test timezone
pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(y, m, d, h, min, s)
        .earliest()
        .expect("valid local time")
}

/// A clock frozen at the given local instant
pub fn fixed_clock(y: i32, m: u32, d: u32, h: u32, min: u32) -> Arc<FixedClock> {
    Arc::new(FixedClock::new(local(y, m, d, h, min, 0)))
}

/// A pet with fresh id and the given unchecked tasks
pub fn sample_pet(name: &str, tasks: &[&str]) -> Pet {
    Pet {
        id: Pet::generate_id(),
        name: name.to_string(),
        birthday: "2020-04-01".to_string(),
        age: 4.0,
        tasks: tasks.iter().map(|t| Task::new(*t)).collect(),
        created_at: None,
    }
}
