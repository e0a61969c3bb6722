//! # File Store
//!
//! Keeps each key in its own file under the data directory:
//!
//! ```text
//! data/
//! ├── pawfect.yaml                  (configuration, see config.rs)
//! ├── pawfect_pets.json
//! ├── pawfect_active-pet-index.json
//! ├── pawfect_last-reset-day.json
//! └── pawfect_history.json
//! ```
//!
//! Writes go to a temp file first and are renamed into place, so a crash
//! mid-write leaves the previous value intact.

use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::validate_key;
use crate::error::StorageError;
use crate::storage::traits::KeyValueStore;

/// File-per-key store rooted at a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_directory: PathBuf,
}

impl FileStore {
    /// Open a store in `base_directory`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self, StorageError> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {:?}", base_path);
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_directory.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}
