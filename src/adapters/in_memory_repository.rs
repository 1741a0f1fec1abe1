//! In-memory value table repository for testing.
//!
//! This adapter provides a pure in-memory implementation of ValueMapRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::ValueMapRepository, td_learning::SavedValueMap};

/// In-memory repository for testing.
///
/// Tables are stored MessagePack-encoded, so a round trip goes through the
/// same serde path as the file adapters.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use tictactoe_td::adapters::InMemoryRepository;
/// use tictactoe_td::ports::ValueMapRepository;
/// use tictactoe_td::td_learning::{SavedValueMap, TrainingMetadata, ValueMap};
///
/// let repo = InMemoryRepository::new();
/// let table = SavedValueMap::new(ValueMap::default(), TrainingMetadata::default());
///
/// repo.save(&table, Path::new("values"))?;
/// let loaded = repo.load(Path::new("values"))?;
/// assert_eq!(loaded, table);
/// # Ok::<(), tictactoe_td::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored tables.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&Self::key(path))
    }

    /// Store raw bytes under `path`, e.g. to simulate a corrupt file.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.storage().insert(Self::key(path), bytes);
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ValueMapRepository for InMemoryRepository {
    fn save(&self, table: &SavedValueMap, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(table).map_err(|e| Error::SerializationContext {
            operation: "serialize value table for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(Self::key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedValueMap> {
        let storage = self.storage();

        let bytes = storage.get(&Self::key(path)).ok_or_else(|| Error::Io {
            operation: format!("load value table from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize value table from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}
