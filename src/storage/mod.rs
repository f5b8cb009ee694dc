//! Key-value storage areas that the store persists into.
//!
//! A store never reaches for a global storage object. Callers hand it a
//! [`Storages`] pair (one durable area, one session-scoped area) and the
//! store selects one by [`StorageType`].
//!
//! # Example
//!
//! ```ignore
//! let storages = Storages::on_disk("./scratch")?;
//! let backend = storages.select(StorageType::LocalStorage);
//! backend.set_item("greeting", "\"hello\"")?;
//! ```

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::Result;
use crate::types::StorageType;
use std::path::Path;
use std::sync::Arc;

/// A string key-value storage area.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is a no-op.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Remove every key.
    fn clear(&self) -> Result<()>;
}

/// The two storage areas a store can select from.
#[derive(Clone)]
pub struct Storages {
    local: Arc<dyn StorageBackend>,
    session: Arc<dyn StorageBackend>,
}

impl Storages {
    /// Pair the given local and session areas.
    pub fn new(local: Arc<dyn StorageBackend>, session: Arc<dyn StorageBackend>) -> Self {
        Self { local, session }
    }

    /// Both areas held in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(MemoryStorage::new()))
    }

    /// Durable area backed by files under `path`; session area in memory.
    pub fn on_disk(path: impl AsRef<Path>) -> Result<Self> {
        let local = FileStorage::open(path)?;
        Ok(Self::new(Arc::new(local), Arc::new(MemoryStorage::new())))
    }

    /// Pick the area for a storage type.
    pub fn select(&self, storage_type: StorageType) -> Arc<dyn StorageBackend> {
        match storage_type {
            StorageType::LocalStorage => Arc::clone(&self.local),
            StorageType::SessionStorage => Arc::clone(&self.session),
        }
    }

    /// The persistent area.
    pub fn local(&self) -> &Arc<dyn StorageBackend> {
        &self.local
    }

    /// The per-session area.
    pub fn session(&self) -> &Arc<dyn StorageBackend> {
        &self.session
    }
}

impl Default for Storages {
    fn default() -> Self {
        Self::in_memory()
    }
}
