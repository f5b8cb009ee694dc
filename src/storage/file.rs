//! Directory-backed storage area.

use super::StorageBackend;
use crate::error::{Result, StoreError};
use fs2::FileExt;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Lock file guarding the directory.
const LOCK_FILE: &str = "LOCK";

/// Extension for item files.
const ITEM_EXT: &str = "item";

/// Storage area with one file per key.
///
/// File names are the hex encoding of the key, so any key string is
/// allowed. Values are stored verbatim. Each write goes to its own temp
/// file in the directory and is renamed over the item, so concurrent
/// writers of one key never see a partial value. The directory is held
/// under an exclusive lock for as long as the storage is open.
pub struct FileStorage {
    /// Base directory.
    path: PathBuf,

    /// Lock file for exclusive access.
    _lock_file: File,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;

        let lock_file = Self::acquire_lock(&path)?;

        tracing::debug!("Opened file storage at {:?}", path);

        Ok(Self {
            path,
            _lock_file: lock_file,
        })
    }

    /// Base directory of this storage.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored keys, in no particular order.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry_path = entry?.path();
            if entry_path.extension().and_then(|e| e.to_str()) != Some(ITEM_EXT) {
                continue;
            }
            let Some(stem) = entry_path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let bytes = hex::decode(stem)
                .map_err(|e| StoreError::Storage(format!("Bad item file name {}: {}", stem, e)))?;
            let key = String::from_utf8(bytes)
                .map_err(|e| StoreError::Storage(format!("Bad item key {}: {}", stem, e)))?;
            keys.push(key);
        }
        Ok(keys)
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.path
            .join(format!("{}.{}", hex::encode(key.as_bytes()), ITEM_EXT))
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_path = path.join(LOCK_FILE);
        let lock_file = File::create(lock_path)?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked)?;

        Ok(lock_file)
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.item_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.path)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;

        tmp.persist(self.item_path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.item_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<()> {
        for key in self.keys()? {
            self.remove_item(&key)?;
        }
        Ok(())
    }
}
