//! File-backed blob store.

use super::BlobStore;
use crate::error::{Result, StoreError};
use fs2::FileExt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension for value files.
const BLOB_EXTENSION: &str = "blob";

/// Blob store keeping one file per key in a directory.
///
/// The directory is locked for the lifetime of the store, so two processes
/// cannot interleave load/save cycles on the same data.
pub struct FileBlobStore {
    /// Base directory.
    path: PathBuf,

    /// Lock file for exclusive access.
    _lock_file: File,
}

impl FileBlobStore {
    /// Open a blob directory, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;

        let lock_file = Self::acquire_lock(&path)?;

        Ok(Self {
            path,
            _lock_file: lock_file,
        })
    }

    /// Base directory of this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_file = File::create(path.join("LOCK"))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked)?;

        Ok(lock_file)
    }

    /// Get the file path for a key.
    fn value_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.path.join(format!("{}.{}", key, BLOB_EXTENSION)))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<String> {
        let value_path = self.value_path(key)?;
        match fs::read_to_string(&value_path) {
            Ok(value) => Ok(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let value_path = self.value_path(key)?;
        let tmp_path = value_path.with_extension("tmp");

        // Write aside and rename so readers never see a partial value.
        let mut file = File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, &value_path)?;

        debug!(key, bytes = value.len(), "blob written");
        Ok(())
    }
}
