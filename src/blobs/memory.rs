//! In-process blob store.

use super::BlobStore;
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Blob store backed by a hash map. Never fails.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<String> {
        Ok(self.values.read().get(key).cloned().unwrap_or_default())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
