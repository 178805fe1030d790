//! Blob store adapters.
//!
//! A blob store holds named string values. The record store keeps its whole
//! collection under a single key and only ever reads or replaces that value
//! in full.

mod memory;
mod storage;

pub use memory::MemoryBlobStore;
pub use storage::FileBlobStore;

use crate::error::Result;

/// Key-value backend for serialized collections.
pub trait BlobStore: Send + Sync {
    /// Read the value stored under `key`. Absent keys read as `""`.
    fn get(&self, key: &str) -> Result<String>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: BlobStore + ?Sized> BlobStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
