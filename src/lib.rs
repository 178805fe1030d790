//! # Memo Store
//!
//! Timestamped text notes kept as a single encoded blob in a key-value
//! store.
//!
//! ## Core Concepts
//!
//! - **Records**: a note with an id, its text, and a creation time
//! - **Blob**: the whole collection encoded as one printable string
//! - **Blob stores**: where the blob lives (in memory, or a file per key)
//! - **Transfer**: backups in the blob format, plus text/Markdown exports
//!
//! Every operation reads the blob, works on the decoded collection, and
//! (for mutations) writes the whole collection back. Collections come back
//! newest first.
//!
//! ## Example
//!
//! ```
//! use memo_store::RecordStore;
//!
//! let store = RecordStore::in_memory();
//! store.add("buy milk")?;
//! store.add("call mom")?;
//!
//! let hits = store.search("MOM")?;
//! assert_eq!(hits[0].content, "call mom");
//!
//! let backup = store.export_backup()?;
//! let restored = RecordStore::in_memory();
//! restored.import_backup(&backup.blob)?;
//! assert_eq!(restored.len()?, 2);
//! # Ok::<(), memo_store::StoreError>(())
//! ```

pub mod blobs;
pub mod codec;
pub mod error;
pub mod format;
pub mod store;
pub mod transfer;
pub mod types;

// Re-exports
pub use blobs::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use error::{Result, StoreError};
pub use format::{ExportFormat, MarkdownFormatter, PlainTextFormatter, RecordFormatter};
pub use store::{RecordStore, StoreConfig, DEFAULT_STORAGE_KEY};
pub use transfer::{
    records_to_json, Backup, ExportSelection, FormattedExport, ImportSummary, BACKUP_MIME_TYPE,
};
pub use types::*;
