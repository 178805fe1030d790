//! Whole-collection import and export.
//!
//! Backups use the same blob format as storage, so a backup file can be
//! imported as-is. Formatted exports are for reading, not for re-import.

use crate::blobs::BlobStore;
use crate::codec;
use crate::error::{Result, StoreError};
use crate::format::ExportFormat;
use crate::store::RecordStore;
use crate::types::{sort_oldest_first, Record, Timestamp};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::FixedOffset;
use tracing::info;

/// MIME type of backup files.
pub const BACKUP_MIME_TYPE: &str = "application/octet-stream";

/// A backup ready to hand to the host for download.
#[derive(Clone, Debug)]
pub struct Backup {
    pub filename: String,
    pub mime_type: &'static str,
    /// Encoded collection, importable with [`RecordStore::import_backup`].
    pub blob: String,
    pub record_count: usize,
}

/// A human-readable export.
#[derive(Clone, Debug)]
pub struct FormattedExport {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
    pub record_count: usize,
}

impl FormattedExport {
    /// Content as base64, for hosts that transfer file bodies as text.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.content.as_bytes())
    }
}

/// Outcome of an import.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records now in the store. Everything stored before is gone.
    pub record_count: usize,
}

/// Which records a formatted export covers.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportSelection {
    /// Everything in the store.
    All,
    /// A caller-supplied subset, such as current search results.
    Records(Vec<Record>),
}

impl ExportSelection {
    /// Parse a selection passed across the host boundary.
    ///
    /// `""` and `"all"` select everything; anything else must be a JSON
    /// array of records.
    pub fn from_json(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "all" => Ok(ExportSelection::All),
            json => Ok(ExportSelection::Records(serde_json::from_str(json)?)),
        }
    }
}

/// Serialize records to JSON for the host.
pub fn records_to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

impl<B: BlobStore> RecordStore<B> {
    /// Export the whole collection as a backup blob.
    pub fn export_backup(&self) -> Result<Backup> {
        let records = self.list_all()?;
        if records.is_empty() {
            return Err(StoreError::NothingToExport);
        }

        let blob = codec::encode(&records)?;
        Ok(Backup {
            filename: format!(
                "{}_backup_{}.data",
                self.config().file_prefix,
                file_timestamp(Timestamp::now(), &self.config().display_offset)
            ),
            mime_type: BACKUP_MIME_TYPE,
            blob,
            record_count: records.len(),
        })
    }

    /// Render records for reading, oldest first.
    pub fn export_formatted(
        &self,
        format: ExportFormat,
        selection: ExportSelection,
    ) -> Result<FormattedExport> {
        let mut records = match selection {
            ExportSelection::All => self.list_all()?,
            ExportSelection::Records(records) => records,
        };
        if records.is_empty() {
            return Err(StoreError::NothingToExport);
        }

        sort_oldest_first(&mut records);

        let offset = self.config().display_offset;
        let formatter = format.formatter(offset);
        Ok(FormattedExport {
            filename: format!(
                "{}_export_{}.{}",
                self.config().file_prefix,
                file_timestamp(Timestamp::now(), &offset),
                formatter.extension()
            ),
            mime_type: formatter.mime_type(),
            content: formatter.render(&records),
            record_count: records.len(),
        })
    }

    /// Replace the whole collection with the contents of a backup.
    ///
    /// The blob is decoded before anything is written, so a bad file leaves
    /// the existing records untouched.
    pub fn import_backup(&self, blob: &str) -> Result<ImportSummary> {
        if blob.trim().is_empty() {
            return Err(StoreError::EmptyImport);
        }

        let records = codec::decode(blob)?;
        let record_count = records.len();
        self.replace_all(records)?;

        info!(record_count, "backup imported");
        Ok(ImportSummary { record_count })
    }
}

/// Stamp used in generated file names, e.g. `20240301_093000`.
fn file_timestamp(at: Timestamp, offset: &FixedOffset) -> String {
    at.to_datetime()
        .with_timezone(offset)
        .format("%Y%m%d_%H%M%S")
        .to_string()
}
