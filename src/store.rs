//! Record store: the load → mutate → save cycle over a single blob.

use crate::blobs::{BlobStore, MemoryBlobStore};
use crate::codec;
use crate::error::{Result, StoreError};
use crate::types::{sort_newest_first, Record, RecordId, Timestamp};
use chrono::{FixedOffset, Offset, Utc};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Key the collection is stored under by default.
pub const DEFAULT_STORAGE_KEY: &str = "memos";

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Blob store key holding the whole collection.
    pub storage_key: String,

    /// Prefix for generated export file names.
    pub file_prefix: String,

    /// Offset used when rendering timestamps for people.
    pub display_offset: FixedOffset,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            file_prefix: "memos".to_string(),
            display_offset: Utc.fix(),
        }
    }
}

/// The record store.
///
/// Holds no records between calls. Every operation reads the current blob
/// from the backend, and every mutation writes the full collection back.
/// Operations that return a collection return it newest first.
pub struct RecordStore<B: BlobStore = MemoryBlobStore> {
    /// Store configuration.
    config: StoreConfig,

    /// Where the blob lives.
    backend: B,

    /// Serializes load/mutate/save cycles.
    write_lock: Mutex<()>,
}

impl RecordStore<MemoryBlobStore> {
    /// A store over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(MemoryBlobStore::new(), StoreConfig::default())
    }
}

impl<B: BlobStore> RecordStore<B> {
    pub fn new(backend: B, config: StoreConfig) -> Self {
        Self {
            config,
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// A store over `backend` with the default configuration.
    pub fn with_backend(backend: B) -> Self {
        Self::new(backend, StoreConfig::default())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // --- Read Operations ---

    /// All records, newest first.
    ///
    /// A corrupt blob is reported as [`StoreError::Decoding`]; callers that
    /// still want to render something should show an empty list.
    pub fn list_all(&self) -> Result<Vec<Record>> {
        let mut records = self.load()?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Look up a record by exact id.
    pub fn get_by_id(&self, id: &str) -> Result<Record> {
        self.load()?
            .into_iter()
            .find(|record| record.id == *id)
            .ok_or_else(|| StoreError::RecordNotFound(id.into()))
    }

    /// Records whose content contains `query`, ignoring case, newest first.
    ///
    /// The query is trimmed first; a blank query matches nothing.
    pub fn search(&self, query: &str) -> Result<Vec<Record>> {
        let records = self.load()?;

        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        let mut results: Vec<Record> = records
            .into_iter()
            .filter(|record| record.matches_lowercase(&needle))
            .collect();
        sort_newest_first(&mut results);
        Ok(results)
    }

    // --- Mutating Operations ---

    /// Add a record and return the updated collection.
    ///
    /// `content` is trimmed; blank content is rejected. If the existing blob
    /// cannot be decoded it is replaced: the unreadable records are lost and
    /// the new record becomes the only one.
    pub fn add(&self, content: &str) -> Result<Vec<Record>> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let _lock = self.write_lock.lock();

        let mut records = match self.load() {
            Ok(records) => records,
            Err(StoreError::Decoding(reason)) => {
                warn!(%reason, "stored collection is unreadable, starting a fresh one");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let record = Record::at(content, fresh_timestamp(&records));
        debug!(id = %record.id, "adding record");
        records.insert(0, record);
        sort_newest_first(&mut records);

        self.save(&records)?;
        Ok(records)
    }

    /// Delete the record with exactly this id and return what remains.
    ///
    /// Deleting an unknown id is not an error; the collection is returned
    /// unchanged and nothing is written.
    pub fn delete_by_id(&self, id: &str) -> Result<Vec<Record>> {
        let _lock = self.write_lock.lock();

        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| record.id != *id);
        sort_newest_first(&mut records);

        if records.len() == before {
            debug!(id, "no record to delete");
            return Ok(records);
        }

        self.save(&records)?;
        debug!(id, "record deleted");
        Ok(records)
    }

    /// Replace the whole collection with `records`, as given.
    ///
    /// Whatever was stored before is discarded, readable or not.
    pub fn replace_all(&self, records: Vec<Record>) -> Result<()> {
        let _lock = self.write_lock.lock();
        self.save(&records)?;
        info!(count = records.len(), "collection replaced");
        Ok(())
    }

    // --- Persistence ---

    fn load(&self) -> Result<Vec<Record>> {
        let blob = self.backend.get(&self.config.storage_key)?;
        codec::decode(&blob)
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        let blob = codec::encode(records)?;
        self.backend.set(&self.config.storage_key, &blob)
    }
}

/// A creation time whose id no stored record carries.
///
/// Normally the current time. If the clock is not past the newest record,
/// the instant after it. If that would overflow, the latest free instant
/// at or below it.
fn fresh_timestamp(records: &[Record]) -> Timestamp {
    let now = Timestamp::now();
    let mut candidate = match records.iter().map(|r| r.created_at).max() {
        Some(newest) if now <= newest => newest.next().unwrap_or(newest),
        _ => now,
    };

    loop {
        let id = RecordId::from_timestamp(candidate);
        if !records.iter().any(|r| r.id == id) {
            return candidate;
        }
        candidate = Timestamp(candidate.0.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.content.as_str()).collect()
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let store = RecordStore::in_memory();
        assert!(store.list_all().unwrap().is_empty());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_add_returns_newest_first() {
        let store = RecordStore::in_memory();
        store.add("buy milk").unwrap();
        let records = store.add("call mom").unwrap();
        assert_eq!(contents(&records), vec!["call mom", "buy milk"]);
        assert_eq!(contents(&store.list_all().unwrap()), vec!["call mom", "buy milk"]);
    }

    #[test]
    fn test_add_trims_and_rejects_blank() {
        let store = RecordStore::in_memory();
        let records = store.add("  note \n").unwrap();
        assert_eq!(records[0].content, "note");

        assert!(matches!(store.add("   "), Err(StoreError::EmptyContent)));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_add_ids_unique_and_increasing() {
        let store = RecordStore::in_memory();
        for i in 0..20 {
            store.add(&format!("note {}", i)).unwrap();
        }
        let records = store.list_all().unwrap();
        for pair in records.windows(2) {
            assert!(pair[0].created_at > pair[1].created_at);
            assert_ne!(pair[0].id, pair[1].id);
        }
    }

    #[test]
    fn test_add_after_future_timestamp() {
        let store = RecordStore::in_memory();
        let future = Timestamp(i64::MAX - 10);
        store.replace_all(vec![Record::at("from the future", future)]).unwrap();

        let records = store.add("now").unwrap();
        assert_eq!(records[0].content, "now");
        assert_eq!(records[0].created_at, future.next().unwrap());
    }

    #[test]
    fn test_add_after_max_timestamp_gets_unused_id() {
        let store = RecordStore::in_memory();
        store
            .replace_all(vec![Record::at("max", Timestamp(i64::MAX))])
            .unwrap();

        store.add("one").unwrap();
        let records = store.add("two").unwrap();
        assert_eq!(records.len(), 3);

        let mut ids: Vec<_> = records.iter().map(|r| r.id.as_str().to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(store.get_by_id(&(i64::MAX - 1).to_string()).is_ok());
        assert!(store.get_by_id(&(i64::MAX - 2).to_string()).is_ok());
    }

    #[test]
    fn test_add_skips_id_taken_by_imported_record() {
        let store = RecordStore::in_memory();
        let newest = Timestamp(i64::MAX - 2);
        // Imported ids are not validated against their timestamps.
        let squatter = Record {
            id: RecordId::from_timestamp(newest.next().unwrap()),
            content: "squatter".into(),
            created_at: Timestamp(10),
        };
        store
            .replace_all(vec![squatter, Record::at("newest", newest)])
            .unwrap();

        let records = store.add("fresh").unwrap();
        let fresh = records.iter().find(|r| r.content == "fresh").unwrap();
        assert_eq!(fresh.created_at, Timestamp(i64::MAX - 3));

        let mut ids: Vec<_> = records.iter().map(|r| r.id.as_str().to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_add_recovers_from_corrupt_blob() {
        let store = RecordStore::in_memory();
        store.backend().set(DEFAULT_STORAGE_KEY, "%%% not a blob %%%").unwrap();

        assert!(matches!(store.list_all(), Err(StoreError::Decoding(_))));

        let records = store.add("fresh start").unwrap();
        assert_eq!(contents(&records), vec!["fresh start"]);
        assert_eq!(contents(&store.list_all().unwrap()), vec!["fresh start"]);
    }

    #[test]
    fn test_delete_by_id() {
        let store = RecordStore::in_memory();
        store.add("buy milk").unwrap();
        let records = store.add("call mom").unwrap();
        let milk = records[1].id.clone();

        let remaining = store.delete_by_id(milk.as_str()).unwrap();
        assert_eq!(contents(&remaining), vec!["call mom"]);
        assert_eq!(contents(&store.list_all().unwrap()), vec!["call mom"]);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let store = RecordStore::in_memory();
        store.add("keep me").unwrap();
        let before = store.backend().get(DEFAULT_STORAGE_KEY).unwrap();

        let records = store.delete_by_id("does-not-exist").unwrap();
        assert_eq!(contents(&records), vec!["keep me"]);
        assert_eq!(store.backend().get(DEFAULT_STORAGE_KEY).unwrap(), before);
    }

    #[test]
    fn test_delete_requires_exact_id() {
        let store = RecordStore::in_memory();
        store
            .replace_all(vec![Record::at("a", Timestamp(123456))])
            .unwrap();
        let records = store.delete_by_id("123").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_get_by_id() {
        let store = RecordStore::in_memory();
        let records = store.add("find me").unwrap();
        let id = records[0].id.clone();

        assert_eq!(store.get_by_id(id.as_str()).unwrap().content, "find me");

        let missing = store.get_by_id("nope");
        assert!(matches!(missing, Err(StoreError::RecordNotFound(ref id)) if *id == RecordId::from("nope")));
    }

    #[test]
    fn test_search() {
        let store = RecordStore::in_memory();
        store.add("buy milk").unwrap();
        store.add("call mom").unwrap();
        store.add("Mom's birthday").unwrap();

        assert_eq!(contents(&store.search("MOM").unwrap()), vec!["Mom's birthday", "call mom"]);
        assert_eq!(contents(&store.search("  milk ").unwrap()), vec!["buy milk"]);
        assert!(store.search("xyz").unwrap().is_empty());
        assert!(store.search("").unwrap().is_empty());
        assert!(store.search("   ").unwrap().is_empty());
    }

    #[test]
    fn test_reads_surface_corruption() {
        let store = RecordStore::in_memory();
        store.backend().set(DEFAULT_STORAGE_KEY, "AAAA").unwrap();

        assert!(matches!(store.list_all(), Err(StoreError::Decoding(_))));
        assert!(matches!(store.search("x"), Err(StoreError::Decoding(_))));
        assert!(matches!(store.search(""), Err(StoreError::Decoding(_))));
        assert!(matches!(store.get_by_id("1"), Err(StoreError::Decoding(_))));
        assert!(matches!(store.delete_by_id("1"), Err(StoreError::Decoding(_))));
    }

    #[test]
    fn test_replace_all_discards_previous() {
        let store = RecordStore::in_memory();
        store.add("old").unwrap();

        store
            .replace_all(vec![
                Record::at("older import", Timestamp(10)),
                Record::at("newer import", Timestamp(20)),
            ])
            .unwrap();

        assert_eq!(
            contents(&store.list_all().unwrap()),
            vec!["newer import", "older import"]
        );
    }

    #[test]
    fn test_custom_storage_key() {
        let config = StoreConfig {
            storage_key: "other".into(),
            ..Default::default()
        };
        let store = RecordStore::new(MemoryBlobStore::new(), config);
        store.add("x").unwrap();
        assert_eq!(store.backend().get(DEFAULT_STORAGE_KEY).unwrap(), "");
        assert!(!store.backend().get("other").unwrap().is_empty());
    }
}
