//! Core types for the memo store.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for a record.
///
/// Rendered from the creation timestamp in nanoseconds, so ids sort the
/// same way records were created.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Build the id for a record created at `timestamp`.
    pub fn from_timestamp(timestamp: Timestamp) -> Self {
        RecordId(timestamp.0.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Nanoseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX))
    }

    /// The next representable instant, if there is one.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Timestamp)
    }

    /// Convert to a calendar time in UTC.
    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_nanos(self.0)
    }

    /// Human-readable rendering, e.g. `2024/03/01 09:30:00`.
    pub fn display_in(self, offset: &FixedOffset) -> String {
        self.to_datetime()
            .with_timezone(offset)
            .format("%Y/%m/%d %H:%M:%S")
            .to_string()
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// A single timestamped note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier, derived from `created_at`.
    pub id: RecordId,

    /// Free text. Stored exactly as given.
    pub content: String,

    /// When the record was created.
    pub created_at: Timestamp,
}

impl Record {
    /// Create a record stamped with an explicit time.
    pub fn at(content: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id: RecordId::from_timestamp(created_at),
            content: content.into(),
            created_at,
        }
    }

    /// Case-insensitive substring match against the content.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.content.to_lowercase().contains(needle)
    }
}

/// Sort records newest first. Ties keep their relative order.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Sort records oldest first. Ties keep their relative order.
pub fn sort_oldest_first(records: &mut [Record]) {
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
}
