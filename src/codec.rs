//! Blob codec.
//!
//! A collection is stored as a small binary container wrapped in standard
//! base64 so it fits in a text-only key-value entry and can be downloaded
//! as a backup file.
//!
//! Container layout:
//!
//! ```text
//! magic "MEM\0" | version u8 | crc32(payload) u32 le | payload
//! ```
//!
//! The payload is the record sequence as named-field MessagePack.

use crate::error::{Result, StoreError};
use crate::types::Record;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

/// Magic bytes for the container.
const CONTAINER_MAGIC: &[u8; 4] = b"MEM\0";

/// Current container format version.
const CONTAINER_VERSION: u8 = 1;

/// magic + version + checksum
const HEADER_SIZE: usize = 4 + 1 + 4;

/// Encode a record sequence into a printable blob.
///
/// Order is preserved; the empty sequence encodes to a valid, non-empty blob.
pub fn encode(records: &[Record]) -> Result<String> {
    let payload = rmp_serde::to_vec_named(records)?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(CONTAINER_MAGIC);
    bytes.push(CONTAINER_VERSION);
    bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    bytes.extend_from_slice(&payload);

    Ok(BASE64.encode(bytes))
}

/// Decode a blob produced by [`encode`].
///
/// An empty blob, or a container that ends before any payload, is an empty
/// collection. Anything else that fails to parse is [`StoreError::Decoding`].
pub fn decode(blob: &str) -> Result<Vec<Record>> {
    // Backup files may be wrapped or carry a trailing newline.
    let text: String = blob.chars().filter(|c| *c != '\r' && *c != '\n').collect();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let bytes = BASE64.decode(text.as_bytes())?;
    decode_container(&bytes)
}

fn decode_container(bytes: &[u8]) -> Result<Vec<Record>> {
    if bytes.is_empty() {
        debug!("blob decoded to zero bytes, treating as empty collection");
        return Ok(Vec::new());
    }

    if bytes.len() < HEADER_SIZE {
        return Err(StoreError::Decoding(format!(
            "truncated header: {} bytes",
            bytes.len()
        )));
    }

    let (header, payload) = bytes.split_at(HEADER_SIZE);
    if &header[0..4] != CONTAINER_MAGIC {
        return Err(StoreError::Decoding("invalid container magic".into()));
    }

    match header[4] {
        1 => decode_v1(&header[5..9], payload),
        version => Err(StoreError::Decoding(format!(
            "unsupported container version: {}",
            version
        ))),
    }
}

fn decode_v1(checksum_bytes: &[u8], payload: &[u8]) -> Result<Vec<Record>> {
    if payload.is_empty() {
        debug!("container has no payload, treating as empty collection");
        return Ok(Vec::new());
    }

    let mut stored = [0u8; 4];
    stored.copy_from_slice(checksum_bytes);
    let expected = u32::from_le_bytes(stored);
    let got = crc32fast::hash(payload);
    if expected != got {
        return Err(StoreError::Decoding(format!(
            "checksum mismatch: expected {}, got {}",
            expected, got
        )));
    }

    let records: Vec<Record> = rmp_serde::from_slice(payload)?;
    Ok(records)
}
