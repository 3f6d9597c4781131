//! Index entries and on-disk naming.
//!
//! Payload files live flat in the cache directory as
//! `<sha256(key)>-<generation>.blob`. The generation comes from the cache's
//! sequence counter, so two writes of the same key never share a file name.
//! In-flight writes use the same stem with a `.tmp` extension.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub(crate) const BLOB_EXTENSION: &str = "blob";
pub(crate) const TMP_EXTENSION: &str = "tmp";

/// Metadata for one cached payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub size_bytes: u64,
    /// Higher means more recently used. Unique across live entries.
    pub last_access_sequence: u64,
    /// Payload file name inside the cache directory
    pub file_name: String,
    /// SHA-256 of the payload, recorded when integrity checks are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// Unix seconds
    pub created_at: i64,
}

impl CacheEntry {
    /// Whether `data` matches the recorded size and, when present, digest.
    pub(crate) fn check_payload(&self, data: &[u8], verify_digest: bool) -> Result<(), String> {
        if data.len() as u64 != self.size_bytes {
            return Err(format!(
                "size mismatch: indexed {} bytes, read {}",
                self.size_bytes,
                data.len()
            ));
        }

        if verify_digest {
            if let Some(expected) = &self.content_hash {
                let actual = content_digest(data);
                if &actual != expected {
                    return Err(format!("digest mismatch: expected {}, got {}", expected, actual));
                }
            }
        }

        Ok(())
    }
}

/// Hex SHA-256 of a payload.
pub(crate) fn content_digest(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn key_stem(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

pub(crate) fn blob_file_name(key: &str, generation: u64) -> String {
    format!("{}-{}.{}", key_stem(key), generation, BLOB_EXTENSION)
}

pub(crate) fn tmp_file_name(key: &str, generation: u64) -> String {
    format!("{}-{}.{}", key_stem(key), generation, TMP_EXTENSION)
}

/// Files the cache created and may sweep: payloads and leftovers of
/// interrupted writes.
pub(crate) fn is_cache_artifact(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map_or(false, |(_, ext)| ext == BLOB_EXTENSION || ext == TMP_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(data: &[u8], hash: bool) -> CacheEntry {
        CacheEntry {
            key: "cover-1".to_string(),
            size_bytes: data.len() as u64,
            last_access_sequence: 1,
            file_name: blob_file_name("cover-1", 1),
            content_hash: hash.then(|| content_digest(data)),
            created_at: 0,
        }
    }

    #[test]
    fn test_file_names_are_unique_per_generation() {
        let first = blob_file_name("song-1", 1);
        let second = blob_file_name("song-1", 2);
        assert_ne!(first, second);
        assert!(first.ends_with("-1.blob"));
        assert_eq!(first.len(), 64 + "-1.blob".len());
        assert!(tmp_file_name("song-1", 1).ends_with("-1.tmp"));
    }

    #[test]
    fn test_cache_artifacts() {
        assert!(is_cache_artifact(&blob_file_name("a", 3)));
        assert!(is_cache_artifact(&tmp_file_name("a", 3)));
        assert!(is_cache_artifact("index-9.tmp"));
        assert!(!is_cache_artifact("index.json"));
        assert!(!is_cache_artifact("README"));
    }

    #[test]
    fn test_check_payload_size() {
        let e = entry(b"hello", false);
        assert!(e.check_payload(b"hello", true).is_ok());
        let err = e.check_payload(b"hell", false).unwrap_err();
        assert!(err.contains("size mismatch"));
    }

    #[test]
    fn test_check_payload_digest() {
        let e = entry(b"hello", true);
        assert!(e.check_payload(b"hello", true).is_ok());
        assert!(e.check_payload(b"jello", true).unwrap_err().contains("digest"));
        // Digest ignored when verification is off
        assert!(e.check_payload(b"jello", false).is_ok());
    }
}
