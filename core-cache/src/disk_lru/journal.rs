//! Index journal (`index.json`).
//!
//! A JSON snapshot of the index written next to the payloads. It is only a
//! hint: at open every journal entry is checked against the directory and
//! anything that does not match is dropped.

use super::entry::CacheEntry;
use crate::error::{CacheError, Result};
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub(crate) const INDEX_FILE_NAME: &str = "index.json";
const JOURNAL_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Journal {
    pub version: u32,
    pub next_sequence: u64,
    pub saved_at: i64,
    /// Least recent first
    pub entries: Vec<CacheEntry>,
}

impl Journal {
    pub(crate) fn new(next_sequence: u64, entries: Vec<CacheEntry>) -> Self {
        Self {
            version: JOURNAL_VERSION,
            next_sequence,
            saved_at: chrono::Utc::now().timestamp(),
            entries,
        }
    }

    pub(crate) fn decode(bytes: &[u8]) -> Result<Self> {
        let journal: Journal = serde_json::from_slice(bytes)
            .map_err(|e| CacheError::IndexCorrupted(format!("invalid journal: {}", e)))?;

        if journal.version != JOURNAL_VERSION {
            return Err(CacheError::IndexCorrupted(format!(
                "unsupported journal version {}",
                journal.version
            )));
        }

        Ok(journal)
    }

    pub(crate) fn encode(&self) -> Result<Bytes> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| CacheError::IndexCorrupted(format!("failed to encode journal: {}", e)))
    }
}

/// Reads the journal from `dir`. A missing journal is `Ok(None)`.
pub(crate) async fn load(fs: &dyn FileSystemAccess, dir: &Path) -> Result<Option<Journal>> {
    match fs.read_file(&dir.join(INDEX_FILE_NAME)).await {
        Ok(bytes) => Journal::decode(&bytes).map(Some),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes the journal through `tmp_name` and renames it over `index.json`.
pub(crate) async fn store(
    fs: &dyn FileSystemAccess,
    dir: &Path,
    journal: &Journal,
    tmp_name: &str,
) -> Result<()> {
    let data = journal.encode()?;
    let tmp = dir.join(tmp_name);

    if let Err(e) = fs.write_file(&tmp, data).await {
        fs.delete_file(&tmp).await.ok();
        return Err(e.into());
    }

    if let Err(e) = fs.rename(&tmp, &dir.join(INDEX_FILE_NAME)).await {
        fs.delete_file(&tmp).await.ok();
        return Err(e.into());
    }

    Ok(())
}
