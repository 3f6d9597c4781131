//! Usage reporting and operation outcomes

use super::config::Capacity;
use crate::error::{CacheError, Result};
use serde::{Deserialize, Serialize};

/// Point-in-time view of a cache's space accounting.
///
/// Formatting (human-readable sizes, percentages in a settings row) is left
/// to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Bytes held by committed entries
    pub used_bytes: u64,

    /// Bytes reserved by writes still in flight
    pub reserved_bytes: u64,

    pub capacity: Capacity,

    pub entry_count: usize,
}

impl UsageReport {
    /// The byte limit, or `None` when unlimited.
    pub fn max_bytes(&self) -> Option<u64> {
        self.capacity.max_bytes()
    }

    pub fn is_unlimited(&self) -> bool {
        self.capacity.is_unlimited()
    }

    /// Integer percentage of the capacity in use.
    ///
    /// `None` for an unlimited cache and for a zero-byte bound, where a
    /// percentage has no meaning.
    pub fn percent_used(&self) -> Option<u64> {
        match self.capacity {
            Capacity::Bounded(max) if max > 0 => {
                Some((self.used_bytes as u128 * 100 / max as u128) as u64)
            }
            _ => None,
        }
    }

    /// Bytes that can still be written without evicting anything.
    pub fn available_bytes(&self) -> Option<u64> {
        self.max_bytes()
            .map(|max| max.saturating_sub(self.used_bytes + self.reserved_bytes))
    }
}

/// Result of [`DiskLruCache::clear`](super::DiskLruCache::clear).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearReport {
    /// Entries whose files were deleted (or were already gone)
    pub removed: usize,

    pub freed_bytes: u64,

    /// Entries whose files could not be deleted. Those that were not
    /// replaced during the wipe remain indexed.
    pub failed_keys: Vec<String>,
}

impl ClearReport {
    pub fn is_complete(&self) -> bool {
        self.failed_keys.is_empty()
    }

    /// Turns a partial wipe into [`CacheError::PartialClearFailure`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(CacheError::PartialClearFailure {
                removed: self.removed,
                failed: self.failed_keys.len(),
            })
        }
    }
}

/// Entries removed to satisfy the capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvictionOutcome {
    /// Least recent first
    pub evicted_keys: Vec<String>,
    pub freed_bytes: u64,
}

impl EvictionOutcome {
    pub fn is_empty(&self) -> bool {
        self.evicted_keys.is_empty()
    }
}
