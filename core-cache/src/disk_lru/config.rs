//! Disk cache configuration and capacity bounds

use crate::error::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Capacity used when none is configured (256 MiB).
pub const DEFAULT_CAPACITY_BYTES: u64 = 256 * 1024 * 1024;

/// Upper bound on total cached bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    /// Never evict.
    Unlimited,
    /// Evict least-recently-used entries to stay at or below this many bytes.
    Bounded(u64),
}

impl Capacity {
    /// The byte limit, or `None` when unlimited.
    pub fn max_bytes(&self) -> Option<u64> {
        match self {
            Capacity::Unlimited => None,
            Capacity::Bounded(max) => Some(*max),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Capacity::Unlimited)
    }

    /// Whether a single payload of `size` bytes can ever be stored.
    pub fn admits(&self, size: u64) -> bool {
        self.max_bytes().map_or(true, |max| size <= max)
    }

    /// Whether `bytes` in use breaks the bound.
    pub(crate) fn is_exceeded_by(&self, bytes: u64) -> bool {
        self.max_bytes().map_or(false, |max| bytes > max)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Unlimited => write!(f, "unlimited"),
            Capacity::Bounded(max) => write!(f, "{} bytes", max),
        }
    }
}

/// Configuration for a [`DiskLruCache`](super::DiskLruCache).
#[derive(Debug, Clone)]
pub struct DiskCacheConfig {
    /// Name used in logs and events (e.g. "images", "audio")
    pub name: String,

    /// Directory owned exclusively by the cache
    pub directory: PathBuf,

    /// Initial capacity (default: 256 MiB)
    pub capacity: Capacity,

    /// Keep `index.json` so recency survives restarts (default: true)
    pub persist_index: bool,

    /// Check payload digests on read (default: false)
    pub verify_integrity: bool,
}

impl DiskCacheConfig {
    /// Create a configuration for a cache rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            name: "disk-cache".to_string(),
            directory: directory.into(),
            capacity: Capacity::Bounded(DEFAULT_CAPACITY_BYTES),
            persist_index: true,
            verify_integrity: false,
        }
    }

    /// Set the initial capacity.
    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enable or disable the index journal.
    pub fn with_persisted_index(mut self, enabled: bool) -> Self {
        self.persist_index = enabled;
        self
    }

    /// Enable or disable digest verification on read.
    pub fn with_integrity_verification(mut self, enabled: bool) -> Self {
        self.verify_integrity = enabled;
        self
    }

    /// Set the name reported in logs and events.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CacheError::InvalidConfig(
                "cache name cannot be empty".to_string(),
            ));
        }

        if self.directory.as_os_str().is_empty() {
            return Err(CacheError::InvalidConfig(
                "cache directory cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
