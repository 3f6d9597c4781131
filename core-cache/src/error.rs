//! # Cache Error Types

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors surfaced by the disk caches and the media cache service.
///
/// Problems local to a single entry (an unreadable payload, one file that
/// refuses to be deleted during eviction) are handled inside the cache and
/// never reach the caller as errors.
#[derive(Error, Debug)]
pub enum CacheError {
    // ========================================================================
    // Caller Errors
    // ========================================================================
    /// The payload can never fit, even with every other entry evicted.
    #[error("Entry '{key}' is too large: {size} bytes exceeds the {max} byte capacity")]
    EntryTooLarge { key: String, size: u64, max: u64 },

    /// Keys must be non-empty.
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Storage Errors
    // ========================================================================
    /// Payload write or directory operation failed.
    #[error("Cache storage error: {0}")]
    Storage(#[from] BridgeError),

    /// The persisted index journal could not be decoded.
    #[error("Cache index corrupted: {0}")]
    IndexCorrupted(String),

    /// Some files survived a wipe; their entries stay indexed.
    #[error("Cache clear incomplete: {removed} entries removed, {failed} could not be deleted")]
    PartialClearFailure { removed: usize, failed: usize },

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    #[error("Cache preferences error: {0}")]
    Preferences(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl CacheError {
    /// Returns `true` if the error was caused by the caller's input rather
    /// than by storage.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            CacheError::EntryTooLarge { .. } | CacheError::InvalidKey(_) | CacheError::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
