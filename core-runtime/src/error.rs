//! Runtime setup errors: configuration, missing host capabilities and
//! bridge failures while resolving the cache root.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid [`CoreConfig`](crate::config::CoreConfig) or logging setup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The host did not inject a bridge the caches need.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Cache directory unavailable: {0}")]
    CacheDirectory(#[from] bridge_traits::BridgeError),
}

pub type Result<T> = std::result::Result<T, Error>;
