//! # Media Cache Core
//!
//! Bounded disk caches for images and audio with least-recently-used
//! eviction.
//!
//! ## Overview
//!
//! - [`DiskLruCache`] - the engine: get/put, usage accounting, runtime
//!   capacity changes (including unlimited) and full wipe
//! - [`CacheSizePreset`] - the symbolic size choices offered to users
//! - [`CachePreferences`] - stored preset per cache, via `SettingsStore`
//! - [`MediaCacheService`] - the image and audio caches wired together
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_cache::{CacheKind, CacheSizePreset, MediaCacheService};
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .cache_dir("/path/to/cache")
//!     .settings_store(settings)
//!     .build()?;
//! let caches = MediaCacheService::open(&config).await?;
//!
//! caches.cache(CacheKind::Images).put("cover-42", artwork).await?;
//! caches.set_max_size(CacheKind::Audio, CacheSizePreset::Gb1).await?;
//!
//! let usage = caches.usage(CacheKind::Audio);
//! println!("{} bytes used ({:?}%)", usage.used_bytes, usage.percent_used());
//!
//! let report = caches.clear(CacheKind::Images).await;
//! report.into_result()?;
//! ```

pub mod disk_lru;
pub mod error;
pub mod media;
pub mod preferences;
pub mod presets;

pub use disk_lru::{
    CacheEntry, Capacity, ClearReport, DiskCacheConfig, DiskLruCache, EvictionOutcome,
    UsageReport,
};
pub use error::{CacheError, Result};
pub use media::{MediaCacheService, MediaCacheUsage};
pub use preferences::{CacheKind, CachePreferences};
pub use presets::CacheSizePreset;
