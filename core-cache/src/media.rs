//! # Media Cache Service
//!
//! Owns the two disk caches behind the cache settings screen: cover art
//! under `<cache_dir>/images` and song data under `<cache_dir>/audio`.
//! Capacities come from [`CachePreferences`]; changing one persists the
//! choice and applies it immediately.
//!
//! The service is an ordinary value. Create it once at startup and hand an
//! `Arc` of it to whoever needs a cache.

use crate::disk_lru::{ClearReport, DiskCacheConfig, DiskLruCache, EvictionOutcome, UsageReport};
use crate::error::Result;
use crate::preferences::{CacheKind, CachePreferences};
use crate::presets::CacheSizePreset;
use core_runtime::config::CoreConfig;
use core_runtime::events::EventBus;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Usage of both media caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCacheUsage {
    pub images: UsageReport,
    pub audio: UsageReport,
}

impl MediaCacheUsage {
    pub fn get(&self, kind: CacheKind) -> &UsageReport {
        match kind {
            CacheKind::Images => &self.images,
            CacheKind::Audio => &self.audio,
        }
    }

    pub fn total_used_bytes(&self) -> u64 {
        self.images.used_bytes + self.audio.used_bytes
    }
}

/// The image and audio caches plus their size preferences.
#[derive(Debug)]
pub struct MediaCacheService {
    images: DiskLruCache,
    audio: DiskLruCache,
    preferences: CachePreferences,
    event_bus: Arc<EventBus>,
}

impl MediaCacheService {
    /// Open both caches with the capacities stored in preferences.
    #[instrument(skip(config))]
    pub async fn open(config: &CoreConfig) -> Result<Self> {
        config.validate()?;

        let root = config.resolve_cache_dir().await?;
        let preferences = CachePreferences::new(Arc::clone(&config.settings_store));
        let event_bus = Arc::new(EventBus::new(config.event_buffer_size));

        let images = open_cache(config, &root, &preferences, &event_bus, CacheKind::Images).await?;
        let audio = open_cache(config, &root, &preferences, &event_bus, CacheKind::Audio).await?;

        Ok(Self {
            images,
            audio,
            preferences,
            event_bus,
        })
    }

    pub fn cache(&self, kind: CacheKind) -> &DiskLruCache {
        match kind {
            CacheKind::Images => &self.images,
            CacheKind::Audio => &self.audio,
        }
    }

    pub fn preferences(&self) -> &CachePreferences {
        &self.preferences
    }

    /// Bus on which both caches publish their events.
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// The stored preset for `kind`.
    pub async fn max_size(&self, kind: CacheKind) -> Result<CacheSizePreset> {
        self.preferences.max_size(kind).await
    }

    /// Persist a new preset and apply it to the running cache.
    #[instrument(skip(self))]
    pub async fn set_max_size(
        &self,
        kind: CacheKind,
        preset: CacheSizePreset,
    ) -> Result<EvictionOutcome> {
        self.preferences.set_max_size(kind, preset).await?;
        Ok(self.cache(kind).set_capacity(preset.capacity()).await)
    }

    pub fn usage(&self, kind: CacheKind) -> UsageReport {
        self.cache(kind).usage_report()
    }

    pub fn usage_summary(&self) -> MediaCacheUsage {
        MediaCacheUsage {
            images: self.images.usage_report(),
            audio: self.audio.usage_report(),
        }
    }

    /// Wipe one cache.
    pub async fn clear(&self, kind: CacheKind) -> ClearReport {
        self.cache(kind).clear().await
    }

    /// Flush both index journals.
    pub async fn close(self) -> Result<()> {
        self.images.close().await?;
        self.audio.close().await?;
        info!("Media caches closed");
        Ok(())
    }
}

async fn open_cache(
    config: &CoreConfig,
    root: &Path,
    preferences: &CachePreferences,
    event_bus: &Arc<EventBus>,
    kind: CacheKind,
) -> Result<DiskLruCache> {
    let preset = preferences.max_size(kind).await?;
    let cache_config = DiskCacheConfig::new(root.join(kind.as_str()))
        .with_name(kind.as_str())
        .with_capacity(preset.capacity())
        .with_persisted_index(config.persist_index)
        .with_integrity_verification(config.verify_integrity);

    let cache = DiskLruCache::open(cache_config, Arc::clone(&config.file_system))
        .await?
        .with_event_bus(Arc::clone(event_bus));
    info!(cache = %kind, preset = %preset, "Media cache ready");
    Ok(cache)
}
