//! Capacity presets offered by the cache settings.
//!
//! Users pick a symbolic size; only the resolved [`Capacity`] reaches the
//! cache engine.

use crate::disk_lru::Capacity;
use crate::error::CacheError;
use crate::preferences::CacheKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

/// Maximum size choices for a media cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheSizePreset {
    #[serde(rename = "32MB")]
    Mb32,
    #[serde(rename = "64MB")]
    Mb64,
    #[serde(rename = "128MB")]
    Mb128,
    #[serde(rename = "256MB")]
    Mb256,
    #[serde(rename = "512MB")]
    Mb512,
    #[serde(rename = "1GB")]
    Gb1,
    #[serde(rename = "2GB")]
    Gb2,
    #[serde(rename = "4GB")]
    Gb4,
    #[serde(rename = "8GB")]
    Gb8,
    Unlimited,
}

impl CacheSizePreset {
    /// Every preset, smallest first.
    pub const ALL: [CacheSizePreset; 10] = [
        CacheSizePreset::Mb32,
        CacheSizePreset::Mb64,
        CacheSizePreset::Mb128,
        CacheSizePreset::Mb256,
        CacheSizePreset::Mb512,
        CacheSizePreset::Gb1,
        CacheSizePreset::Gb2,
        CacheSizePreset::Gb4,
        CacheSizePreset::Gb8,
        CacheSizePreset::Unlimited,
    ];

    /// Byte limit for the preset, `None` for unlimited.
    pub fn bytes(self) -> Option<u64> {
        match self {
            CacheSizePreset::Mb32 => Some(32 * MIB),
            CacheSizePreset::Mb64 => Some(64 * MIB),
            CacheSizePreset::Mb128 => Some(128 * MIB),
            CacheSizePreset::Mb256 => Some(256 * MIB),
            CacheSizePreset::Mb512 => Some(512 * MIB),
            CacheSizePreset::Gb1 => Some(GIB),
            CacheSizePreset::Gb2 => Some(2 * GIB),
            CacheSizePreset::Gb4 => Some(4 * GIB),
            CacheSizePreset::Gb8 => Some(8 * GIB),
            CacheSizePreset::Unlimited => None,
        }
    }

    pub fn capacity(self) -> Capacity {
        self.bytes().map_or(Capacity::Unlimited, Capacity::Bounded)
    }

    /// Token stored in preferences.
    pub fn as_str(self) -> &'static str {
        match self {
            CacheSizePreset::Mb32 => "32MB",
            CacheSizePreset::Mb64 => "64MB",
            CacheSizePreset::Mb128 => "128MB",
            CacheSizePreset::Mb256 => "256MB",
            CacheSizePreset::Mb512 => "512MB",
            CacheSizePreset::Gb1 => "1GB",
            CacheSizePreset::Gb2 => "2GB",
            CacheSizePreset::Gb4 => "4GB",
            CacheSizePreset::Gb8 => "8GB",
            CacheSizePreset::Unlimited => "Unlimited",
        }
    }

    /// Default preset for each cache: images 128MB, audio 2GB.
    pub fn default_for(kind: CacheKind) -> Self {
        match kind {
            CacheKind::Images => CacheSizePreset::Mb128,
            CacheKind::Audio => CacheSizePreset::Gb2,
        }
    }
}

impl fmt::Display for CacheSizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheSizePreset {
    type Err = CacheError;

    /// Accepts the stored tokens case-insensitively, with or without a space
    /// before the unit ("512 MB").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        CacheSizePreset::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(&token))
            .ok_or_else(|| CacheError::Preferences(format!("unknown cache size preset: {}", s)))
    }
}
