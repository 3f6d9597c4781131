//! Persisted cache size choices.
//!
//! Reads and writes the selected [`CacheSizePreset`] for each cache through
//! the host's [`SettingsStore`].

use crate::error::{CacheError, Result};
use crate::presets::CacheSizePreset;
use bridge_traits::storage::SettingsStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// The two media caches shown in the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKind {
    /// Cover art and thumbnails
    Images,
    /// Streamed song data
    Audio,
}

impl CacheKind {
    pub const ALL: [CacheKind; 2] = [CacheKind::Images, CacheKind::Audio];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheKind::Images => "images",
            CacheKind::Audio => "audio",
        }
    }

    /// Settings key holding the preset token.
    pub fn settings_key(self) -> &'static str {
        match self {
            CacheKind::Images => "cache.images.max_size",
            CacheKind::Audio => "cache.audio.max_size",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache size preferences backed by a [`SettingsStore`].
#[derive(Clone)]
pub struct CachePreferences {
    store: Arc<dyn SettingsStore>,
}

impl CachePreferences {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// The selected preset, or the default for `kind` when nothing usable is
    /// stored.
    #[instrument(skip(self))]
    pub async fn max_size(&self, kind: CacheKind) -> Result<CacheSizePreset> {
        let key = kind.settings_key();
        let stored = self
            .store
            .get_string(key)
            .await
            .map_err(|e| CacheError::Preferences(format!("failed to read {}: {}", key, e)))?;

        let default = CacheSizePreset::default_for(kind);
        let Some(raw) = stored else {
            debug!(preset = %default, "No stored preset, using default");
            return Ok(default);
        };

        match raw.parse::<CacheSizePreset>() {
            Ok(preset) => Ok(preset),
            Err(e) => {
                warn!(value = %raw, error = %e, preset = %default, "Ignoring stored cache size");
                Ok(default)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn set_max_size(&self, kind: CacheKind, preset: CacheSizePreset) -> Result<()> {
        let key = kind.settings_key();
        self.store
            .set_string(key, preset.as_str())
            .await
            .map_err(|e| CacheError::Preferences(format!("failed to write {}: {}", key, e)))
    }

    /// Forget the stored choice so the default applies again.
    #[instrument(skip(self))]
    pub async fn reset(&self, kind: CacheKind) -> Result<()> {
        let key = kind.settings_key();
        self.store
            .delete(key)
            .await
            .map_err(|e| CacheError::Preferences(format!("failed to delete {}: {}", key, e)))
    }
}

impl fmt::Debug for CachePreferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePreferences")
            .field("store", &"SettingsStore { ... }")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Settings {}

        #[async_trait::async_trait]
        impl SettingsStore for Settings {
            async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()>;
            async fn get_string(&self, key: &str) -> BridgeResult<Option<String>>;
            async fn delete(&self, key: &str) -> BridgeResult<()>;
        }
    }

    fn preferences(store: MockSettings) -> CachePreferences {
        CachePreferences::new(Arc::new(store))
    }

    #[core_async::test]
    async fn test_missing_value_uses_default() {
        let mut store = MockSettings::new();
        store.expect_get_string().returning(|_| Ok(None));

        let prefs = preferences(store);
        assert_eq!(prefs.max_size(CacheKind::Images).await.unwrap(), CacheSizePreset::Mb128);
        assert_eq!(prefs.max_size(CacheKind::Audio).await.unwrap(), CacheSizePreset::Gb2);
    }

    #[core_async::test]
    async fn test_stored_value_is_parsed() {
        let mut store = MockSettings::new();
        store
            .expect_get_string()
            .with(eq("cache.audio.max_size"))
            .returning(|_| Ok(Some("Unlimited".to_string())));

        let prefs = preferences(store);
        assert_eq!(
            prefs.max_size(CacheKind::Audio).await.unwrap(),
            CacheSizePreset::Unlimited
        );
    }

    #[core_async::test]
    async fn test_unparseable_value_falls_back() {
        let mut store = MockSettings::new();
        store
            .expect_get_string()
            .returning(|_| Ok(Some("a lot".to_string())));

        let prefs = preferences(store);
        assert_eq!(prefs.max_size(CacheKind::Images).await.unwrap(), CacheSizePreset::Mb128);
    }

    #[core_async::test]
    async fn test_store_failure_is_reported() {
        let mut store = MockSettings::new();
        store
            .expect_get_string()
            .returning(|_| Err(BridgeError::OperationFailed("locked".to_string())));

        let err = preferences(store).max_size(CacheKind::Audio).await.unwrap_err();
        assert!(matches!(err, CacheError::Preferences(_)));
        assert!(err.to_string().contains("cache.audio.max_size"));
    }

    #[core_async::test]
    async fn test_set_and_reset_write_tokens() {
        let mut store = MockSettings::new();
        store
            .expect_set_string()
            .with(eq("cache.images.max_size"), eq("64MB"))
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_delete()
            .with(eq("cache.images.max_size"))
            .times(1)
            .returning(|_| Ok(()));

        let prefs = preferences(store);
        prefs
            .set_max_size(CacheKind::Images, CacheSizePreset::Mb64)
            .await
            .unwrap();
        prefs.reset(CacheKind::Images).await.unwrap();
    }
}
