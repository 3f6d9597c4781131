//! # Disk LRU Cache
//!
//! Bounded, disk-backed cache for binary payloads with least-recently-used
//! eviction.
//!
//! ## Locking
//!
//! One `parking_lot::Mutex` guards the [`CacheIndex`]. It is never held
//! across an `.await`: payload I/O happens outside it.
//!
//! - `put` reserves space and evicts under the lock, writes `<name>.tmp` and
//!   renames it without the lock, then commits under the lock. A failed or
//!   abandoned write releases its reservation and never reaches the index.
//! - Files are deleted only after their entries left the index, so a reader
//!   that loses a race observes a clean miss.
//! - `get` reads without the lock and only self-heals an entry that is still
//!   backed by the file it failed to read.

use super::config::{Capacity, DiskCacheConfig};
use super::entry::{self, CacheEntry};
use super::index::CacheIndex;
use super::journal::{self, Journal, INDEX_FILE_NAME};
use super::stats::{ClearReport, EvictionOutcome, UsageReport};
use crate::error::{CacheError, Result};
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use core_async::runtime;
use core_runtime::events::{CacheEvent, CoreEvent, EventBus, EvictionCause};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Disk-backed LRU cache.
///
/// Owns its directory exclusively. Share it between tasks behind an `Arc`;
/// every operation takes `&self`.
///
/// # Example
///
/// ```rust,ignore
/// use core_cache::{Capacity, DiskCacheConfig, DiskLruCache};
///
/// let config = DiskCacheConfig::new(cache_root.join("images"))
///     .with_name("images")
///     .with_capacity(Capacity::Bounded(128 * 1024 * 1024));
/// let cache = DiskLruCache::open(config, fs).await?;
///
/// if cache.get("cover-42").await?.is_none() {
///     cache.put("cover-42", downloaded).await?;
/// }
/// ```
pub struct DiskLruCache {
    name: String,
    directory: PathBuf,
    persist_index: bool,
    verify_integrity: bool,
    fs: Arc<dyn FileSystemAccess>,
    index: Mutex<CacheIndex>,
    event_bus: Option<Arc<EventBus>>,
}

impl DiskLruCache {
    /// Open (or create) a cache in `config.directory`.
    ///
    /// Restores the index journal when enabled, drops journal entries whose
    /// payload is missing or has the wrong size, deletes payload and temp
    /// files nothing refers to, then applies the configured capacity.
    #[instrument(skip(config, fs), fields(cache = %config.name))]
    pub async fn open(config: DiskCacheConfig, fs: Arc<dyn FileSystemAccess>) -> Result<Self> {
        config.validate()?;
        fs.create_dir_all(&config.directory).await?;

        let mut on_disk: HashMap<String, PathBuf> = HashMap::new();
        for path in fs.list_directory(&config.directory).await? {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                on_disk.insert(name.to_string(), path.clone());
            }
        }

        let mut index = CacheIndex::new(config.capacity);
        let mut stale = Vec::new();

        if config.persist_index {
            match journal::load(fs.as_ref(), &config.directory).await {
                Ok(Some(journal)) => {
                    index.bump_sequence(journal.next_sequence);
                    for entry in journal.entries {
                        let Some(path) = on_disk.get(&entry.file_name) else {
                            debug!(key = %entry.key, "Journal entry has no payload, dropping");
                            continue;
                        };
                        match fs.metadata(path).await {
                            Ok(meta) if !meta.is_directory && meta.size == entry.size_bytes => {
                                on_disk.remove(&entry.file_name);
                                if let Some(replaced) = index.restore(entry) {
                                    stale.push(replaced.file_name);
                                }
                            }
                            _ => {
                                debug!(key = %entry.key, "Journal entry does not match payload, dropping")
                            }
                        }
                    }
                }
                Ok(None) => debug!("No index journal found"),
                Err(e) => warn!(error = %e, "Ignoring unreadable index journal"),
            }
        }

        stale.extend(
            on_disk
                .into_keys()
                .filter(|name| entry::is_cache_artifact(name)),
        );
        let evicted = index.enforce_capacity(None, false);

        let cache = Self {
            name: config.name,
            directory: config.directory,
            persist_index: config.persist_index,
            verify_integrity: config.verify_integrity,
            fs,
            index: Mutex::new(index),
            event_bus: None,
        };

        for file_name in &stale {
            cache.delete_quietly(file_name).await;
        }
        cache.discard_files(&evicted).await;

        let usage = cache.usage_report();
        info!(
            entries = usage.entry_count,
            used_bytes = usage.used_bytes,
            capacity = %usage.capacity,
            swept = stale.len(),
            evicted = evicted.len(),
            "Disk cache opened"
        );

        Ok(cache)
    }

    /// Publish integrity warnings, evictions and wipes on `event_bus`.
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn capacity(&self) -> Capacity {
        self.index.lock().capacity()
    }

    /// Fetch a payload, marking it most recently used.
    ///
    /// A payload that cannot be read back intact is treated as a miss: the
    /// entry is dropped and an integrity warning is logged and published.
    #[instrument(skip(self), fields(cache = %self.name))]
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        validate_key(key)?;

        let entry = { self.index.lock().get(key).cloned() };
        let Some(entry) = entry else {
            debug!("Cache miss");
            return Ok(None);
        };

        let path = self.directory.join(&entry.file_name);
        let reason = match self.fs.read_file(&path).await {
            Ok(data) => match entry.check_payload(&data, self.verify_integrity) {
                Ok(()) => {
                    self.index.lock().touch(key, &entry.file_name);
                    debug!(size = data.len(), "Cache hit");
                    return Ok(Some(data));
                }
                Err(reason) => reason,
            },
            Err(e) => e.to_string(),
        };

        self.heal(key, &entry.file_name, reason).await;
        Ok(None)
    }

    /// Store a payload under `key`, replacing any previous payload.
    ///
    /// Fails with [`CacheError::EntryTooLarge`] when the payload exceeds a
    /// bounded capacity; nothing changes in that case. Other entries are
    /// evicted least-recently-used first to make room; the entry being
    /// written never is.
    #[instrument(skip(self, data), fields(cache = %self.name, size = data.len()))]
    pub async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        validate_key(key)?;
        let size = data.len() as u64;

        let (generation, evicted) = {
            let mut index = self.index.lock();
            if let Capacity::Bounded(max) = index.capacity() {
                if size > max {
                    return Err(too_large(key, size, max));
                }
            }
            let evicted = index.make_room(key, size);
            index.reserve(size);
            (index.allocate_sequence(), evicted)
        };

        let file_name = entry::blob_file_name(key, generation);
        let reservation = Reservation {
            cache: self,
            bytes: size,
            tmp_path: self.directory.join(entry::tmp_file_name(key, generation)),
            final_path: self.directory.join(&file_name),
            settled: false,
        };

        self.evict(evicted, EvictionCause::Insert).await;

        let content_hash = self
            .verify_integrity
            .then(|| entry::content_digest(&data));

        if let Err(e) = self
            .write_payload(&reservation.tmp_path, &reservation.final_path, data)
            .await
        {
            error!(error = %e, "Failed to write cache payload");
            reservation.abandon().await;
            return Err(e.into());
        }

        match reservation.commit(key, file_name.clone(), content_hash) {
            Ok((replaced, evicted)) => {
                if let Some(old) = replaced {
                    self.delete_quietly(&old.file_name).await;
                }
                self.evict(evicted, EvictionCause::Insert).await;
                debug!("Stored cache entry");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Capacity shrank below payload size during write");
                self.delete_quietly(&file_name).await;
                Err(err)
            }
        }
    }

    /// Change the capacity, evicting least-recently-used entries until the
    /// new bound holds. Switching to unlimited never evicts; re-applying the
    /// current capacity does nothing.
    #[instrument(skip(self), fields(cache = %self.name))]
    pub async fn set_capacity(&self, capacity: Capacity) -> EvictionOutcome {
        let evicted = {
            let mut index = self.index.lock();
            if !index.set_capacity(capacity) {
                return EvictionOutcome::default();
            }
            index.enforce_capacity(None, false)
        };

        info!(capacity = %capacity, evicted = evicted.len(), "Cache capacity changed");
        self.emit(CacheEvent::CapacityChanged {
            cache: self.name.clone(),
            max_bytes: capacity.max_bytes(),
        });

        self.evict(evicted, EvictionCause::CapacityReduced).await
    }

    pub fn usage_report(&self) -> UsageReport {
        let index = self.index.lock();
        UsageReport {
            used_bytes: index.used_bytes(),
            reserved_bytes: index.reserved_bytes(),
            capacity: index.capacity(),
            entry_count: index.len(),
        }
    }

    /// Membership test. Does not count as an access.
    pub fn contains(&self, key: &str) -> bool {
        self.index.lock().contains(key)
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.index.lock().keys_by_recency()
    }

    /// Remove one entry. Returns `false` if the key was not cached.
    #[instrument(skip(self), fields(cache = %self.name))]
    pub async fn invalidate(&self, key: &str) -> Result<bool> {
        validate_key(key)?;

        let removed = { self.index.lock().remove(key) };
        match removed {
            Some(entry) => {
                self.delete_quietly(&entry.file_name).await;
                debug!(size = entry.size_bytes, "Invalidated cache entry");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every entry and its payload.
    ///
    /// The index is emptied in one step, then files are deleted. A missing
    /// file counts as deleted. Entries whose files could not be deleted are
    /// put back and listed in [`ClearReport::failed_keys`]. When the key was
    /// written again meanwhile, the old file is retried once and otherwise
    /// kept for deletion by a later eviction or clear.
    #[instrument(skip(self), fields(cache = %self.name))]
    pub async fn clear(&self) -> ClearReport {
        self.retry_deferred_deletes().await;
        let drained = { self.index.lock().drain() };

        let mut report = ClearReport::default();
        let mut survivors = Vec::new();
        for entry in drained {
            if self.delete_quietly(&entry.file_name).await {
                report.removed += 1;
                report.freed_bytes += entry.size_bytes;
            } else {
                survivors.push(entry);
            }
        }

        if !survivors.is_empty() {
            let (superseded, evicted) = {
                let mut index = self.index.lock();
                let mut superseded = Vec::new();
                for entry in survivors {
                    if index.contains(&entry.key) {
                        superseded.push(entry);
                    } else {
                        report.failed_keys.push(entry.key.clone());
                        index.restore(entry);
                    }
                }
                (superseded, index.enforce_capacity(None, false))
            };

            for entry in superseded {
                if self.delete_quietly(&entry.file_name).await {
                    report.removed += 1;
                    report.freed_bytes += entry.size_bytes;
                } else {
                    report.failed_keys.push(entry.key.clone());
                    self.index.lock().defer_delete(entry.file_name);
                }
            }

            self.evict(evicted, EvictionCause::PartialClear).await;
            if !report.failed_keys.is_empty() {
                warn!(failed = report.failed_keys.len(), "Cache clear left files behind");
            }
        }

        info!(
            removed = report.removed,
            freed_bytes = report.freed_bytes,
            "Cache cleared"
        );
        self.emit(CacheEvent::Cleared {
            cache: self.name.clone(),
            removed: report.removed,
            failed: report.failed_keys.len(),
        });

        report
    }

    /// Write the index journal. No-op when persistence is disabled.
    #[instrument(skip(self), fields(cache = %self.name))]
    pub async fn flush(&self) -> Result<()> {
        if !self.persist_index {
            return Ok(());
        }

        let (journal, tmp_name) = {
            let mut index = self.index.lock();
            let tmp_name = format!("index-{}.{}", index.allocate_sequence(), entry::TMP_EXTENSION);
            (Journal::new(index.next_sequence(), index.snapshot()), tmp_name)
        };

        journal::store(self.fs.as_ref(), &self.directory, &journal, &tmp_name).await?;
        debug!(entries = journal.entries.len(), file = INDEX_FILE_NAME, "Index journal written");
        Ok(())
    }

    /// Flush the journal and release the cache.
    pub async fn close(self) -> Result<()> {
        self.flush().await?;
        info!(cache = %self.name, "Disk cache closed");
        Ok(())
    }

    async fn write_payload(
        &self,
        tmp_path: &Path,
        final_path: &Path,
        data: Bytes,
    ) -> bridge_traits::error::Result<()> {
        self.fs.write_file(tmp_path, data).await?;
        self.fs.rename(tmp_path, final_path).await
    }

    async fn heal(&self, key: &str, file_name: &str, reason: String) {
        let removed = { self.index.lock().remove_if_file(key, file_name) };
        let Some(entry) = removed else {
            debug!("Entry changed during read, treating as miss");
            return;
        };

        warn!(
            file = %file_name,
            reason = %reason,
            "Cache integrity warning: dropping unreadable entry"
        );
        self.delete_quietly(&entry.file_name).await;
        self.emit(CacheEvent::IntegrityWarning {
            cache: self.name.clone(),
            key: key.to_string(),
            reason,
        });
    }

    async fn evict(&self, evicted: Vec<CacheEntry>, cause: EvictionCause) -> EvictionOutcome {
        if evicted.is_empty() {
            return EvictionOutcome::default();
        }

        let outcome = EvictionOutcome {
            evicted_keys: evicted.iter().map(|e| e.key.clone()).collect(),
            freed_bytes: evicted.iter().map(|e| e.size_bytes).sum(),
        };
        debug!(
            entries = evicted.len(),
            bytes = outcome.freed_bytes,
            ?cause,
            "Evicted cache entries"
        );
        self.emit(CacheEvent::EntriesEvicted {
            cache: self.name.clone(),
            entries: evicted.len(),
            bytes: outcome.freed_bytes,
            cause,
        });

        self.discard_files(&evicted).await;
        self.retry_deferred_deletes().await;
        outcome
    }

    /// Deletes files left behind by an earlier clear. Failures stay deferred.
    async fn retry_deferred_deletes(&self) {
        let pending = { self.index.lock().take_deferred_deletes() };
        for file_name in pending {
            if !self.delete_quietly(&file_name).await {
                self.index.lock().defer_delete(file_name);
            }
        }
    }

    async fn discard_files(&self, entries: &[CacheEntry]) {
        for entry in entries {
            self.delete_quietly(&entry.file_name).await;
        }
    }

    /// Deletes a file in the cache directory. A missing file counts as
    /// deleted; other failures are logged and reported as `false`.
    async fn delete_quietly(&self, file_name: &str) -> bool {
        match self.fs.delete_file(&self.directory.join(file_name)).await {
            Ok(()) => true,
            Err(e) if e.is_not_found() => true,
            Err(e) => {
                warn!(cache = %self.name, file = %file_name, error = %e, "Failed to delete cache file");
                false
            }
        }
    }

    fn emit(&self, event: CacheEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Cache(event)).ok();
        }
    }
}

impl fmt::Debug for DiskLruCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiskLruCache")
            .field("name", &self.name)
            .field("directory", &self.directory)
            .field("usage", &self.usage_report())
            .field("persist_index", &self.persist_index)
            .field("verify_integrity", &self.verify_integrity)
            .finish()
    }
}

/// Space held for one in-flight `put`.
///
/// Dropping it unsettled (the `put` future was abandoned) releases the bytes
/// and removes whatever part of the payload reached the disk.
struct Reservation<'a> {
    cache: &'a DiskLruCache,
    bytes: u64,
    tmp_path: PathBuf,
    final_path: PathBuf,
    settled: bool,
}

impl Reservation<'_> {
    /// Registers the written payload. Returns the replaced entry and any
    /// entries evicted to restore the bound.
    fn commit(
        mut self,
        key: &str,
        file_name: String,
        content_hash: Option<String>,
    ) -> Result<(Option<CacheEntry>, Vec<CacheEntry>)> {
        self.settled = true;
        let mut index = self.cache.index.lock();
        index.release(self.bytes);

        if let Capacity::Bounded(max) = index.capacity() {
            if self.bytes > max {
                return Err(too_large(key, self.bytes, max));
            }
        }

        let replaced = index.insert(
            key,
            self.bytes,
            file_name,
            content_hash,
            chrono::Utc::now().timestamp(),
        );
        let evicted = index.enforce_capacity(Some(key), true);
        Ok((replaced, evicted))
    }

    async fn abandon(mut self) {
        self.settled = true;
        self.cache.index.lock().release(self.bytes);
        for path in [&self.tmp_path, &self.final_path] {
            self.cache.fs.delete_file(path).await.ok();
        }
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        self.cache.index.lock().release(self.bytes);
        debug!(cache = %self.cache.name, bytes = self.bytes, "Cache write abandoned");

        let fs = Arc::clone(&self.cache.fs);
        let paths = [self.tmp_path.clone(), self.final_path.clone()];
        let cleanup = async move {
            for path in paths {
                fs.delete_file(&path).await.ok();
            }
        };

        match runtime::current_handle() {
            Some(handle) => {
                handle.spawn(cleanup);
            }
            None => runtime::block_on(cleanup),
        }
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    Ok(())
}

fn too_large(key: &str, size: u64, max: u64) -> CacheError {
    CacheError::EntryTooLarge {
        key: key.to_string(),
        size,
        max,
    }
}
