//! In-memory LRU index.
//!
//! Pure bookkeeping: no I/O happens here. Callers hold the cache mutex
//! around every method, remove entries from the index first and delete their
//! files afterwards.

use super::config::Capacity;
use super::entry::CacheEntry;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug)]
pub(crate) struct CacheIndex {
    entries: HashMap<String, CacheEntry>,
    /// `(last_access_sequence, key)`, least recent first. The key breaks
    /// ties left behind by restored journals.
    recency: BTreeSet<(u64, String)>,
    used_bytes: u64,
    reserved_bytes: u64,
    capacity: Capacity,
    next_sequence: u64,
    /// Payload files no entry refers to that could not be deleted yet.
    deferred_deletes: Vec<String>,
}

impl CacheIndex {
    pub(crate) fn new(capacity: Capacity) -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeSet::new(),
            used_bytes: 0,
            reserved_bytes: 0,
            capacity,
            next_sequence: 1,
            deferred_deletes: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Returns `false` when the capacity is unchanged.
    pub(crate) fn set_capacity(&mut self, capacity: Capacity) -> bool {
        if self.capacity == capacity {
            return false;
        }
        self.capacity = capacity;
        true
    }

    pub(crate) fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    pub(crate) fn reserved_bytes(&self) -> u64 {
        self.reserved_bytes
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub(crate) fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn allocate_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// Marks the entry as most recently used, provided it is still backed by
    /// `file_name`.
    pub(crate) fn touch(&mut self, key: &str, file_name: &str) -> bool {
        let sequence = self.next_sequence;
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        if entry.file_name != file_name {
            return false;
        }

        self.recency
            .remove(&(entry.last_access_sequence, key.to_string()));
        entry.last_access_sequence = sequence;
        self.recency.insert((sequence, key.to_string()));
        self.next_sequence += 1;
        true
    }

    /// Registers a freshly written payload as the most recently used entry,
    /// returning the entry it replaced.
    pub(crate) fn insert(
        &mut self,
        key: &str,
        size_bytes: u64,
        file_name: String,
        content_hash: Option<String>,
        created_at: i64,
    ) -> Option<CacheEntry> {
        let replaced = self.remove(key);
        let sequence = self.allocate_sequence();
        self.link(CacheEntry {
            key: key.to_string(),
            size_bytes,
            last_access_sequence: sequence,
            file_name,
            content_hash,
            created_at,
        });
        replaced
    }

    /// Re-registers an entry with its original sequence (journal restore,
    /// failed deletions during clear).
    pub(crate) fn restore(&mut self, entry: CacheEntry) -> Option<CacheEntry> {
        let replaced = self.remove(&entry.key);
        self.next_sequence = self.next_sequence.max(entry.last_access_sequence + 1);
        self.link(entry);
        replaced
    }

    /// Raises the sequence counter to at least `floor`.
    pub(crate) fn bump_sequence(&mut self, floor: u64) {
        self.next_sequence = self.next_sequence.max(floor);
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.recency
            .remove(&(entry.last_access_sequence, entry.key.clone()));
        self.used_bytes -= entry.size_bytes;
        Some(entry)
    }

    /// Removes the entry only if it is still backed by `file_name`.
    pub(crate) fn remove_if_file(&mut self, key: &str, file_name: &str) -> Option<CacheEntry> {
        match self.entries.get(key) {
            Some(entry) if entry.file_name == file_name => self.remove(key),
            _ => None,
        }
    }

    pub(crate) fn reserve(&mut self, bytes: u64) {
        self.reserved_bytes += bytes;
    }

    pub(crate) fn release(&mut self, bytes: u64) {
        self.reserved_bytes = self.reserved_bytes.saturating_sub(bytes);
    }

    /// Evicts least-recently-used entries other than `key` until an incoming
    /// payload of `incoming` bytes fits next to the outstanding reservations.
    /// The current entry for `key` does not count since it will be replaced.
    pub(crate) fn make_room(&mut self, key: &str, incoming: u64) -> Vec<CacheEntry> {
        let Some(max) = self.capacity.max_bytes() else {
            return Vec::new();
        };
        let replaced = self.entries.get(key).map_or(0, |e| e.size_bytes);

        let mut evicted = Vec::new();
        while self.used_bytes - replaced + self.reserved_bytes + incoming > max {
            match self.pop_lru(Some(key)) {
                Some(entry) => evicted.push(entry),
                None => break,
            }
        }
        evicted
    }

    /// Evicts least-recently-used entries (never `protect`) while the used
    /// bytes, plus reservations when `include_reserved`, exceed the capacity.
    pub(crate) fn enforce_capacity(
        &mut self,
        protect: Option<&str>,
        include_reserved: bool,
    ) -> Vec<CacheEntry> {
        let mut evicted = Vec::new();
        loop {
            let pressure = if include_reserved {
                self.used_bytes + self.reserved_bytes
            } else {
                self.used_bytes
            };
            if !self.capacity.is_exceeded_by(pressure) {
                break;
            }
            match self.pop_lru(protect) {
                Some(entry) => evicted.push(entry),
                None => break,
            }
        }
        evicted
    }

    fn pop_lru(&mut self, protect: Option<&str>) -> Option<CacheEntry> {
        let victim = self
            .recency
            .iter()
            .map(|(_, key)| key)
            .find(|key| Some(key.as_str()) != protect)?
            .clone();
        self.remove(&victim)
    }

    /// Removes every entry, least recent first. Reservations and the sequence
    /// counter are untouched.
    pub(crate) fn drain(&mut self) -> Vec<CacheEntry> {
        let order = std::mem::take(&mut self.recency);
        self.used_bytes = 0;
        order
            .into_iter()
            .filter_map(|(_, key)| self.entries.remove(&key))
            .collect()
    }

    pub(crate) fn defer_delete(&mut self, file_name: String) {
        if !self.deferred_deletes.contains(&file_name) {
            self.deferred_deletes.push(file_name);
        }
    }

    pub(crate) fn take_deferred_deletes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.deferred_deletes)
    }

    /// Keys from least to most recently used.
    pub(crate) fn keys_by_recency(&self) -> Vec<String> {
        self.recency.iter().map(|(_, key)| key.clone()).collect()
    }

    /// Clones of all entries, least recent first.
    pub(crate) fn snapshot(&self) -> Vec<CacheEntry> {
        self.recency
            .iter()
            .filter_map(|(_, key)| self.entries.get(key).cloned())
            .collect()
    }

    fn link(&mut self, entry: CacheEntry) {
        self.used_bytes += entry.size_bytes;
        self.recency
            .insert((entry.last_access_sequence, entry.key.clone()));
        self.entries.insert(entry.key.clone(), entry);
    }
}
