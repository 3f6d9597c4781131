//! # Disk LRU Cache Module
//!
//! A bounded cache of binary payloads (cover art, audio segments) stored as
//! flat files, evicting least-recently-used entries when the configured byte
//! budget would be exceeded.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │     DiskLruCache                       │
//! │  - get() / put()                       │
//! │  - set_capacity() / usage_report()     │
//! │  - clear() / flush()                   │
//! └────────┬───────────────────────────────┘
//!          │
//!          ├──> CacheIndex (in-memory, behind one mutex)
//!          ├──> FileSystemAccess (payload files, index.json)
//!          └──> EventBus (optional: integrity warnings, evictions)
//! ```

pub mod cache;
pub mod config;
pub mod entry;
mod index;
mod journal;
pub mod stats;

pub use cache::DiskLruCache;
pub use config::{Capacity, DiskCacheConfig, DEFAULT_CAPACITY_BYTES};
pub use entry::CacheEntry;
pub use stats::{ClearReport, EvictionOutcome, UsageReport};
