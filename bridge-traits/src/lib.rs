//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host platform implements for the
//! media cache core.
//!
//! ## Traits
//!
//! - [`FileSystemAccess`](storage::FileSystemAccess) - File I/O for the disk caches
//! - [`SettingsStore`](storage::SettingsStore) - Key-value preferences (cache size presets)
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate |
//! |----------|---------------------|
//! | Desktop  | `bridge-desktop`    |
//! | Mobile   | injected by the host app |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert platform-specific errors to `BridgeError`
//! and keep the original `std::io::Error` where one exists, so callers can
//! distinguish a missing file from a real failure.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single implementation can be
//! shared across async tasks behind an `Arc`.

pub mod error;
pub mod logging;
pub mod storage;

pub use error::BridgeError;

pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use storage::{FileMetadata, FileSystemAccess, SettingsStore};
