//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! - `FileSystemAccess` using `core_async::fs` (Tokio)
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::TokioFileSystem;
//! use std::sync::Arc;
//!
//! let fs = Arc::new(TokioFileSystem::new());
//! // Hand `fs` to CoreConfig::builder().file_system(fs)
//! ```

mod filesystem;

pub use filesystem::TokioFileSystem;
