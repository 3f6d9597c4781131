//! Workspace facade crate.
//!
//! Re-exports the media cache core so host applications can depend on
//! `mpc-cache` alone. The default `desktop-shims` feature pulls in the
//! Tokio file system bridge used when no host file system is injected.

#[cfg(feature = "desktop-shims")]
pub use core_cache::*;

#[cfg(feature = "desktop-shims")]
pub use core_runtime::{config::CoreConfig, events, logging};
