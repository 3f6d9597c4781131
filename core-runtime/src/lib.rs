//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the media cache crates:
//! - Logging and tracing setup
//! - Configuration (`CoreConfig` builder with fail-fast validation)
//! - Event bus for cache observability (integrity warnings, evictions, wipes)
//!
//! The cache engine itself lives in `core-cache`; this crate only provides
//! the plumbing it logs through, reports through and is configured by.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
