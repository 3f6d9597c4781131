//! Runtime abstraction layer for the media cache core.
//!
//! Every other crate in the workspace reaches the async runtime through this
//! crate instead of depending on Tokio directly. Keeping the executor behind
//! one seam means the cache engine, the desktop bridge and the test suites
//! all agree on how tasks are spawned, how blocking work is offloaded and how
//! an async entry point is driven to completion.
//!
//! # Modules
//!
//! - `fs`: async filesystem primitives used by the desktop bridge
//! - `runtime`: runtime handles and `block_on`
//! - `sync`: async-aware primitives (broadcast channels, mutex, notify)
//! - `task`: task spawning (`spawn`, `spawn_blocking`)
//! - `time`: sleeping and timeouts
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//!
//! async fn example() {
//!     let handle = task::spawn(async { 42 });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

// Re-export the async entry-point/test macros so downstream crates never need
// direct Tokio dependencies.
pub use core_async_macros::{main, test};

pub mod fs;
pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
