//! Synchronization primitives.
//!
//! Only async-aware primitives live here. Short critical sections that never
//! cross an `.await` (such as the cache index) use `parking_lot` directly.

pub use tokio::sync::{broadcast, Mutex, MutexGuard, Notify};
