//! Sleeping and timeouts.

pub use std::time::{Duration, Instant};
pub use tokio::time::{error::Elapsed, sleep, timeout};
