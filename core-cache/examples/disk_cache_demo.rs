//! Fills a small disk cache, shrinks it and prints what got evicted.
//!
//! ```text
//! cargo run -p core-cache --example disk_cache_demo
//! ```

use anyhow::Context;
use bridge_desktop::TokioFileSystem;
use bridge_traits::logging::LogLevel;
use bytes::Bytes;
use core_cache::{Capacity, DiskCacheConfig, DiskLruCache};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::Arc;

#[core_async::main]
async fn main() -> anyhow::Result<()> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    let directory = std::env::temp_dir().join("disk-cache-demo");
    let config = DiskCacheConfig::new(&directory)
        .with_name("demo")
        .with_capacity(Capacity::Bounded(64 * 1024));
    let cache = DiskLruCache::open(config, Arc::new(TokioFileSystem::new()))
        .await
        .context("opening demo cache")?;

    for i in 0..8 {
        cache
            .put(&format!("segment-{i}"), Bytes::from(vec![i as u8; 12 * 1024]))
            .await?;
    }
    cache.get("segment-3").await?;

    let usage = cache.usage_report();
    println!(
        "{} entries, {} bytes ({}% of {})",
        usage.entry_count,
        usage.used_bytes,
        usage.percent_used().unwrap_or(0),
        usage.capacity
    );
    println!("recency: {:?}", cache.keys_by_recency());

    let outcome = cache.set_capacity(Capacity::Bounded(24 * 1024)).await;
    println!("shrinking evicted {:?}", outcome.evicted_keys);

    cache.close().await?;
    Ok(())
}
