//! In-memory imagery cache using moka.
//!
//! Moka provides lock-free reads, concurrent writes and size-bounded eviction,
//! which keeps cache access from ever blocking the Tokio runtime. Moka's own
//! time-to-live does housekeeping; correctness comes from the explicit
//! `expires_at` check on every read.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::{self, BoxFuture};
use moka::future::Cache as MokaCache;
use moka::ops::compute::{CompResult, Op};
use tracing::debug;

use super::entry::{CacheEntry, ImageRecord};
use super::traits::{CacheError, CacheStats, ImageryCache, SweepResult};

/// Entry lifetime when none is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest accepted entry lifetime; larger values are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Default memory budget for cached artifacts (512 MB).
pub const DEFAULT_MEMORY_SIZE: u64 = 512 * 1024 * 1024;

/// Process-local imagery cache.
pub struct MemoryImageryCache {
    cache: MokaCache<String, Arc<CacheEntry>>,
    ttl: Duration,
    max_size_bytes: u64,
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

impl MemoryImageryCache {
    /// Creates a cache bounded to `max_size_bytes` of artifacts.
    ///
    /// # Arguments
    ///
    /// * `max_size_bytes` - Memory budget; least-recently-used entries are
    ///   evicted beyond it
    /// * `ttl` - Lifetime of every entry, clamped to `1ms..=MAX_TTL`
    pub fn new(max_size_bytes: u64, ttl: Duration) -> Self {
        let ttl = ttl.clamp(Duration::from_millis(1), MAX_TTL);
        let cache = MokaCache::builder()
            .weigher(|_key: &String, entry: &Arc<CacheEntry>| -> u32 {
                // moka uses u32 weights
                entry.weight().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .time_to_live(ttl)
            .build();

        Self {
            cache,
            ttl,
            max_size_bytes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Removes the entry for `key` only if the one currently stored is expired
    /// at `now`. A fresher entry written since it was read is kept.
    async fn remove_if_expired(&self, key: &str, now: DateTime<Utc>) -> bool {
        let result = self
            .cache
            .entry(key.to_string())
            .and_compute_with(|current| {
                let op = match current {
                    Some(entry) if entry.value().is_expired_at(now) => Op::Remove,
                    _ => Op::Nop,
                };
                future::ready(op)
            })
            .await;
        matches!(result, CompResult::Removed(_))
    }

    fn chrono_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::hours(24))
    }
}

impl Default for MemoryImageryCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE, DEFAULT_TTL)
    }
}

impl ImageryCache for MemoryImageryCache {
    fn get(&self, fingerprint: &str) -> BoxFuture<'_, Result<Option<Arc<CacheEntry>>, CacheError>> {
        let key = fingerprint.to_string();
        Box::pin(async move {
            match self.cache.get(&key).await {
                Some(entry) if !entry.is_expired_at(Utc::now()) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    Ok(Some(entry))
                }
                Some(_) => {
                    if self.remove_if_expired(&key, Utc::now()).await {
                        debug!(fingerprint = %key, "Expired imagery entry removed on read");
                    }
                    self.expired.fetch_add(1, Ordering::Relaxed);
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    Ok(None)
                }
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    Ok(None)
                }
            }
        })
    }

    fn put(
        &self,
        fingerprint: &str,
        record: ImageRecord,
    ) -> BoxFuture<'_, Result<Arc<CacheEntry>, CacheError>> {
        let key = fingerprint.to_string();
        Box::pin(async move {
            let created_at = Utc::now();
            let expires_at = created_at + self.chrono_ttl();
            let entry = Arc::new(CacheEntry::new(key.clone(), record, created_at, expires_at));

            self.cache.insert(key, Arc::clone(&entry)).await;
            Ok(entry)
        })
    }

    fn sweep_expired(&self) -> BoxFuture<'_, Result<SweepResult, CacheError>> {
        Box::pin(async move {
            let start = Instant::now();
            let now = Utc::now();

            let expired: Vec<Arc<String>> = self
                .cache
                .iter()
                .filter(|(_, entry)| entry.is_expired_at(now))
                .map(|(key, _)| key)
                .collect();

            let mut entries_removed = 0;
            for key in &expired {
                if self.remove_if_expired(key.as_str(), now).await {
                    entries_removed += 1;
                }
            }
            self.cache.run_pending_tasks().await;

            Ok(SweepResult {
                entries_removed,
                duration_ms: start.elapsed().as_millis() as u64,
            })
        })
    }

    fn entry_count(&self) -> u64 {
        // moka's own count lags until pending tasks run; the map itself does not.
        self.cache.iter().count() as u64
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            entry_count: self.entry_count(),
            size_bytes: self.cache.weighted_size(),
        }
    }
}
