//! Core traits for the imagery cache.
//!
//! # Design Principles
//!
//! - **String keys**: fingerprints are human-readable for debugging
//! - **Immutable entries**: an entry is replaced or removed, never edited
//! - **Expiry on read**: an expired entry is never returned, whether or not a
//!   sweep has run
//! - **Dyn-compatible**: boxed futures so the orchestrator can hold
//!   `Arc<dyn ImageryCache>`

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use thiserror::Error;

use super::entry::{CacheEntry, ImageRecord};

/// Result of an expiry sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepResult {
    /// Number of expired entries removed.
    pub entries_removed: usize,
    /// Duration of the sweep in milliseconds.
    pub duration_ms: u64,
}

impl fmt::Display for SweepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep: removed {} expired entries in {}ms",
            self.entries_removed, self.duration_ms
        )
    }
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Reads that found an entry past its expiry.
    pub expired: u64,
    pub entry_count: u64,
    pub size_bytes: u64,
}

/// Errors a cache backend may report.
///
/// The in-memory backend never fails; persistent backends translate their
/// own failures into these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Backend-specific failure.
    #[error("cache backend error: {0}")]
    Backend(String),

    /// The cache is shutting down.
    #[error("cache is shutting down")]
    ShuttingDown,
}

/// Keyed store mapping a request fingerprint to a cached image.
///
/// All implementations must be `Send + Sync` for use across async tasks.
pub trait ImageryCache: Send + Sync {
    /// Returns the entry for `fingerprint` unless it is absent or expired.
    fn get(&self, fingerprint: &str) -> BoxFuture<'_, Result<Option<Arc<CacheEntry>>, CacheError>>;

    /// Stores `record`, replacing any existing entry for the fingerprint.
    ///
    /// The entry is stamped `created_at = now`, `expires_at = now + ttl`.
    fn put(
        &self,
        fingerprint: &str,
        record: ImageRecord,
    ) -> BoxFuture<'_, Result<Arc<CacheEntry>, CacheError>>;

    /// Removes every expired entry. Safe to call at any time, or never.
    fn sweep_expired(&self) -> BoxFuture<'_, Result<SweepResult, CacheError>>;

    /// Current number of entries, expired ones included until swept.
    fn entry_count(&self) -> u64;

    /// Hit/miss counters and sizing.
    fn stats(&self) -> CacheStats;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_result_default() {
        let result = SweepResult::default();
        assert_eq!(result.entries_removed, 0);
        assert_eq!(result.duration_ms, 0);
    }

    #[test]
    fn test_sweep_result_display() {
        let result = SweepResult {
            entries_removed: 10,
            duration_ms: 50,
        };
        let display = format!("{}", result);
        assert!(display.contains("10"));
        assert!(display.contains("50ms"));
    }

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::ShuttingDown;
        assert_eq!(format!("{}", err), "cache is shutting down");

        let err = CacheError::Backend("disk full".to_string());
        assert!(format!("{}", err).contains("disk full"));
    }
}
