//! Imagery cache
//!
//! At most one entry per request fingerprint, each with a fixed time-to-live.
//! The [`ImageryCache`] trait is the seam for alternative backends; the
//! in-process [`MemoryImageryCache`] is the default.
//!
//! # Example
//!
//! ```ignore
//! use terrascope::cache::{ImageRecord, ImageryCache, MemoryImageryCache};
//!
//! let cache = MemoryImageryCache::new(512 * 1024 * 1024, DEFAULT_TTL);
//! cache.put(fingerprint.as_str(), record).await?;
//! let entry = cache.get(fingerprint.as_str()).await?;
//! ```

mod entry;
mod memory;
mod sweeper;
mod traits;

pub use entry::{CacheEntry, ImageRecord};
pub use memory::{MemoryImageryCache, DEFAULT_MEMORY_SIZE, DEFAULT_TTL, MAX_TTL};
pub use sweeper::{spawn_sweeper, DEFAULT_SWEEP_INTERVAL};
pub use traits::{CacheError, CacheStats, ImageryCache, SweepResult};
