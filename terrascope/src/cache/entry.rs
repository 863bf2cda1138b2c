//! Cached imagery entries.

use chrono::{DateTime, Utc};

use crate::coord::BoundingBox;
use crate::imagery::Artifact;

/// The payload and audit metadata stored for one fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub artifact: Artifact,
    pub source_bounds: BoundingBox,
    pub layer_id: String,
    /// End of the data window the image was rendered from.
    pub scene_date: DateTime<Utc>,
}

/// An immutable cache entry.
///
/// `expires_at` is always after `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub fingerprint: String,
    pub record: ImageRecord,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Stamps a record with its creation time and expiry.
    pub fn new(
        fingerprint: impl Into<String>,
        record: ImageRecord,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            record,
            created_at,
            expires_at,
        }
    }

    /// True once `now` has reached `expires_at`.
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Size of the stored payload in bytes.
    pub fn weight(&self) -> usize {
        self.record.artifact.len() + self.fingerprint.len()
    }
}
