//! In-memory preferences store.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use futures::future::BoxFuture;
use tracing::debug;

use super::types::{MapPreferences, MapPreferencesUpdate, PreferencesError, PreferencesStore, UserId};

/// Non-durable store keyed by user id. Contents are lost on restart.
#[derive(Debug)]
pub struct InMemoryPreferencesStore {
    records: DashMap<UserId, MapPreferences>,
    next_id: AtomicU64,
}

impl InMemoryPreferencesStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for InMemoryPreferencesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferencesStore for InMemoryPreferencesStore {
    fn get(&self, user_id: UserId) -> BoxFuture<'_, Result<Option<MapPreferences>, PreferencesError>> {
        let record = self.records.get(&user_id).map(|r| r.value().clone());
        Box::pin(async move { Ok(record) })
    }

    fn update(
        &self,
        user_id: UserId,
        patch: MapPreferencesUpdate,
    ) -> BoxFuture<'_, Result<MapPreferences, PreferencesError>> {
        Box::pin(async move {
            let now = Utc::now();
            // The entry guard holds the shard lock, so the merge is atomic per user.
            let mut record = self.records.entry(user_id).or_insert_with(|| {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                debug!(user_id, id, "Creating map preferences");
                MapPreferences::with_defaults(id, user_id, now)
            });
            record.apply(patch, now);
            Ok(record.clone())
        })
    }
}
