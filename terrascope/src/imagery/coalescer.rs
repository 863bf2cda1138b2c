//! In-flight request coalescing.
//!
//! The first miss for a fingerprint becomes the leader and performs the
//! provider call; later misses for the same fingerprint subscribe to the
//! leader's result instead of issuing their own call.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use super::artifact::Artifact;
use super::error::ImageryError;

/// Result shared with every waiter of one in-flight fetch.
pub type FetchResult = Result<Artifact, ImageryError>;

/// Outcome of registering interest in a fingerprint.
pub enum CoalesceResult {
    /// Caller is the leader and must run the fetch, then call
    /// [`LeaderGuard::complete`].
    NewRequest {
        guard: LeaderGuard,
        rx: broadcast::Receiver<FetchResult>,
    },
    /// A fetch is already running; wait on the receiver.
    Coalesced(broadcast::Receiver<FetchResult>),
}

/// Map of fingerprints with a provider call in flight.
#[derive(Debug, Default)]
pub struct RequestCoalescer {
    inflight: DashMap<String, broadcast::Sender<FetchResult>>,
}

impl RequestCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a caller for `fingerprint`.
    pub fn register(self: &Arc<Self>, fingerprint: &str) -> CoalesceResult {
        match self.inflight.entry(fingerprint.to_string()) {
            Entry::Occupied(entry) => CoalesceResult::Coalesced(entry.get().subscribe()),
            Entry::Vacant(entry) => {
                let (tx, rx) = broadcast::channel(1);
                entry.insert(tx);
                CoalesceResult::NewRequest {
                    guard: LeaderGuard {
                        coalescer: Arc::clone(self),
                        fingerprint: fingerprint.to_string(),
                        armed: true,
                    },
                    rx,
                }
            }
        }
    }

    /// Number of fingerprints currently being fetched.
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    fn finish(&self, fingerprint: &str, result: Option<FetchResult>) {
        if let Some((_, tx)) = self.inflight.remove(fingerprint) {
            match result {
                // No receivers left is fine: every caller may have gone away.
                Some(result) => {
                    let _ = tx.send(result);
                }
                None => debug!(fingerprint, "In-flight fetch abandoned"),
            }
        }
    }
}

/// Held by the leader of an in-flight fetch.
///
/// Dropping the guard without completing it removes the entry and closes the
/// channel, so waiters never hang on a fetch that will not finish.
pub struct LeaderGuard {
    coalescer: Arc<RequestCoalescer>,
    fingerprint: String,
    armed: bool,
}

impl LeaderGuard {
    /// Publishes the result to every waiter and clears the in-flight entry.
    pub fn complete(mut self, result: FetchResult) {
        self.armed = false;
        self.coalescer.finish(&self.fingerprint, Some(result));
    }
}

impl Drop for LeaderGuard {
    fn drop(&mut self) {
        if self.armed {
            self.coalescer.finish(&self.fingerprint, None);
        }
    }
}
