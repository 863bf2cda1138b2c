//! Background expiry sweep.
//!
//! Reads already ignore expired entries, so the sweeper only bounds memory.
//! It runs until its cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::traits::ImageryCache;

/// Interval between sweeps when none is configured.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// Spawns a task that calls [`ImageryCache::sweep_expired`] every `interval`.
///
/// The first sweep happens one full interval after start.
pub fn spawn_sweeper(
    cache: Arc<dyn ImageryCache>,
    interval: Duration,
    cancellation_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // interval() fires immediately; skip that tick.
        ticker.tick().await;

        info!(interval_secs = interval.as_secs(), "Cache sweeper started");

        loop {
            tokio::select! {
                biased;

                _ = cancellation_token.cancelled() => break,

                _ = ticker.tick() => {
                    match cache.sweep_expired().await {
                        Ok(result) if result.entries_removed > 0 => info!("{}", result),
                        Ok(result) => debug!("{}", result),
                        Err(e) => warn!(error = %e, "Cache sweep failed"),
                    }
                }
            }
        }

        info!("Cache sweeper stopped");
    })
}
