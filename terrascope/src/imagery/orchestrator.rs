//! The imagery request orchestrator.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::artifact::Artifact;
use super::coalescer::{CoalesceResult, FetchResult, LeaderGuard, RequestCoalescer};
use super::error::ImageryError;
use super::fingerprint::Fingerprint;
use super::request::{validate, ImageryRequest, ValidatedRequest};
use super::stats::{ImageryStats, ImageryStatsSnapshot};
use crate::auth::CredentialManager;
use crate::cache::{ImageRecord, ImageryCache};
use crate::layer::LayerRegistry;
use crate::provider::{ImageryProvider, ProcessRequest, ProviderError};

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub artifact: Artifact,
    /// True when the artifact came straight from the cache.
    pub was_cached: bool,
    pub fingerprint: Fingerprint,
}

struct Inner {
    registry: LayerRegistry,
    cache: Arc<dyn ImageryCache>,
    credentials: Arc<CredentialManager>,
    provider: Arc<dyn ImageryProvider>,
    coalescer: Arc<RequestCoalescer>,
    stats: ImageryStats,
}

/// Turns imagery requests into rendered artifacts.
///
/// Cheap to clone; clones share the cache, credentials, provider and
/// in-flight map.
///
/// Per call: validate, fingerprint, cache lookup, then on a miss fetch a
/// token, call the provider once and cache the result. Nothing is retried.
/// Concurrent misses for one fingerprint share a single provider call, which
/// runs on its own task and completes even if every caller has gone away.
#[derive(Clone)]
pub struct ImageryOrchestrator {
    inner: Arc<Inner>,
}

impl ImageryOrchestrator {
    pub fn new(
        registry: LayerRegistry,
        cache: Arc<dyn ImageryCache>,
        credentials: Arc<CredentialManager>,
        provider: Arc<dyn ImageryProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                cache,
                credentials,
                provider,
                coalescer: Arc::new(RequestCoalescer::new()),
                stats: ImageryStats::new(),
            }),
        }
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.inner.registry
    }

    pub fn cache(&self) -> &Arc<dyn ImageryCache> {
        &self.inner.cache
    }

    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.inner.credentials
    }

    pub fn stats(&self) -> ImageryStatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Number of provider calls currently running.
    pub fn in_flight(&self) -> usize {
        self.inner.coalescer.in_flight()
    }

    /// Fetches imagery for `request`, from the cache when possible.
    ///
    /// # Errors
    ///
    /// * [`ImageryError::Validation`] - a request field is malformed; no I/O was done
    /// * [`ImageryError::Auth`] - no token could be obtained; the provider was not called
    /// * [`ImageryError::Provider`] - the provider call failed; nothing was cached
    /// * [`ImageryError::Cache`] - the cache lookup itself failed
    pub async fn fetch_imagery(&self, request: &ImageryRequest) -> Result<FetchOutcome, ImageryError> {
        let inner = &self.inner;
        inner.stats.request();

        let validated = match validate(request, &inner.registry, Utc::now()) {
            Ok(validated) => validated,
            Err(e) => {
                inner.stats.failure();
                debug!(error = %e, "Rejected imagery request");
                return Err(e.into());
            }
        };
        let fingerprint = Fingerprint::of(&validated);

        let cached = match inner.cache.get(fingerprint.as_str()).await {
            Ok(cached) => cached,
            Err(e) => {
                inner.stats.failure();
                warn!(fingerprint = %fingerprint, error = %e, "Cache lookup failed");
                return Err(e.into());
            }
        };

        if let Some(entry) = cached {
            inner.stats.cache_hit();
            debug!(fingerprint = %fingerprint, "Cache hit");
            return Ok(FetchOutcome {
                artifact: entry.record.artifact.clone(),
                was_cached: true,
                fingerprint,
            });
        }

        inner.stats.cache_miss();

        let rx = match inner.coalescer.register(fingerprint.as_str()) {
            CoalesceResult::Coalesced(rx) => {
                inner.stats.coalesced();
                debug!(fingerprint = %fingerprint, "Joining in-flight fetch");
                rx
            }
            CoalesceResult::NewRequest { guard, rx } => {
                debug!(fingerprint = %fingerprint, layer = %validated.layer.id, "Cache miss, fetching");
                let inner = Arc::clone(&self.inner);
                let key = fingerprint.clone();
                tokio::spawn(async move {
                    run_fetch(inner, key, validated, guard).await;
                });
                rx
            }
        };

        let artifact = wait_for(rx).await?;
        Ok(FetchOutcome {
            artifact,
            was_cached: false,
            fingerprint,
        })
    }
}

async fn wait_for(mut rx: broadcast::Receiver<FetchResult>) -> FetchResult {
    match rx.recv().await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Aborted(
            "in-flight fetch ended without a result".to_string(),
        )
        .into()),
    }
}

/// Miss path, run on its own task by the leader of a fingerprint.
async fn run_fetch(
    inner: Arc<Inner>,
    fingerprint: Fingerprint,
    request: ValidatedRequest,
    guard: LeaderGuard,
) {
    let result = fetch_and_store(&inner, &fingerprint, &request).await;
    if result.is_err() {
        inner.stats.failure();
    }
    guard.complete(result);
}

async fn fetch_and_store(
    inner: &Inner,
    fingerprint: &Fingerprint,
    request: &ValidatedRequest,
) -> FetchResult {
    let token = inner.credentials.get_token().await?;

    let body = ProcessRequest::new(request);
    inner.stats.provider_call();
    let artifact = match inner.provider.process(&token, &body).await {
        Ok(artifact) => artifact,
        Err(e) => {
            warn!(
                fingerprint = %fingerprint,
                provider = inner.provider.name(),
                error = %e,
                "Provider call failed"
            );
            if e.status() == Some(401) {
                inner.credentials.invalidate();
            }
            return Err(e.into());
        }
    };

    let record = ImageRecord {
        artifact: artifact.clone(),
        source_bounds: request.bbox,
        layer_id: request.layer.id.to_string(),
        scene_date: request.window.end(),
    };

    match inner.cache.put(fingerprint.as_str(), record).await {
        Ok(entry) => info!(
            fingerprint = %fingerprint,
            size = artifact.len(),
            expires_at = %entry.expires_at,
            "Cached imagery"
        ),
        Err(e) => warn!(fingerprint = %fingerprint, error = %e, "Failed to cache imagery"),
    }

    Ok(artifact)
}
