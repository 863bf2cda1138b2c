//! Application bootstrap implementation.
//!
//! `TerrascopeApp` builds the component graph in dependency order and owns
//! the cache sweep daemon, so it always runs no matter how the service is
//! started.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::config::AppConfig;
use super::error::AppError;
use crate::auth::{CredentialManager, OAuthTokenEndpoint};
use crate::cache::{spawn_sweeper, ImageryCache, MemoryImageryCache};
use crate::imagery::ImageryOrchestrator;
use crate::layer::LayerRegistry;
use crate::preferences::InMemoryPreferencesStore;
use crate::provider::{build_http_client, SentinelHubProvider};
use crate::server::{build_router, AppState};
use crate::weather::WeatherClient;

/// Terrascope application with service lifecycle management.
///
/// Start order:
/// 1. Shared HTTP client
/// 2. Imagery cache, then its sweep daemon
/// 3. Credential manager and provider
/// 4. Orchestrator, weather client and preferences store
///
/// # Example
///
/// ```ignore
/// let app = TerrascopeApp::start(AppConfig::default()).await?;
/// let outcome = app.orchestrator().fetch_imagery(&request).await?;
/// app.shutdown().await;
/// ```
pub struct TerrascopeApp {
    state: AppState,
    cache: Arc<MemoryImageryCache>,
    sweeper: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
    config: AppConfig,
}

impl TerrascopeApp {
    /// Start the application with the given configuration.
    ///
    /// Must be called from within a Tokio runtime; the sweep daemon is
    /// spawned onto it.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        info!(version = crate::VERSION, "Starting Terrascope");

        let http = build_http_client(config.sentinel_hub.timeout).map_err(AppError::HttpClient)?;

        let cache = Arc::new(MemoryImageryCache::new(
            config.cache.max_size_bytes,
            config.cache.ttl,
        ));
        let shutdown = CancellationToken::new();
        let sweeper = spawn_sweeper(
            Arc::clone(&cache) as Arc<dyn ImageryCache>,
            config.cache.sweep_interval,
            shutdown.child_token(),
        );
        info!(
            max_size_bytes = config.cache.max_size_bytes,
            ttl_secs = config.cache.ttl.as_secs(),
            sweep_interval_secs = config.cache.sweep_interval.as_secs(),
            "Imagery cache started"
        );

        let hub = &config.sentinel_hub;
        if hub.credentials.is_none() {
            warn!("Sentinel Hub credentials not configured; imagery cache misses will fail");
        }
        if let Some(instance_id) = &hub.instance_id {
            info!(instance_id = %instance_id, "Sentinel Hub instance configured");
        }
        let endpoint = Arc::new(OAuthTokenEndpoint::new(http.clone(), hub.token_url.clone()));
        let credentials = Arc::new(CredentialManager::new(hub.credentials.clone(), endpoint));
        let provider = Arc::new(SentinelHubProvider::new(http.clone(), hub.process_url.clone()));

        let orchestrator = ImageryOrchestrator::new(
            LayerRegistry::builtin(),
            Arc::clone(&cache) as Arc<dyn ImageryCache>,
            credentials,
            provider,
        );

        let weather = WeatherClient::new(
            http,
            config.weather.base_url.clone(),
            config.weather.api_key.clone(),
        );
        let state = AppState::new(
            orchestrator,
            weather,
            Arc::new(InMemoryPreferencesStore::new()),
        );

        Ok(Self {
            state,
            cache,
            sweeper: Some(sweeper),
            shutdown,
            config,
        })
    }

    /// Router serving the HTTP surface.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    pub fn orchestrator(&self) -> &ImageryOrchestrator {
        &self.state.orchestrator
    }

    pub fn cache(&self) -> &Arc<MemoryImageryCache> {
        &self.cache
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Binds the configured address and serves until `signal` resolves.
    pub async fn serve<F>(&self, signal: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind)
            .await
            .map_err(AppError::Serve)?;
        self.serve_on(listener, signal).await
    }

    /// Serves on an already-bound listener until `signal` resolves.
    pub async fn serve_on<F>(&self, listener: TcpListener, signal: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr().map_err(AppError::Serve)?;
        info!(%addr, "HTTP server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await
            .map_err(AppError::Serve)
    }

    /// Stops the sweep daemon and waits for it to exit.
    pub async fn shutdown(mut self) {
        info!("Shutting down Terrascope");
        self.shutdown.cancel();
        if let Some(handle) = self.sweeper.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Cache sweeper ended abnormally");
            }
        }
    }
}

impl Drop for TerrascopeApp {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
