//! Application bootstrap and lifecycle management.
//!
//! [`TerrascopeApp`] composes every component in dependency order and owns
//! the background tasks, so callers never wire the cache sweeper by hand.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        TerrascopeApp                         │
//! │                                                              │
//! │  1. MemoryImageryCache ──► sweep daemon (cancellable)        │
//! │  2. CredentialManager  ──► OAuthTokenEndpoint                │
//! │  3. SentinelHubProvider                                      │
//! │  4. ImageryOrchestrator (registry + 1..3)                    │
//! │  5. WeatherClient, InMemoryPreferencesStore                  │
//! │  6. axum Router over AppState                                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use terrascope::app::{AppConfig, TerrascopeApp};
//!
//! let config = AppConfig::from_config_file(&ConfigFile::load()?.with_env_overrides())?;
//! let app = TerrascopeApp::start(config).await?;
//! let router = app.router();
//! // ... serve ...
//! app.shutdown().await;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::TerrascopeApp;
pub use config::{AppConfig, CacheAppConfig, SentinelHubAppConfig, WeatherAppConfig};
pub use error::AppError;
