//! Application configuration for TerrascopeApp.
//!
//! `AppConfig` is the resolved, typed form of the INI file plus environment
//! overrides. It carries everything `TerrascopeApp::start()` needs.

use std::net::SocketAddr;
use std::time::Duration;

use super::error::AppError;
use crate::auth::{ClientCredentials, DEFAULT_TOKEN_URL};
use crate::cache::{DEFAULT_MEMORY_SIZE, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
use crate::config::ConfigFile;
use crate::provider::{DEFAULT_PROCESS_URL, DEFAULT_TIMEOUT};
use crate::weather::{DEFAULT_WEATHER_BASE_URL, DEMO_API_KEY};

/// Top-level configuration passed to `TerrascopeApp::start()`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub sentinel_hub: SentinelHubAppConfig,
    pub weather: WeatherAppConfig,
    pub cache: CacheAppConfig,
    pub bind: SocketAddr,
}

/// Imagery provider settings.
#[derive(Clone, Debug)]
pub struct SentinelHubAppConfig {
    /// `None` when either the id or the secret is missing; fetches then fail
    /// with an auth error on the first cache miss.
    pub credentials: Option<ClientCredentials>,
    /// Sentinel Hub configuration instance. Processing API calls carry their
    /// own evalscript and never send it; it is only reported at start-up so
    /// logs show which account the service runs against.
    pub instance_id: Option<String>,
    pub token_url: String,
    pub process_url: String,
    pub timeout: Duration,
}

impl Default for SentinelHubAppConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            instance_id: None,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            process_url: DEFAULT_PROCESS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Weather passthrough settings.
#[derive(Clone, Debug)]
pub struct WeatherAppConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            api_key: DEMO_API_KEY.to_string(),
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
        }
    }
}

/// Imagery cache settings.
#[derive(Clone, Debug)]
pub struct CacheAppConfig {
    pub max_size_bytes: u64,
    pub ttl: Duration,
    pub sweep_interval: Duration,
}

impl Default for CacheAppConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MEMORY_SIZE,
            ttl: DEFAULT_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sentinel_hub: SentinelHubAppConfig::default(),
            weather: WeatherAppConfig::default(),
            cache: CacheAppConfig::default(),
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

impl AppConfig {
    /// Resolves a loaded config file.
    ///
    /// Environment overrides must already be applied to `file`.
    pub fn from_config_file(file: &ConfigFile) -> Result<Self, AppError> {
        let hub = &file.sentinel_hub;
        let bind = if file.server.bind.trim().is_empty() {
            AppConfig::default().bind
        } else {
            file.bind_addr()?
        };

        Ok(Self {
            sentinel_hub: SentinelHubAppConfig {
                credentials: ClientCredentials::from_parts(
                    hub.client_id.clone(),
                    hub.client_secret.clone(),
                ),
                instance_id: hub.instance_id.clone(),
                token_url: hub.token_url.clone(),
                process_url: hub.process_url.clone(),
                timeout: Duration::from_secs(hub.timeout.max(1)),
            },
            weather: WeatherAppConfig {
                api_key: file
                    .weather
                    .api_key
                    .clone()
                    .unwrap_or_else(|| DEMO_API_KEY.to_string()),
                base_url: file.weather.base_url.clone(),
            },
            cache: CacheAppConfig {
                max_size_bytes: file.cache.memory_size,
                ttl: Duration::from_secs(file.cache.ttl_hours.max(1).saturating_mul(3600)),
                sweep_interval: Duration::from_secs(file.cache.sweep_interval.max(1)),
            },
            bind,
        })
    }

    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_credentials(mut self, credentials: Option<ClientCredentials>) -> Self {
        self.sentinel_hub.credentials = credentials;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = AppConfig::from_config_file(&ConfigFile::default()).unwrap();
        assert!(config.sentinel_hub.credentials.is_none());
        assert_eq!(config.weather.api_key, DEMO_API_KEY);
        assert_eq!(config.cache.ttl, Duration::from_secs(24 * 3600));
        assert_eq!(config.cache.sweep_interval, Duration::from_secs(600));
        assert_eq!(config.bind.to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let mut file = ConfigFile::default();
        file.sentinel_hub.client_id = Some("id".to_string());
        let config = AppConfig::from_config_file(&file).unwrap();
        assert!(config.sentinel_hub.credentials.is_none());

        file.sentinel_hub.client_secret = Some("secret".to_string());
        let config = AppConfig::from_config_file(&file).unwrap();
        assert_eq!(
            config.sentinel_hub.credentials.unwrap().client_id(),
            "id"
        );
    }

    #[test]
    fn test_huge_ttl_hours_saturates() {
        let mut file = ConfigFile::default();
        file.cache.ttl_hours = u64::MAX;
        let config = AppConfig::from_config_file(&file).unwrap();
        assert_eq!(config.cache.ttl, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_instance_id_carried_through() {
        let mut file = ConfigFile::default();
        file.sentinel_hub.instance_id = Some("abc-123".to_string());
        let config = AppConfig::from_config_file(&file).unwrap();
        assert_eq!(config.sentinel_hub.instance_id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_invalid_bind_rejected() {
        let mut file = ConfigFile::default();
        file.server.bind = "not-an-address".to_string();
        assert!(matches!(
            AppConfig::from_config_file(&file),
            Err(AppError::Config(_))
        ));
    }
}
