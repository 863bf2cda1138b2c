//! INI-backed configuration file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use super::size::{format_size, parse_size};
use crate::auth::DEFAULT_TOKEN_URL;
use crate::cache::{DEFAULT_MEMORY_SIZE, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
use crate::provider::{DEFAULT_PROCESS_URL, DEFAULT_TIMEOUT};
use crate::weather::DEFAULT_WEATHER_BASE_URL;

/// Default HTTP listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

pub const ENV_INSTANCE_ID: &str = "SENTINEL_HUB_INSTANCE_ID";
pub const ENV_CLIENT_ID: &str = "SENTINEL_HUB_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SENTINEL_HUB_CLIENT_SECRET";
pub const ENV_WEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_BIND: &str = "TERRASCOPE_BIND";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `[sentinel_hub]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelHubSettings {
    pub instance_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: String,
    pub process_url: String,
    /// Outbound request timeout in seconds.
    pub timeout: u64,
}

impl Default for SentinelHubSettings {
    fn default() -> Self {
        Self {
            instance_id: None,
            client_id: None,
            client_secret: None,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            process_url: DEFAULT_PROCESS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// `[weather]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub ttl_hours: u64,
    /// Memory bound in bytes.
    pub memory_size: u64,
    /// Seconds between expiry sweeps.
    pub sweep_interval: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_TTL.as_secs() / 3600,
            memory_size: DEFAULT_MEMORY_SIZE,
            sweep_interval: DEFAULT_SWEEP_INTERVAL.as_secs(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory for rolling log files. Stderr only when unset.
    pub directory: Option<PathBuf>,
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub sentinel_hub: SentinelHubSettings,
    pub weather: WeatherSettings,
    pub cache: CacheSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

/// Directory holding the config file.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("terrascope")
}

/// Full path of the config file.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

impl ConfigFile {
    /// Loads the config file from its default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Parses an INI document. Unknown sections and keys are ignored.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in super::ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                let value = value.trim();
                if !value.is_empty() {
                    key.set(&mut config, value)?;
                }
            }
        }
        Ok(config)
    }

    /// Renders the config as an INI document.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in super::ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section())).set(key.key_name(), value);
            }
        }
        ini
    }

    /// Saves to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }

    /// Applies environment overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`; set, non-empty values win over the file.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = var(ENV_INSTANCE_ID) {
            self.sentinel_hub.instance_id = Some(v);
        }
        if let Some(v) = var(ENV_CLIENT_ID) {
            self.sentinel_hub.client_id = Some(v);
        }
        if let Some(v) = var(ENV_CLIENT_SECRET) {
            self.sentinel_hub.client_secret = Some(v);
        }
        if let Some(v) = var(ENV_WEATHER_API_KEY) {
            self.weather.api_key = Some(v);
        }
        if let Some(v) = var(ENV_BIND) {
            self.server.bind = v;
        }
        self
    }

    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_bind(&self.server.bind)
    }

    /// Memory size formatted for display.
    pub fn memory_size_human(&self) -> String {
        format_size(self.cache.memory_size)
    }
}

pub(super) fn parse_bind(value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
        key: "server.bind".to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

pub(super) fn parse_memory_size(value: &str) -> Option<u64> {
    parse_size(value).filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.cache.ttl_hours, 24);
        assert_eq!(config.cache.sweep_interval, 600);
        assert_eq!(config.sentinel_hub.timeout, 60);
        assert!(config.sentinel_hub.client_id.is_none());
        assert_eq!(config.memory_size_human(), "512MB");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.sentinel_hub.client_id = Some("my-client".to_string());
        config.sentinel_hub.client_secret = Some("my-secret".to_string());
        config.cache.memory_size = 2 * 1024 * 1024 * 1024;
        config.cache.ttl_hours = 6;
        config.logging.directory = Some(PathBuf::from("/var/log/terrascope"));
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_value_in_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[cache]\nttl_hours = soon\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[extra]\nfoo = bar\n[server]\nbind = 0.0.0.0:8080\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = [
            (ENV_CLIENT_ID, "env-id"),
            (ENV_CLIENT_SECRET, "env-secret"),
            (ENV_BIND, "0.0.0.0:9000"),
            (ENV_WEATHER_API_KEY, ""),
        ]
        .into_iter()
        .collect();

        let mut config = ConfigFile::default();
        config.sentinel_hub.client_id = Some("file-id".to_string());
        config.weather.api_key = Some("file-key".to_string());

        let config = config.with_overrides(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.sentinel_hub.client_id.as_deref(), Some("env-id"));
        assert_eq!(config.sentinel_hub.client_secret.as_deref(), Some("env-secret"));
        assert_eq!(config.weather.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.bind_addr().unwrap().port(), 9000);
    }
}
