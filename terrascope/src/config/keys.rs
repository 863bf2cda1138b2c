//! Typed configuration keys for `config get|set|list`.

use std::path::PathBuf;
use std::str::FromStr;

use super::file::{parse_bind, parse_memory_size, ConfigError, ConfigFile};
use super::size::format_size;

/// Every settable `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    SentinelHubInstanceId,
    SentinelHubClientId,
    SentinelHubClientSecret,
    SentinelHubTokenUrl,
    SentinelHubProcessUrl,
    SentinelHubTimeout,
    WeatherApiKey,
    WeatherBaseUrl,
    CacheTtlHours,
    CacheMemorySize,
    CacheSweepInterval,
    ServerBind,
    LoggingDirectory,
}

const ALL_KEYS: [ConfigKey; 13] = [
    ConfigKey::SentinelHubInstanceId,
    ConfigKey::SentinelHubClientId,
    ConfigKey::SentinelHubClientSecret,
    ConfigKey::SentinelHubTokenUrl,
    ConfigKey::SentinelHubProcessUrl,
    ConfigKey::SentinelHubTimeout,
    ConfigKey::WeatherApiKey,
    ConfigKey::WeatherBaseUrl,
    ConfigKey::CacheTtlHours,
    ConfigKey::CacheMemorySize,
    ConfigKey::CacheSweepInterval,
    ConfigKey::ServerBind,
    ConfigKey::LoggingDirectory,
];

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::SentinelHubInstanceId
            | ConfigKey::SentinelHubClientId
            | ConfigKey::SentinelHubClientSecret
            | ConfigKey::SentinelHubTokenUrl
            | ConfigKey::SentinelHubProcessUrl
            | ConfigKey::SentinelHubTimeout => "sentinel_hub",
            ConfigKey::WeatherApiKey | ConfigKey::WeatherBaseUrl => "weather",
            ConfigKey::CacheTtlHours | ConfigKey::CacheMemorySize | ConfigKey::CacheSweepInterval => {
                "cache"
            }
            ConfigKey::ServerBind => "server",
            ConfigKey::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::SentinelHubInstanceId => "instance_id",
            ConfigKey::SentinelHubClientId => "client_id",
            ConfigKey::SentinelHubClientSecret => "client_secret",
            ConfigKey::SentinelHubTokenUrl => "token_url",
            ConfigKey::SentinelHubProcessUrl => "process_url",
            ConfigKey::SentinelHubTimeout => "timeout",
            ConfigKey::WeatherApiKey => "api_key",
            ConfigKey::WeatherBaseUrl => "base_url",
            ConfigKey::CacheTtlHours => "ttl_hours",
            ConfigKey::CacheMemorySize => "memory_size",
            ConfigKey::CacheSweepInterval => "sweep_interval",
            ConfigKey::ServerBind => "bind",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// True for values that must not be echoed in listings.
    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            ConfigKey::SentinelHubClientSecret | ConfigKey::WeatherApiKey
        )
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        match self {
            ConfigKey::SentinelHubInstanceId => opt(&config.sentinel_hub.instance_id),
            ConfigKey::SentinelHubClientId => opt(&config.sentinel_hub.client_id),
            ConfigKey::SentinelHubClientSecret => opt(&config.sentinel_hub.client_secret),
            ConfigKey::SentinelHubTokenUrl => config.sentinel_hub.token_url.clone(),
            ConfigKey::SentinelHubProcessUrl => config.sentinel_hub.process_url.clone(),
            ConfigKey::SentinelHubTimeout => config.sentinel_hub.timeout.to_string(),
            ConfigKey::WeatherApiKey => opt(&config.weather.api_key),
            ConfigKey::WeatherBaseUrl => config.weather.base_url.clone(),
            ConfigKey::CacheTtlHours => config.cache.ttl_hours.to_string(),
            ConfigKey::CacheMemorySize => format_size(config.cache.memory_size),
            ConfigKey::CacheSweepInterval => config.cache.sweep_interval.to_string(),
            ConfigKey::ServerBind => config.server.bind.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Value for display, with secrets masked.
    pub fn display_value(&self, config: &ConfigFile) -> String {
        let value = self.get(config);
        if self.is_secret() && !value.is_empty() {
            "********".to_string()
        } else {
            value
        }
    }

    /// Validates and stores `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

        match self {
            ConfigKey::SentinelHubInstanceId => config.sentinel_hub.instance_id = optional(value),
            ConfigKey::SentinelHubClientId => config.sentinel_hub.client_id = optional(value),
            ConfigKey::SentinelHubClientSecret => {
                config.sentinel_hub.client_secret = optional(value)
            }
            ConfigKey::SentinelHubTokenUrl => config.sentinel_hub.token_url = self.url(value)?,
            ConfigKey::SentinelHubProcessUrl => config.sentinel_hub.process_url = self.url(value)?,
            ConfigKey::SentinelHubTimeout => config.sentinel_hub.timeout = self.positive(value)?,
            ConfigKey::WeatherApiKey => config.weather.api_key = optional(value),
            ConfigKey::WeatherBaseUrl => config.weather.base_url = self.url(value)?,
            ConfigKey::CacheTtlHours => config.cache.ttl_hours = self.positive(value)?,
            ConfigKey::CacheMemorySize => {
                config.cache.memory_size = parse_memory_size(value)
                    .ok_or_else(|| self.invalid(value, "expected a size such as 512MB or 2GB"))?
            }
            ConfigKey::CacheSweepInterval => config.cache.sweep_interval = self.positive(value)?,
            ConfigKey::ServerBind => {
                parse_bind(value)?;
                config.server.bind = value.to_string();
            }
            ConfigKey::LoggingDirectory => {
                config.logging.directory = optional(value).map(PathBuf::from)
            }
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn positive(&self, value: &str) -> Result<u64, ConfigError> {
        value
            .parse::<u64>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| self.invalid(value, "expected a positive integer"))
    }

    fn url(&self, value: &str) -> Result<String, ConfigError> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(value.trim_end_matches('/').to_string())
        } else {
            Err(self.invalid(value, "expected an http(s) URL"))
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!(
            "sentinel_hub.client_id".parse::<ConfigKey>().unwrap(),
            ConfigKey::SentinelHubClientId
        );
        assert_eq!("CACHE.TTL_HOURS".parse::<ConfigKey>().unwrap(), ConfigKey::CacheTtlHours);
        assert!("cache.nope".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_every_key_name_parses_back() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();
        ConfigKey::CacheMemorySize.set(&mut config, "1GB").unwrap();
        ConfigKey::SentinelHubTimeout.set(&mut config, "90").unwrap();
        ConfigKey::ServerBind.set(&mut config, "0.0.0.0:8080").unwrap();

        assert_eq!(config.cache.memory_size, 1024 * 1024 * 1024);
        assert_eq!(ConfigKey::CacheMemorySize.get(&config), "1GB");
        assert_eq!(ConfigKey::SentinelHubTimeout.get(&config), "90");
        assert_eq!(ConfigKey::ServerBind.get(&config), "0.0.0.0:8080");
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::CacheTtlHours.set(&mut config, "0").is_err());
        assert!(ConfigKey::CacheMemorySize.set(&mut config, "lots").is_err());
        assert!(ConfigKey::ServerBind.set(&mut config, "localhost").is_err());
        assert!(ConfigKey::WeatherBaseUrl.set(&mut config, "ftp://x").is_err());
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_empty_value_clears_optional() {
        let mut config = ConfigFile::default();
        ConfigKey::SentinelHubClientId.set(&mut config, "abc").unwrap();
        ConfigKey::SentinelHubClientId.set(&mut config, "").unwrap();
        assert!(config.sentinel_hub.client_id.is_none());
    }

    #[test]
    fn test_secrets_masked() {
        let mut config = ConfigFile::default();
        ConfigKey::SentinelHubClientSecret.set(&mut config, "hunter2").unwrap();
        assert_eq!(ConfigKey::SentinelHubClientSecret.display_value(&config), "********");
        assert_eq!(ConfigKey::SentinelHubClientSecret.get(&config), "hunter2");
        assert_eq!(ConfigKey::WeatherApiKey.display_value(&config), "");
    }
}
