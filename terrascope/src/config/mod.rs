//! Configuration file management.
//!
//! Settings live in an INI file at `<config dir>/terrascope/config.ini`:
//!
//! ```ini
//! [sentinel_hub]
//! client_id = ...
//! client_secret = ...
//! timeout = 60
//!
//! [weather]
//! api_key = ...
//!
//! [cache]
//! ttl_hours = 24
//! memory_size = 512MB
//! sweep_interval = 600
//!
//! [server]
//! bind = 127.0.0.1:5000
//! ```
//!
//! Environment variables override the file for credentials and the bind
//! address; see [`ConfigFile::with_env_overrides`].

mod file;
mod keys;
mod size;

pub use file::{
    config_directory, config_file_path, CacheSettings, ConfigError, ConfigFile, LoggingSettings,
    SentinelHubSettings, ServerSettings, WeatherSettings, DEFAULT_BIND, ENV_BIND,
    ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_INSTANCE_ID, ENV_WEATHER_API_KEY,
};
pub use keys::ConfigKey;
pub use size::{format_size, parse_size};
