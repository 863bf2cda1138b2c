//! CLI command implementations.

pub mod config;
pub mod fetch;
pub mod init;
pub mod layers;
pub mod serve;

use terrascope::app::AppConfig;
use terrascope::config::ConfigFile;

use crate::error::CliError;

/// Loads the config file with environment overrides and resolves it.
pub fn load_app_config() -> Result<(ConfigFile, AppConfig), CliError> {
    let file = ConfigFile::load()?.with_env_overrides();
    let app = AppConfig::from_config_file(&file)?;
    Ok((file, app))
}
