//! Init command - initialize configuration file.

use terrascope::config::{
    config_file_path, ConfigFile, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_WEATHER_API_KEY,
};

use crate::error::CliError;

/// Run the init command. An existing file is left untouched.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();

    if path.exists() {
        println!("Configuration file already exists:");
        println!("  {}", path.display());
    } else {
        ConfigFile::default().save()?;
        println!("Created configuration file:");
        println!("  {}", path.display());
    }

    println!();
    println!("Credentials can live in the file or in the environment:");
    println!("  {}      Sentinel Hub OAuth client id", ENV_CLIENT_ID);
    println!("  {}  Sentinel Hub OAuth client secret", ENV_CLIENT_SECRET);
    println!("  {}         OpenWeatherMap API key", ENV_WEATHER_API_KEY);
    println!();
    println!("Environment variables override config file values.");
    Ok(())
}
