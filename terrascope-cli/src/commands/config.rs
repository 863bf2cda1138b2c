//! `terrascope config ...`: inspect and edit settings in place.

use std::str::FromStr;

use clap::Subcommand;
use console::style;
use terrascope::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one setting, unmasked
    Get {
        /// Setting name as section.key, e.g. cache.ttl_hours
        key: String,
    },

    /// Change one setting and save the file
    Set {
        /// Setting name as section.key, e.g. cache.ttl_hours
        key: String,
        value: String,
    },

    /// Print every setting; secrets are masked
    List,

    /// Print where the config file lives
    Path,
}

pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = lookup(&key)?;
            let config = ConfigFile::load()?;
            println!("{}", or_unset(key.get(&config)));
        }
        ConfigCommands::Set { key, value } => {
            let key = lookup(&key)?;
            let mut config = ConfigFile::load()?;
            key.set(&mut config, &value)?;
            config.save()?;
            println!("{} = {}", key.name(), key.display_value(&config));
        }
        ConfigCommands::List => print_all(&ConfigFile::load()?),
        ConfigCommands::Path => println!("{}", config_file_path().display()),
    }
    Ok(())
}

fn lookup(name: &str) -> Result<ConfigKey, CliError> {
    ConfigKey::from_str(name).map_err(|_| {
        CliError::Config(format!(
            "no setting named '{}' (run 'terrascope config list' for the full set)",
            name
        ))
    })
}

fn or_unset(value: String) -> String {
    if value.is_empty() {
        "(not set)".to_string()
    } else {
        value
    }
}

fn print_all(config: &ConfigFile) {
    let width = ConfigKey::all()
        .iter()
        .map(|k| k.key_name().len())
        .max()
        .unwrap_or(0);

    let mut section = None;
    for key in ConfigKey::all() {
        if section != Some(key.section()) {
            if section.is_some() {
                println!();
            }
            println!("{}", style(format!("[{}]", key.section())).bold());
            section = Some(key.section());
        }
        println!(
            "  {:<width$} = {}",
            key.key_name(),
            or_unset(key.display_value(config)),
            width = width
        );
    }
}
