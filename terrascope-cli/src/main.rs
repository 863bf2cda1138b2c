//! Terrascope CLI - Command-line interface
//!
//! Runs the imagery service and offers one-shot fetches and configuration
//! management on top of the `terrascope` library.

mod commands;
mod error;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use terrascope::config::ConfigFile;
use terrascope::logging::{init_logging, LoggingGuard};

use commands::config::ConfigCommands;
use commands::fetch::FetchArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "terrascope", version, about = "Satellite imagery request and cache service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP service until interrupted
    Serve {
        /// Listen address (overrides config and TERRASCOPE_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Fetch one image through the cache and write it to a file
    Fetch {
        /// Bounding box as west,south,east,north in degrees
        #[arg(long, allow_hyphen_values = true, value_parser = commands::fetch::parse_bbox)]
        bbox: [f64; 4],

        /// Layer id (see `terrascope layers`)
        #[arg(long, default_value = terrascope::layer::DEFAULT_LAYER_ID)]
        layer: String,

        /// Output width in pixels
        #[arg(long, default_value_t = 512)]
        width: u32,

        /// Output height in pixels
        #[arg(long, default_value_t = 512)]
        height: u32,

        /// Start date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        to: Option<String>,

        /// Maximum cloud coverage in percent
        #[arg(long)]
        max_cloud: Option<f64>,

        /// File to write the image to
        #[arg(long, short)]
        output: PathBuf,
    },

    /// List the available imagery layers
    Layers,

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Write a default configuration file
    Init,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Serve { bind } => {
            let _guard = start_logging()?;
            commands::serve::run(bind).await
        }
        Commands::Fetch {
            bbox,
            layer,
            width,
            height,
            from,
            to,
            max_cloud,
            output,
        } => {
            let _guard = start_logging()?;
            commands::fetch::run(FetchArgs {
                bbox,
                layer,
                width,
                height,
                from,
                to,
                max_cloud,
                output,
            })
            .await
        }
        Commands::Layers => commands::layers::run(),
        Commands::Config { command } => commands::config::run(command),
        Commands::Init => commands::init::run(),
    }
}

fn start_logging() -> Result<LoggingGuard, CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    init_logging(config.logging.directory.as_deref()).map_err(CliError::Logging)
}
