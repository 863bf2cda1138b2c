//! CLI error type.

use std::fmt;

use terrascope::app::AppError;
use terrascope::config::ConfigError;
use terrascope::imagery::ImageryError;
use terrascope::logging::LoggingError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or unusable configuration.
    Config(String),

    /// Invalid command-line argument.
    InvalidArgument(String),

    /// Application failed to start or serve.
    App(AppError),

    /// Imagery fetch failed.
    Fetch(ImageryError),

    /// Failed to write an output file.
    Output(std::io::Error),

    /// Logging could not be initialized.
    Logging(LoggingError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Fetch(e) => write!(f, "Imagery fetch failed ({}): {}", e.kind(), e),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
            CliError::Logging(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::App(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::Output(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Config(_) | CliError::InvalidArgument(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<ImageryError> for CliError {
    fn from(e: ImageryError) -> Self {
        CliError::Fetch(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = CliError::from(ConfigError::UnknownKey("a.b".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key 'a.b'"
        );
    }
}
