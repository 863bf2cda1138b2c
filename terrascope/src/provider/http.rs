//! Shared HTTP client construction.

use std::time::Duration;

use super::types::ProviderError;

/// Default timeout for outbound requests.
///
/// Large renders can take tens of seconds; this is the only bound placed on a
/// provider call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates the process-wide reqwest client with the given timeout.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("terrascope/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::Client(format!("Failed to create HTTP client: {}", e)))
}
