//! Provider trait and error type.

use futures::future::BoxFuture;
use thiserror::Error;

use super::process::ProcessRequest;
use crate::auth::BearerToken;
use crate::imagery::Artifact;

/// Errors from the imagery processing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Non-success HTTP status.
    #[error("Sentinel Hub API error: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The request could not be sent or timed out.
    #[error("Sentinel Hub request failed: {0}")]
    Transport(String),

    /// The response body could not be read.
    #[error("Failed to read Sentinel Hub response: {0}")]
    Body(String),

    /// The HTTP client could not be created.
    #[error("{0}")]
    Client(String),

    /// The task running the call ended without producing a result.
    #[error("Provider call aborted: {0}")]
    Aborted(String),
}

impl ProviderError {
    /// HTTP status code, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Trait for imagery processing backends.
///
/// Implementations must be `Send + Sync` so one provider can serve every
/// request task.
pub trait ImageryProvider: Send + Sync {
    /// Renders the requested area and returns the encoded image.
    fn process<'a>(
        &'a self,
        token: &'a BearerToken,
        request: &'a ProcessRequest,
    ) -> BoxFuture<'a, Result<Artifact, ProviderError>>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
