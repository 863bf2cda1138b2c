//! Authentication error types.

use thiserror::Error;

/// Errors raised while obtaining a provider bearer token.
///
/// Every variant carries a human-readable cause; none of them ever contain
/// the client secret or a token value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Client id or secret is not configured.
    #[error("Sentinel Hub credentials not configured")]
    MissingCredentials,

    /// The token endpoint answered with a non-success status.
    #[error("Sentinel Hub authentication failed: HTTP {status} {reason}")]
    Rejected { status: u16, reason: String },

    /// The token endpoint could not be reached.
    #[error("Sentinel Hub authentication failed: {0}")]
    Transport(String),

    /// The token endpoint answered 2xx with an unusable body.
    #[error("Sentinel Hub returned an invalid token response: {0}")]
    InvalidResponse(String),
}
