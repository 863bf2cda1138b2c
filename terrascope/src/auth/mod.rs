//! OAuth client-credentials authentication for the imagery provider
//!
//! The [`CredentialManager`] hands out a currently-valid bearer token,
//! exchanging the configured client id and secret for a new one whenever the
//! held credential is absent or expired.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use terrascope::auth::{ClientCredentials, CredentialManager, OAuthTokenEndpoint};
//!
//! let endpoint = OAuthTokenEndpoint::new(http_client, DEFAULT_TOKEN_URL);
//! let manager = CredentialManager::new(
//!     Some(ClientCredentials::new("id", "secret")),
//!     Arc::new(endpoint),
//! );
//! let token = manager.get_token().await?;
//! ```

mod credential;
mod endpoint;
mod error;

pub use credential::{
    BearerToken, ClientCredentials, CredentialManager, ProviderCredential, MAX_TOKEN_LIFETIME,
    TOKEN_SAFETY_MARGIN,
};
pub use endpoint::{OAuthTokenEndpoint, TokenEndpoint, TokenGrant, DEFAULT_TOKEN_URL};
pub use error::AuthError;
