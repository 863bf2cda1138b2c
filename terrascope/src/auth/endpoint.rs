//! Token endpoint abstraction for testability.

use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::debug;

use super::credential::ClientCredentials;
use super::error::AuthError;

/// Default Sentinel Hub OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://services.sentinel-hub.com/oauth/token";

/// A successful client-credentials exchange.
#[derive(Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Token lifetime in seconds as declared by the provider.
    pub expires_in: u64,
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Trait for the OAuth token exchange.
///
/// This abstraction allows the credential manager to be exercised against
/// fake endpoints that count exchanges or fail on demand.
pub trait TokenEndpoint: Send + Sync {
    /// Performs a client-credentials grant.
    fn exchange<'a>(
        &'a self,
        credentials: &'a ClientCredentials,
    ) -> BoxFuture<'a, Result<TokenGrant, AuthError>>;
}

/// Token endpoint backed by reqwest.
pub struct OAuthTokenEndpoint {
    client: reqwest::Client,
    token_url: String,
}

impl OAuthTokenEndpoint {
    /// Creates an endpoint posting to `token_url`.
    pub fn new(client: reqwest::Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

impl TokenEndpoint for OAuthTokenEndpoint {
    fn exchange<'a>(
        &'a self,
        credentials: &'a ClientCredentials,
    ) -> BoxFuture<'a, Result<TokenGrant, AuthError>> {
        Box::pin(async move {
            debug!(url = %self.token_url, "Requesting client-credentials token");

            let response = self
                .client
                .post(&self.token_url)
                .form(&[
                    ("grant_type", "client_credentials"),
                    ("client_id", credentials.client_id()),
                    ("client_secret", credentials.client_secret()),
                ])
                .send()
                .await
                .map_err(|e| AuthError::Transport(e.without_url().to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(AuthError::Rejected {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("").to_string(),
                });
            }

            response
                .json::<TokenGrant>()
                .await
                .map_err(|e| AuthError::InvalidResponse(e.without_url().to_string()))
        })
    }
}
