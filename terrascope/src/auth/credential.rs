//! Credential manager with expiry-aware renewal.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::endpoint::TokenEndpoint;
use super::error::AuthError;

/// Margin subtracted from the provider-declared lifetime so a token never
/// expires while a call made with it is in flight.
pub const TOKEN_SAFETY_MARGIN: Duration = Duration::from_secs(60);

/// Longest lifetime honoured from a token response; larger values are clamped.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// OAuth client id and secret.
#[derive(Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Builds credentials only when both halves are present and non-empty.
    pub fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Option<Self> {
        match (client_id, client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(Self::new(id, secret))
            }
            _ => None,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// A bearer token ready to attach to an outbound call.
///
/// The raw token is only reachable as a complete `Authorization` header value.
#[derive(Clone)]
pub struct BearerToken(Arc<str>);

impl BearerToken {
    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// The held OAuth credential.
///
/// Replaced wholesale on renewal, never updated in place.
#[derive(Clone)]
pub struct ProviderCredential {
    token: BearerToken,
    expires_at: Instant,
}

impl ProviderCredential {
    /// Creates a credential issued at `issued_at` with the declared lifetime.
    ///
    /// The lifetime is capped at [`MAX_TOKEN_LIFETIME`]. An expiry that still
    /// cannot be represented yields an already-expired credential.
    pub fn new(access_token: &str, issued_at: Instant, lifetime: Duration) -> Self {
        let usable = lifetime
            .min(MAX_TOKEN_LIFETIME)
            .saturating_sub(TOKEN_SAFETY_MARGIN);
        Self {
            token: BearerToken(Arc::from(access_token)),
            expires_at: issued_at.checked_add(usable).unwrap_or(issued_at),
        }
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// True while `now` is strictly before the expiry instant.
    #[inline]
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredential")
            .field("token", &self.token)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Supplies a currently-valid bearer token for the imagery provider.
///
/// The fast path takes a read lock and compares one `Instant`. Concurrent
/// callers that all observe an expired slot may each renew; the exchange is
/// safe to repeat and the last successful renewal wins the slot.
pub struct CredentialManager {
    credentials: Option<ClientCredentials>,
    endpoint: Arc<dyn TokenEndpoint>,
    slot: RwLock<Option<ProviderCredential>>,
    renewals: AtomicU64,
}

impl CredentialManager {
    /// Creates a manager with an empty credential slot.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Client id and secret, `None` when unconfigured
    /// * `endpoint` - Token endpoint used for exchanges
    pub fn new(credentials: Option<ClientCredentials>, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        Self {
            credentials,
            endpoint,
            slot: RwLock::new(None),
            renewals: AtomicU64::new(0),
        }
    }

    /// Returns true if a client id and secret are configured.
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Number of successful token exchanges performed so far.
    pub fn renewal_count(&self) -> u64 {
        self.renewals.load(Ordering::Relaxed)
    }

    /// Returns the held token if it is still valid, without any I/O.
    pub fn cached_token(&self) -> Option<BearerToken> {
        let now = Instant::now();
        self.slot
            .read()
            .as_ref()
            .filter(|credential| credential.is_valid_at(now))
            .map(|credential| credential.token.clone())
    }

    /// Returns a valid bearer token, renewing it first when needed.
    ///
    /// On failure the held credential is left untouched.
    pub async fn get_token(&self) -> Result<BearerToken, AuthError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let credentials = self
            .credentials
            .as_ref()
            .ok_or(AuthError::MissingCredentials)?;

        debug!(client_id = %credentials.client_id(), "Provider credential absent or expired, renewing");

        let issued_at = Instant::now();
        let grant = match self.endpoint.exchange(credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!(error = %e, "Token exchange failed");
                return Err(e);
            }
        };

        if grant.access_token.is_empty() {
            return Err(AuthError::InvalidResponse(
                "empty access_token".to_string(),
            ));
        }

        let credential = ProviderCredential::new(
            &grant.access_token,
            issued_at,
            Duration::from_secs(grant.expires_in),
        );
        let token = credential.token.clone();
        *self.slot.write() = Some(credential);
        self.renewals.fetch_add(1, Ordering::Relaxed);

        info!(expires_in_secs = grant.expires_in, "Provider credential renewed");
        Ok(token)
    }

    /// Drops the held credential so the next call renews.
    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenGrant;
    use futures::future::BoxFuture;
    use std::sync::atomic::AtomicUsize;

    /// Fake token endpoint counting exchanges.
    struct FakeEndpoint {
        calls: AtomicUsize,
        expires_in: u64,
        fail_with: Option<AuthError>,
    }

    impl FakeEndpoint {
        fn ok(expires_in: u64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                expires_in,
                fail_with: None,
            }
        }

        fn failing(err: AuthError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                expires_in: 0,
                fail_with: Some(err),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TokenEndpoint for FakeEndpoint {
        fn exchange<'a>(
            &'a self,
            _credentials: &'a ClientCredentials,
        ) -> BoxFuture<'a, Result<TokenGrant, AuthError>> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                match &self.fail_with {
                    Some(err) => Err(err.clone()),
                    None => Ok(TokenGrant {
                        access_token: format!("token-{}", n),
                        expires_in: self.expires_in,
                    }),
                }
            })
        }
    }

    fn manager(endpoint: Arc<FakeEndpoint>) -> CredentialManager {
        CredentialManager::new(Some(ClientCredentials::new("id", "secret")), endpoint)
    }

    #[tokio::test]
    async fn test_token_reused_within_validity() {
        let endpoint = Arc::new(FakeEndpoint::ok(3600));
        let manager = manager(endpoint.clone());

        let first = manager.get_token().await.unwrap();
        let second = manager.get_token().await.unwrap();

        assert_eq!(endpoint.calls(), 1);
        assert_eq!(first.header_value(), second.header_value());
        assert_eq!(manager.renewal_count(), 1);
    }

    #[tokio::test]
    async fn test_token_renewed_after_expiry() {
        // A 60s lifetime minus the 60s margin expires immediately.
        let endpoint = Arc::new(FakeEndpoint::ok(60));
        let manager = manager(endpoint.clone());

        let first = manager.get_token().await.unwrap();
        let second = manager.get_token().await.unwrap();

        assert_eq!(endpoint.calls(), 2);
        assert_eq!(first.header_value(), "Bearer token-1");
        assert_eq!(second.header_value(), "Bearer token-2");
    }

    #[tokio::test]
    async fn test_missing_credentials_never_calls_endpoint() {
        let endpoint = Arc::new(FakeEndpoint::ok(3600));
        let manager = CredentialManager::new(None, endpoint.clone());

        let result = manager.get_token().await;
        assert_eq!(result.unwrap_err(), AuthError::MissingCredentials);
        assert_eq!(endpoint.calls(), 0);
        assert!(!manager.is_configured());
    }

    #[tokio::test]
    async fn test_failed_exchange_keeps_slot_empty() {
        let endpoint = Arc::new(FakeEndpoint::failing(AuthError::Rejected {
            status: 401,
            reason: "Unauthorized".to_string(),
        }));
        let manager = manager(endpoint.clone());

        assert!(manager.get_token().await.is_err());
        assert!(manager.cached_token().is_none());
        assert_eq!(manager.renewal_count(), 0);

        // No negative caching: the next call tries again.
        assert!(manager.get_token().await.is_err());
        assert_eq!(endpoint.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_renewal() {
        let endpoint = Arc::new(FakeEndpoint::ok(3600));
        let manager = manager(endpoint.clone());

        manager.get_token().await.unwrap();
        manager.invalidate();
        manager.get_token().await.unwrap();

        assert_eq!(endpoint.calls(), 2);
    }

    #[test]
    fn test_credential_expiry_applies_margin() {
        let issued = Instant::now();
        let credential = ProviderCredential::new("t", issued, Duration::from_secs(3600));
        assert_eq!(credential.expires_at(), issued + Duration::from_secs(3540));
        assert!(credential.is_valid_at(issued));
        assert!(!credential.is_valid_at(issued + Duration::from_secs(3540)));
    }

    #[tokio::test]
    async fn test_huge_declared_lifetime_is_clamped() {
        let endpoint = Arc::new(FakeEndpoint::ok(u64::MAX));
        let manager = manager(endpoint.clone());

        let before = Instant::now();
        let token = manager.get_token().await.unwrap();
        assert_eq!(token.header_value(), "Bearer token-1");

        let held = manager.slot.read().clone().unwrap();
        assert!(held.expires_at() <= Instant::now() + MAX_TOKEN_LIFETIME);
        assert!(held.is_valid_at(before));

        manager.get_token().await.unwrap();
        assert_eq!(endpoint.calls(), 1);
    }

    #[test]
    fn test_credential_lifetime_capped() {
        let issued = Instant::now();
        let credential = ProviderCredential::new("t", issued, Duration::from_secs(u64::MAX));
        assert_eq!(
            credential.expires_at(),
            issued + MAX_TOKEN_LIFETIME - TOKEN_SAFETY_MARGIN
        );
    }

    #[test]
    fn test_short_lifetime_is_already_expired() {
        let issued = Instant::now();
        let credential = ProviderCredential::new("t", issued, Duration::from_secs(30));
        assert!(!credential.is_valid_at(issued));
    }

    #[test]
    fn test_from_parts_requires_both_values() {
        assert!(ClientCredentials::from_parts(Some("id".into()), None).is_none());
        assert!(ClientCredentials::from_parts(None, Some("s".into())).is_none());
        assert!(ClientCredentials::from_parts(Some("".into()), Some("s".into())).is_none());
        assert!(ClientCredentials::from_parts(Some("id".into()), Some("s".into())).is_some());
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let creds = ClientCredentials::new("my-id", "my-secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("my-id"));
        assert!(!debug.contains("my-secret"));

        let credential = ProviderCredential::new("raw-token", Instant::now(), Duration::from_secs(3600));
        assert!(!format!("{:?}", credential).contains("raw-token"));
    }
}
