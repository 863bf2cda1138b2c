//! Error taxonomy for imagery requests.

use thiserror::Error;

use crate::auth::AuthError;
use crate::cache::CacheError;
use crate::provider::ProviderError;

/// A malformed or out-of-range request field.
///
/// Raised before any I/O takes place.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Wire name of the offending field (e.g. `bbox`, `width`, `dateFrom`).
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Every way an imagery fetch can fail.
///
/// `Clone` so one in-flight result can be handed to every waiter.
#[derive(Debug, Clone, Error)]
pub enum ImageryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ImageryError {
    /// Short machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ImageryError::Validation(_) => "validation",
            ImageryError::Auth(_) => "auth",
            ImageryError::Provider(_) => "provider",
            ImageryError::Cache(_) => "cache",
        }
    }
}
