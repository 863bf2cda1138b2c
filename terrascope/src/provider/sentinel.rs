//! Sentinel Hub Processing API provider.

use bytes::Bytes;
use futures::future::BoxFuture;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::process::ProcessRequest;
use super::types::{ImageryProvider, ProviderError};
use crate::auth::BearerToken;
use crate::imagery::{Artifact, DEFAULT_CONTENT_TYPE};

/// Default Processing API endpoint.
pub const DEFAULT_PROCESS_URL: &str = "https://services.sentinel-hub.com/api/v1/process";

/// Provider that renders imagery through the Sentinel Hub Processing API.
///
/// A single call is made per request. There is no retry; the caller decides
/// whether to try again.
pub struct SentinelHubProvider {
    client: reqwest::Client,
    process_url: String,
}

impl SentinelHubProvider {
    /// Creates a provider posting to `process_url`.
    pub fn new(client: reqwest::Client, process_url: impl Into<String>) -> Self {
        Self {
            client,
            process_url: process_url.into(),
        }
    }

    pub fn process_url(&self) -> &str {
        &self.process_url
    }
}

/// Picks the reported image type, falling back to PNG for anything else.
fn image_content_type(header: Option<&str>) -> String {
    match header {
        Some(value) if value.starts_with("image/") => value.to_string(),
        _ => DEFAULT_CONTENT_TYPE.to_string(),
    }
}

impl ImageryProvider for SentinelHubProvider {
    fn process<'a>(
        &'a self,
        token: &'a BearerToken,
        request: &'a ProcessRequest,
    ) -> BoxFuture<'a, Result<Artifact, ProviderError>> {
        Box::pin(async move {
            debug!(
                url = %self.process_url,
                width = request.output.width,
                height = request.output.height,
                "Calling processing API"
            );

            let response = self
                .client
                .post(&self.process_url)
                .header(AUTHORIZATION, token.header_value())
                .json(request)
                .send()
                .await
                .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ProviderError::Status {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("").to_string(),
                });
            }

            let content_type = image_content_type(
                response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok()),
            );

            let bytes: Bytes = response
                .bytes()
                .await
                .map_err(|e| ProviderError::Body(e.without_url().to_string()))?;

            debug!(size = bytes.len(), content_type = %content_type, "Processing API returned image");
            Ok(Artifact::new(content_type, bytes))
        })
    }

    fn name(&self) -> &str {
        "Sentinel Hub"
    }
}
