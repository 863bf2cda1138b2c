//! Satellite imagery provider abstraction
//!
//! This module provides the [`ImageryProvider`] trait and the Sentinel Hub
//! Processing API implementation. Providers receive a fully-built
//! [`ProcessRequest`] and a bearer token, and return the encoded image.
//!
//! # Example
//!
//! ```ignore
//! use terrascope::provider::{build_http_client, SentinelHubProvider, DEFAULT_PROCESS_URL};
//!
//! let client = build_http_client(Duration::from_secs(60))?;
//! let provider = SentinelHubProvider::new(client, DEFAULT_PROCESS_URL);
//! let artifact = provider.process(&token, &ProcessRequest::new(&validated)).await?;
//! ```

mod http;
mod process;
mod sentinel;
mod types;

pub use http::{build_http_client, DEFAULT_TIMEOUT};
pub use process::ProcessRequest;
pub use sentinel::{SentinelHubProvider, DEFAULT_PROCESS_URL};
pub use types::{ImageryProvider, ProviderError};
