//! Satellite imagery request orchestration
//!
//! Turns an [`ImageryRequest`] into a rendered image [`Artifact`]:
//!
//! ```text
//! ImageryRequest ──► validate ──► Fingerprint ──► ImageryCache
//!                                                  │ hit ──► Artifact (cached)
//!                                                  │ miss
//!                                                  ▼
//!                       CredentialManager ──► ImageryProvider ──► cache put ──► Artifact
//! ```
//!
//! Concurrent misses for the same fingerprint share a single provider call,
//! and the provider call runs on its own task so a caller that goes away does
//! not abort it.

mod artifact;
mod coalescer;
mod error;
mod fingerprint;
mod orchestrator;
mod request;
mod stats;
mod window;

pub use artifact::{Artifact, DEFAULT_CONTENT_TYPE};
pub use error::{ImageryError, ValidationError};
pub use fingerprint::Fingerprint;
pub use orchestrator::{FetchOutcome, ImageryOrchestrator};
pub use request::{
    validate, ImageryRequest, ValidatedRequest, MAX_CLOUD_COVERAGE, MAX_DIMENSION, MIN_DIMENSION,
};
pub use stats::{ImageryStats, ImageryStatsSnapshot};
pub use window::{TimeWindow, DEFAULT_WINDOW_DAYS};
