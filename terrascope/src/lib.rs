//! Terrascope - satellite imagery request and cache service
//!
//! This library turns map-view imagery requests (bounding box, layer, size,
//! date window, cloud limit) into rendered images from the Sentinel Hub
//! Processing API, caching each result by request fingerprint for a fixed
//! time. It also carries the thin weather, geocoding and preferences
//! endpoints of the dashboard backend.
//!
//! # Modules
//!
//! - [`imagery`] - validation, fingerprinting and the request orchestrator
//! - [`auth`] - OAuth client-credentials token management
//! - [`cache`] - TTL imagery cache and sweep daemon
//! - [`provider`] - Processing API client
//! - [`layer`] - built-in rendering layers
//! - [`server`] - axum HTTP surface
//! - [`app`] - component wiring and lifecycle

pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod coord;
pub mod imagery;
pub mod layer;
pub mod logging;
pub mod preferences;
pub mod provider;
pub mod server;
pub mod weather;

/// Crate version, as reported at start-up.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
