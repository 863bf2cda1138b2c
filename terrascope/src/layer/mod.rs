//! Imagery layer registry
//!
//! A layer is a named rendering configuration: which spectral bands of the
//! source scenes to read and how to turn them into output pixels. The
//! rendering expression (evalscript) is provider configuration and is passed
//! through to the provider untouched.

mod evalscripts;
mod registry;

pub use registry::{DataSource, Layer, LayerRegistry, DEFAULT_LAYER_ID};
