//! Imagery request types and validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::window::TimeWindow;
use crate::coord::{bbox_from_slice, BoundingBox};
use crate::layer::{Layer, LayerRegistry};

/// Smallest accepted output width or height in pixels.
pub const MIN_DIMENSION: u32 = 100;

/// Largest accepted output width or height in pixels.
pub const MAX_DIMENSION: u32 = 2048;

/// Upper bound of `maxCloudCoverage` (percent).
pub const MAX_CLOUD_COVERAGE: f64 = 100.0;

/// An imagery request as submitted by a client.
///
/// Field names follow the JSON body of `POST /api/satellite`. Dimensions are
/// plain numbers on the wire; fractional values are rounded during
/// validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageryRequest {
    /// `[west, south, east, north]` in degrees.
    pub bbox: Vec<f64>,
    pub layer: String,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cloud_coverage: Option<f64>,
}

impl ImageryRequest {
    /// Creates a request with the trailing default window and no cloud filter.
    pub fn new(bbox: [f64; 4], layer: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            bbox: bbox.to_vec(),
            layer: layer.into(),
            width: f64::from(width),
            height: f64::from(height),
            date_from: None,
            date_to: None,
            max_cloud_coverage: None,
        }
    }

    /// Sets an explicit date range.
    pub fn with_dates(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Sets the maximum acceptable cloud coverage.
    pub fn with_max_cloud_coverage(mut self, percent: f64) -> Self {
        self.max_cloud_coverage = Some(percent);
        self
    }
}

/// A request whose every field has been checked and defaulted.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub bbox: BoundingBox,
    pub layer: &'static Layer,
    pub width: u32,
    pub height: u32,
    pub window: TimeWindow,
    pub max_cloud_coverage: Option<f64>,
}

/// Validates a request against the registry, resolving default dates at `now`.
///
/// Fails on the first offending field. Performs no I/O.
pub fn validate(
    request: &ImageryRequest,
    registry: &LayerRegistry,
    now: DateTime<Utc>,
) -> Result<ValidatedRequest, ValidationError> {
    let bbox =
        bbox_from_slice(&request.bbox).map_err(|e| ValidationError::new("bbox", e.to_string()))?;

    let width = dimension("width", request.width)?;
    let height = dimension("height", request.height)?;

    let layer = registry.get(&request.layer).ok_or_else(|| {
        ValidationError::new("layer", format!("unknown layer '{}'", request.layer))
    })?;

    let max_cloud_coverage = match request.max_cloud_coverage {
        Some(value) if value.is_finite() && (0.0..=MAX_CLOUD_COVERAGE).contains(&value) => {
            Some(value + 0.0)
        }
        Some(value) => {
            return Err(ValidationError::new(
                "maxCloudCoverage",
                format!("must be between 0 and 100, got {}", value),
            ))
        }
        None => None,
    };

    let window = TimeWindow::resolve(
        request.date_from.as_deref(),
        request.date_to.as_deref(),
        now,
    )?;

    Ok(ValidatedRequest {
        bbox,
        layer,
        width,
        height,
        window,
        max_cloud_coverage,
    })
}

fn dimension(field: &'static str, value: f64) -> Result<u32, ValidationError> {
    let out_of_range = || {
        ValidationError::new(
            field,
            format!(
                "must be between {} and {}, got {}",
                MIN_DIMENSION, MAX_DIMENSION, value
            ),
        )
    };

    if !value.is_finite() {
        return Err(out_of_range());
    }
    let rounded = value.round();
    if rounded < f64::from(MIN_DIMENSION) || rounded > f64::from(MAX_DIMENSION) {
        return Err(out_of_range());
    }
    Ok(rounded as u32)
}
