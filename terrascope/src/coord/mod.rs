//! Geographic bounding boxes
//!
//! Provides the `BoundingBox` type used to describe the area of interest of an
//! imagery request, along with validation of WGS84 degree coordinates.

mod types;

pub use types::{BoundingBox, CoordError, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Validates a raw coordinate slice and converts it into a bounding box.
///
/// # Arguments
///
/// * `coords` - Coordinates ordered as `[west, south, east, north]`
///
/// # Returns
///
/// A `Result` containing the bounding box or an error describing the first
/// violated constraint.
pub fn bbox_from_slice(coords: &[f64]) -> Result<BoundingBox, CoordError> {
    match *coords {
        [west, south, east, north] => BoundingBox::new(west, south, east, north),
        _ => Err(CoordError::WrongArity(coords.len())),
    }
}
