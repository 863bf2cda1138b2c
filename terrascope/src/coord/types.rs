//! Core coordinate types.

use serde::Serialize;
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced while validating a bounding box.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("bounding box must have exactly 4 coordinates, got {0}")]
    WrongArity(usize),

    #[error("coordinate {0} is not a finite number")]
    NotFinite(f64),

    #[error("latitude {0} out of range [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} out of range [-180, 180]")]
    InvalidLongitude(f64),

    #[error("west ({west}) must be less than east ({east})")]
    InvertedLongitude { west: f64, east: f64 },

    #[error("south ({south}) must be less than north ({north})")]
    InvertedLatitude { south: f64, north: f64 },
}

/// A geographic rectangle in WGS84 degrees.
///
/// Always satisfies `west < east` and `south < north` with every coordinate
/// inside the valid latitude/longitude ranges. Construct it with
/// [`BoundingBox::new`] so the invariant holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 4]")]
pub struct BoundingBox {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl BoundingBox {
    /// Creates a validated bounding box.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, CoordError> {
        for value in [west, south, east, north] {
            if !value.is_finite() {
                return Err(CoordError::NotFinite(value));
            }
        }
        for lon in [west, east] {
            if !(MIN_LON..=MAX_LON).contains(&lon) {
                return Err(CoordError::InvalidLongitude(lon));
            }
        }
        for lat in [south, north] {
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                return Err(CoordError::InvalidLatitude(lat));
            }
        }
        if west >= east {
            return Err(CoordError::InvertedLongitude { west, east });
        }
        if south >= north {
            return Err(CoordError::InvertedLatitude { south, north });
        }

        // Fold negative zero so equal boxes print identically.
        Ok(Self {
            west: west + 0.0,
            south: south + 0.0,
            east: east + 0.0,
            north: north + 0.0,
        })
    }

    #[inline]
    pub fn west(&self) -> f64 {
        self.west
    }

    #[inline]
    pub fn south(&self) -> f64 {
        self.south
    }

    #[inline]
    pub fn east(&self) -> f64 {
        self.east
    }

    #[inline]
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Returns the coordinates as `[west, south, east, north]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_nan() {
        let result = BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0);
        assert!(matches!(result, Err(CoordError::NotFinite(_))));
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        let result = BoundingBox::new(0.0, -91.0, 1.0, 1.0);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_rejects_out_of_range_longitude() {
        let result = BoundingBox::new(0.0, 0.0, 181.0, 1.0);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_rejects_inverted_latitude() {
        let result = BoundingBox::new(0.0, 5.0, 1.0, 1.0);
        assert!(matches!(result, Err(CoordError::InvertedLatitude { .. })));
    }

    #[test]
    fn test_negative_zero_folded() {
        let a = BoundingBox::new(-0.0, -0.0, 1.0, 1.0).unwrap();
        let b = BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "0,0,1,1");
    }

    #[test]
    fn test_serializes_as_array() {
        let bbox = BoundingBox::new(-122.5, 37.7, -122.3, 37.8).unwrap();
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[-122.5,37.7,-122.3,37.8]");
    }
}
