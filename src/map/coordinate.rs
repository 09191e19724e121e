// src/map/coordinate.rs

use crate::error::{MeasureError, Result};
use crate::utils::util::{clamp, wrap_longitude};
use serde::{Deserialize, Serialize};

/// Tolerance, in degrees, for treating two coordinates as the same point.
pub const COORD_EPSILON: f64 = 1e-9;

/// A geographic position in degrees.
///
/// Coordinates built with [`Coordinate::new`] or [`Coordinate::try_new`] have
/// latitude in `[-90, 90]` and longitude in `(-180, 180]`. Points on an
/// interpolated arc may carry an unwrapped longitude outside that range so the
/// arc stays continuous across the antimeridian; [`Coordinate::approx_eq`]
/// compares longitudes modulo 360 for that reason.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Builds a normalized coordinate. Latitude is clamped, longitude wrapped.
    /// Inputs are assumed finite; use [`Coordinate::try_new`] at the host boundary.
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinate {
            lat: clamp(lat, -90.0, 90.0),
            lng: wrap_longitude(lng),
        }
    }

    /// Validating constructor: rejects non-finite values and latitudes outside
    /// `[-90, 90]`. Longitude is wrapped into `(-180, 180]`.
    pub fn try_new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !lng.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(MeasureError::InvalidCoordinate { lat, lng });
        }
        Ok(Coordinate {
            lat,
            lng: wrap_longitude(lng),
        })
    }

    /// Builds a coordinate without normalizing the longitude.
    pub(crate) fn unwrapped(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    /// Same point within [`COORD_EPSILON`], longitudes compared modulo 360.
    /// At the poles every longitude names the same point.
    pub fn approx_eq(&self, other: &Coordinate) -> bool {
        if (self.lat - other.lat).abs() > COORD_EPSILON {
            return false;
        }
        if 90.0 - self.lat.abs() <= COORD_EPSILON {
            return true;
        }
        wrap_longitude(self.lng - other.lng).abs() <= COORD_EPSILON
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}
