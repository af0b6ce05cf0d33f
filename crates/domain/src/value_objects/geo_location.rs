//! Geographic coordinate value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Default per-axis tolerance (degrees) under which two points count as the same place
pub const DEFAULT_COORDINATE_TOLERANCE: f64 = 0.001;

/// A geographic point with latitude and longitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

impl GeoLocation {
    /// Create a new point with range validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180] (NaN is rejected as well).
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a point without validation (for values read back from trusted sources)
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whether `other` lies within `tolerance` degrees on both axes
    ///
    /// The comparison is strict: a difference of exactly `tolerance` is not "near".
    #[must_use]
    pub fn is_near(&self, other: &Self, tolerance: f64) -> bool {
        (self.latitude - other.latitude).abs() < tolerance
            && (self.longitude - other.longitude).abs() < tolerance
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_coordinates() {
        let loc = GeoLocation::new(55.7558, 37.6173).expect("valid coordinates");
        assert!((loc.latitude() - 55.7558).abs() < f64::EPSILON);
        assert!((loc.longitude() - 37.6173).abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_coordinates() {
        assert!(GeoLocation::new(90.0, 180.0).is_ok());
        assert!(GeoLocation::new(-90.0, -180.0).is_ok());
        assert!(GeoLocation::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(GeoLocation::new(91.0, 0.0).is_err());
        assert!(GeoLocation::new(-91.0, 0.0).is_err());
        assert!(GeoLocation::new(0.0, 181.0).is_err());
        assert!(GeoLocation::new(0.0, -181.0).is_err());
    }

    #[test]
    fn nan_is_rejected() {
        assert!(GeoLocation::new(f64::NAN, 0.0).is_err());
        assert!(GeoLocation::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn near_within_tolerance() {
        let a = GeoLocation::new_unchecked(59.9343, 30.3351);
        let b = GeoLocation::new_unchecked(59.9349, 30.3344);
        assert!(a.is_near(&b, DEFAULT_COORDINATE_TOLERANCE));
        assert!(b.is_near(&a, DEFAULT_COORDINATE_TOLERANCE));
    }

    #[test]
    fn not_near_when_one_axis_differs() {
        let a = GeoLocation::new_unchecked(59.9343, 30.3351);
        let b = GeoLocation::new_unchecked(59.9343, 30.3400);
        assert!(!a.is_near(&b, DEFAULT_COORDINATE_TOLERANCE));
    }

    #[test]
    fn display_uses_four_decimals() {
        let loc = GeoLocation::new_unchecked(55.755_826, 37.617_3);
        assert_eq!(loc.to_string(), "55.7558, 37.6173");
    }

    #[test]
    fn serialization_roundtrip() {
        let loc = GeoLocation::new(55.7558, 37.6173).expect("valid");
        let json = serde_json::to_string(&loc).expect("serialize");
        assert!(json.contains("\"latitude\":55.7558"));

        let back: GeoLocation = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(loc, back);
    }
}
