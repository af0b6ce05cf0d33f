//! Dashboard behaviour and storage configuration.

use std::path::PathBuf;
use std::time::Duration;

use application::{DEFAULT_FALLBACK_PLACE_NAME, DEFAULT_MAX_LOCATIONS, LocationStoreConfig};
use domain::{DEFAULT_COORDINATE_TOLERANCE, GeoLocation};
use serde::{Deserialize, Serialize};

// ==============================
// Dashboard Configuration
// ==============================

/// Dashboard behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Maximum number of tracked locations
    #[serde(default = "default_max_locations")]
    pub max_locations: usize,

    /// Per-axis tolerance (degrees) under which two places are the same
    #[serde(default = "default_duplicate_tolerance")]
    pub duplicate_tolerance_deg: f64,

    /// Quiet window before a suggestion lookup fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Upper bound on obtaining the device position
    #[serde(default = "default_geolocation_timeout")]
    pub geolocation_timeout_secs: u64,

    /// Name shown when reverse geocoding yields nothing
    #[serde(default = "default_fallback_place_name")]
    pub fallback_place_name: String,

    /// Device position used by `locate` when none is given on the command line
    ///
    /// Configured as inline table: `{ latitude = 55.79, longitude = 49.12 }`
    #[serde(default)]
    pub default_position: Option<PositionConfig>,
}

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
}

impl PositionConfig {
    /// Convert to domain `GeoLocation`
    ///
    /// Returns `None` if coordinates are invalid.
    #[must_use]
    pub fn to_geo_location(&self) -> Option<GeoLocation> {
        GeoLocation::new(self.latitude, self.longitude).ok()
    }
}

const fn default_max_locations() -> usize {
    DEFAULT_MAX_LOCATIONS
}

const fn default_duplicate_tolerance() -> f64 {
    DEFAULT_COORDINATE_TOLERANCE
}

const fn default_debounce_ms() -> u64 {
    300
}

const fn default_geolocation_timeout() -> u64 {
    8
}

fn default_fallback_place_name() -> String {
    DEFAULT_FALLBACK_PLACE_NAME.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_locations: default_max_locations(),
            duplicate_tolerance_deg: default_duplicate_tolerance(),
            debounce_ms: default_debounce_ms(),
            geolocation_timeout_secs: default_geolocation_timeout(),
            fallback_place_name: default_fallback_place_name(),
            default_position: None,
        }
    }
}

impl DashboardConfig {
    /// Settings for the tracked-location store
    #[must_use]
    pub const fn location_store_config(&self) -> LocationStoreConfig {
        LocationStoreConfig {
            max_locations: self.max_locations,
            duplicate_tolerance: self.duplicate_tolerance_deg,
        }
    }

    /// Suggestion debounce window
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Device position timeout
    #[must_use]
    pub const fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_secs)
    }
}

// ==============================
// Storage Configuration
// ==============================

/// Key-value storage location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per persisted key
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./skydeck-data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}
