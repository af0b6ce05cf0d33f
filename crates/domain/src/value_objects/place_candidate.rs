//! Geocoding candidates and display-name formatting
//!
//! A candidate is an unconfirmed geocoding result. Its display name is the
//! canonical string used both for list display and for matching a committed
//! suggestion against the text in the search field.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::format_display_name;
//!
//! assert_eq!(
//!     format_display_name("Kazan", Some("Tatarstan"), Some("Russia")),
//!     "Kazan, Tatarstan, Russia"
//! );
//! assert_eq!(format_display_name("Kazan", None, Some("")), "Kazan");
//! ```

use serde::{Deserialize, Serialize};

use super::GeoLocation;

/// Format `name[, admin_region][, country]`, skipping absent or blank parts
#[must_use]
pub fn format_display_name(name: &str, admin_region: Option<&str>, country: Option<&str>) -> String {
    let mut display = name.trim().to_string();
    for part in [admin_region, country].into_iter().flatten() {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !display.is_empty() {
            display.push_str(", ");
        }
        display.push_str(part);
    }
    display
}

/// A place returned by a geocoding lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Place name (city, town, village)
    pub name: String,
    /// First-level administrative region (state, oblast, province)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_region: Option<String>,
    /// Country name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl PlaceCandidate {
    /// Create a candidate with only a name and coordinates
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            admin_region: None,
            country: None,
            latitude,
            longitude,
        }
    }

    /// Set the administrative region
    #[must_use]
    pub fn with_admin_region(mut self, admin_region: impl Into<String>) -> Self {
        self.admin_region = Some(admin_region.into());
        self
    }

    /// Set the country
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Human-readable name used for display and selection matching
    #[must_use]
    pub fn display_name(&self) -> String {
        format_display_name(
            &self.name,
            self.admin_region.as_deref(),
            self.country.as_deref(),
        )
    }

    /// Coordinates of the candidate
    #[must_use]
    pub const fn coordinates(&self) -> GeoLocation {
        GeoLocation::new_unchecked(self.latitude, self.longitude)
    }
}
