//! Location entity - A tracked place on the dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, LocationId, PlaceCandidate};

/// A tracked geographic point: either the device position or a named city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Stable identifier
    pub id: LocationId,
    /// Name shown to the user ("Kazan, Tatarstan, Russia")
    pub display_name: String,
    /// Short canonical name used for duplicate detection and re-resolution
    pub canonical_name: String,
    /// Coordinates; absent only for records that still await geocoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoLocation>,
    /// Whether this is the live device-position slot
    #[serde(default)]
    pub is_current_position: bool,
    /// When the location was added (or the position last refreshed)
    pub added_at: DateTime<Utc>,
}

impl Location {
    /// Create a named city location from a geocoding candidate
    #[must_use]
    pub fn from_candidate(candidate: &PlaceCandidate) -> Self {
        Self {
            id: LocationId::new(),
            display_name: candidate.display_name(),
            canonical_name: candidate.name.trim().to_string(),
            coordinates: Some(candidate.coordinates()),
            is_current_position: false,
            added_at: Utc::now(),
        }
    }

    /// Create the current-position record
    #[must_use]
    pub fn current_position(display_name: impl Into<String>, coordinates: GeoLocation) -> Self {
        let display_name = display_name.into();
        Self {
            id: LocationId::new(),
            canonical_name: display_name.clone(),
            display_name,
            coordinates: Some(coordinates),
            is_current_position: true,
            added_at: Utc::now(),
        }
    }

    /// Whether the canonical name matches `other`, ignoring case and surrounding whitespace
    #[must_use]
    pub fn has_name(&self, other: &str) -> bool {
        let other = other.trim();
        !other.is_empty() && self.canonical_name.trim().to_lowercase() == other.to_lowercase()
    }

    /// Return a copy with the given coordinates
    #[must_use]
    pub fn with_coordinates(mut self, coordinates: GeoLocation) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}
