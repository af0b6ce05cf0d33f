//! Geocoding data models

use serde::{Deserialize, Serialize};

/// A named place returned by the geocoding API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Place name ("Kazan")
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// First-level administrative region ("Tatarstan")
    #[serde(default, rename = "admin1", skip_serializing_if = "Option::is_none")]
    pub admin_region: Option<String>,
    /// Country name ("Russia")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// IANA timezone of the place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Search and reverse responses share one envelope
///
/// `results` is absent when nothing matched.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub results: Vec<Place>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_results_is_empty() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_place_maps_admin1() {
        let json = r#"{
            "id": 551487,
            "name": "Kazan",
            "latitude": 55.78874,
            "longitude": 49.12214,
            "admin1": "Tatarstan",
            "country": "Russia",
            "country_code": "RU",
            "timezone": "Europe/Moscow",
            "population": 1104738
        }"#;
        let place: Place = serde_json::from_str(json).unwrap();
        assert_eq!(place.admin_region.as_deref(), Some("Tatarstan"));
        assert_eq!(place.country_code.as_deref(), Some("RU"));
    }

    #[test]
    fn test_place_without_region() {
        let json = r#"{"name": "Monaco", "latitude": 43.73, "longitude": 7.42}"#;
        let place: Place = serde_json::from_str(json).unwrap();
        assert!(place.admin_region.is_none());
        assert!(place.country.is_none());
    }
}
