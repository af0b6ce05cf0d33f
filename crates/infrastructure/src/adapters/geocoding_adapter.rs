//! Geocoding adapter - Implements GeocodingPort using integration_geocoding

use application::{ApplicationError, GeocodingPort};
use async_trait::async_trait;
use domain::{GeoLocation, PlaceCandidate};
use integration_geocoding::{
    GeocodingClient, GeocodingConfig, GeocodingError, OpenMeteoGeocodingClient, Place,
};
use tracing::{debug, instrument, warn};

/// Adapter for the Open-Meteo geocoding service
pub struct GeocodingAdapter {
    client: Box<dyn GeocodingClient>,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &"OpenMeteoGeocodingClient")
            .finish()
    }
}

impl GeocodingAdapter {
    /// Wrap an existing client
    pub fn new(client: impl GeocodingClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: GeocodingConfig) -> Result<Self, ApplicationError> {
        let client = OpenMeteoGeocodingClient::new(config)
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::new(client))
    }

    /// Map integration geocoding error to application error
    fn map_error(err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::ConnectionFailed(e)
            | GeocodingError::RequestFailed(e)
            | GeocodingError::ServiceUnavailable(e) => ApplicationError::Network(e),
            GeocodingError::RateLimitExceeded => {
                ApplicationError::Network("geocoding rate limit exceeded".into())
            },
            GeocodingError::ParseError(e) => ApplicationError::InvalidResponse(e),
            GeocodingError::InvalidInput(e) => ApplicationError::Validation(e),
        }
    }

    /// Convert a provider place into a candidate
    ///
    /// Places with out-of-range coordinates are dropped.
    fn map_place(place: Place) -> Option<PlaceCandidate> {
        if GeoLocation::new(place.latitude, place.longitude).is_err() {
            warn!(name = %place.name, "Dropping place with invalid coordinates");
            return None;
        }

        let mut candidate = PlaceCandidate::new(place.name, place.latitude, place.longitude);
        if let Some(region) = place.admin_region.filter(|r| !r.trim().is_empty()) {
            candidate = candidate.with_admin_region(region);
        }
        if let Some(country) = place.country.filter(|c| !c.trim().is_empty()) {
            candidate = candidate.with_country(country);
        }
        Some(candidate)
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<PlaceCandidate>, ApplicationError> {
        let places = self
            .client
            .search(query, limit)
            .await
            .map_err(Self::map_error)?;

        let candidates: Vec<PlaceCandidate> =
            places.into_iter().filter_map(Self::map_place).collect();
        debug!(count = candidates.len(), "Geocoding search mapped");
        Ok(candidates)
    }

    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    async fn reverse(
        &self,
        coordinates: &GeoLocation,
    ) -> Result<Option<PlaceCandidate>, ApplicationError> {
        let place = self
            .client
            .reverse(coordinates.latitude(), coordinates.longitude())
            .await
            .map_err(Self::map_error)?;

        Ok(place.and_then(Self::map_place))
    }
}
