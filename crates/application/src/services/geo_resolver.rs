//! Geo resolver service
//!
//! Turns free-text city names or coordinate pairs into canonical place
//! records on top of the geocoding port.

use std::sync::Arc;

use domain::{GeoLocation, PlaceCandidate};
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::GeocodingPort;

/// Name used for the current position when reverse geocoding yields nothing
pub const DEFAULT_FALLBACK_PLACE_NAME: &str = "Your location";

/// Resolves names to candidates and coordinates to display names
pub struct GeoResolver {
    geocoding: Arc<dyn GeocodingPort>,
    fallback_name: String,
}

impl std::fmt::Debug for GeoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoResolver")
            .field("fallback_name", &self.fallback_name)
            .finish_non_exhaustive()
    }
}

impl GeoResolver {
    /// Create a resolver over the given geocoding port
    pub fn new(geocoding: Arc<dyn GeocodingPort>) -> Self {
        Self {
            geocoding,
            fallback_name: DEFAULT_FALLBACK_PLACE_NAME.to_string(),
        }
    }

    /// Override the placeholder used when reverse geocoding fails
    #[must_use]
    pub fn with_fallback_name(mut self, fallback_name: impl Into<String>) -> Self {
        self.fallback_name = fallback_name.into();
        self
    }

    /// The placeholder used when reverse geocoding fails
    pub fn fallback_name(&self) -> &str {
        &self.fallback_name
    }

    /// Search candidates by name, best match first
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank query or a zero limit (no request is
    /// made), and `Network` when the geocoding service cannot be reached.
    #[instrument(skip(self))]
    pub async fn search_by_name(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<PlaceCandidate>, ApplicationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApplicationError::Validation(
                "search query must not be empty".into(),
            ));
        }
        if limit == 0 {
            return Err(ApplicationError::Validation(
                "search limit must be positive".into(),
            ));
        }

        let mut candidates = self.geocoding.search(query, limit).await?;
        candidates.truncate(usize::from(limit));

        debug!(count = candidates.len(), "Geocoding search finished");
        Ok(candidates)
    }

    /// Resolve a name to its best candidate
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the search yields no candidates, plus any
    /// error of [`Self::search_by_name`].
    pub async fn resolve_first(&self, query: &str) -> Result<PlaceCandidate, ApplicationError> {
        self.search_by_name(query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApplicationError::NotFound(query.trim().to_string()))
    }

    /// Display name for the device position
    ///
    /// Never fails: a failed or empty reverse lookup yields the fallback name.
    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    pub async fn resolve_current_position(&self, coordinates: &GeoLocation) -> String {
        match self.geocoding.reverse(coordinates).await {
            Ok(Some(place)) => {
                let name = place.display_name();
                if name.is_empty() {
                    debug!("Reverse lookup returned a nameless place, using fallback");
                    self.fallback_name.clone()
                } else {
                    name
                }
            },
            Ok(None) => {
                debug!("Reverse lookup found no place, using fallback");
                self.fallback_name.clone()
            },
            Err(e) => {
                warn!(error = %e, "Reverse lookup failed, using fallback");
                self.fallback_name.clone()
            },
        }
    }
}
