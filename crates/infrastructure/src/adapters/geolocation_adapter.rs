//! Device position adapters
//!
//! A terminal has no positioning hardware, so the position comes from the
//! command line or the configuration. [`BoundedGeolocation`] caps any
//! position source with a timeout.

use std::sync::Arc;
use std::time::Duration;

use application::{ApplicationError, GeolocationPort};
use async_trait::async_trait;
use domain::GeoLocation;
use tracing::{debug, instrument, warn};

/// Default upper bound on obtaining a position
pub const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(8);

/// Position source backed by a fixed, pre-supplied coordinate pair
#[derive(Debug, Clone, Default)]
pub struct FixedPositionAdapter {
    position: Option<GeoLocation>,
}

impl FixedPositionAdapter {
    /// Source that always reports `position`
    #[must_use]
    pub const fn new(position: GeoLocation) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// Source with no position available
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { position: None }
    }

    /// Source from an optional position
    #[must_use]
    pub const fn from_option(position: Option<GeoLocation>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl GeolocationPort for FixedPositionAdapter {
    async fn current_position(&self) -> Result<GeoLocation, ApplicationError> {
        self.position.ok_or_else(|| {
            ApplicationError::PositionUnavailable(
                "no position supplied; pass --lat/--lon or set dashboard.default_position".into(),
            )
        })
    }
}

/// Wraps a position source and fails with `Timeout` when it is too slow
pub struct BoundedGeolocation {
    inner: Arc<dyn GeolocationPort>,
    timeout: Duration,
}

impl std::fmt::Debug for BoundedGeolocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedGeolocation")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BoundedGeolocation {
    /// Bound `inner` by the default timeout
    pub fn new(inner: Arc<dyn GeolocationPort>) -> Self {
        Self::with_timeout(inner, DEFAULT_GEOLOCATION_TIMEOUT)
    }

    /// Bound `inner` by `timeout`
    pub fn with_timeout(inner: Arc<dyn GeolocationPort>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Configured timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl GeolocationPort for BoundedGeolocation {
    #[instrument(skip(self), fields(timeout_ms = self.timeout.as_millis()))]
    async fn current_position(&self) -> Result<GeoLocation, ApplicationError> {
        match tokio::time::timeout(self.timeout, self.inner.current_position()).await {
            Ok(Ok(position)) => {
                debug!(lat = position.latitude(), lon = position.longitude(), "Position obtained");
                Ok(position)
            },
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!("Position request timed out");
                Err(ApplicationError::Timeout)
            },
        }
    }
}
