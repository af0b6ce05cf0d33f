//! Device geolocation port

use async_trait::async_trait;
use domain::GeoLocation;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for obtaining the device's current position
///
/// Implementations report `PermissionDenied`, `Timeout` or
/// `PositionUnavailable` when no position can be produced.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeolocationPort: Send + Sync {
    /// Current device coordinates
    async fn current_position(&self) -> Result<GeoLocation, ApplicationError>;
}
