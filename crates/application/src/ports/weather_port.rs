//! Weather service port
//!
//! Defines the interface for weather data retrieval. Implementations
//! normalize their provider's schema into a `WeatherSeries`.

use async_trait::async_trait;
use domain::{GeoLocation, WeatherSeries};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather service operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Fetch current conditions and a sub-daily forecast covering `days` days
    async fn fetch_series(
        &self,
        location: &GeoLocation,
        days: u8,
    ) -> Result<WeatherSeries, ApplicationError>;
}
