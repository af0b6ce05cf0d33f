//! Application configuration
//!
//! Split into focused sub-modules:
//! - `integrations`: weather provider and geocoding service
//! - `dashboard`: location limits, debounce, device position, storage
//!
//! Sources are layered: built-in defaults, then an optional TOML file, then
//! `SKYDECK_*` environment variables (`SKYDECK_WEATHER__PROVIDER=open_weather_map`).

mod dashboard;
mod integrations;

use std::path::Path;

use application::ApplicationError;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use dashboard::{DashboardConfig, PositionConfig, StorageConfig};
pub use integrations::{GeocodingAppConfig, WeatherAppConfig, WeatherProvider};

use crate::telemetry::TelemetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SKYDECK";

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherAppConfig,

    /// Geocoding configuration
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// Dashboard behaviour
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Key-value storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required) or the default one
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::build(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        debug!(
            provider = %app_config.weather.provider,
            data_dir = %app_config.storage.data_dir.display(),
            "Configuration loaded"
        );
        Ok(app_config)
    }

    /// Reject combinations the adapters cannot work with
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` naming the offending setting.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.weather.provider == WeatherProvider::OpenWeatherMap {
            let has_key = self
                .weather
                .api_key
                .as_ref()
                .is_some_and(|key| !key.expose_secret().trim().is_empty());
            if !has_key {
                return Err(ApplicationError::Configuration(
                    "weather.api_key is required for open_weather_map".into(),
                ));
            }
        }

        if !(1..=16).contains(&self.weather.forecast_days) {
            return Err(ApplicationError::Configuration(format!(
                "weather.forecast_days must be 1-16, got {}",
                self.weather.forecast_days
            )));
        }

        if self.dashboard.max_locations == 0 {
            return Err(ApplicationError::Configuration(
                "dashboard.max_locations must be at least 1".into(),
            ));
        }

        let tolerance = self.dashboard.duplicate_tolerance_deg;
        if tolerance.is_nan() || tolerance <= 0.0 {
            return Err(ApplicationError::Configuration(
                "dashboard.duplicate_tolerance_deg must be positive".into(),
            ));
        }

        if self.geocoding.max_suggestions == 0 {
            return Err(ApplicationError::Configuration(
                "geocoding.max_suggestions must be at least 1".into(),
            ));
        }

        if let Some(position) = self.dashboard.default_position {
            if position.to_geo_location().is_none() {
                return Err(ApplicationError::Configuration(format!(
                    "dashboard.default_position is out of range: {}, {}",
                    position.latitude, position.longitude
                )));
            }
        }

        Ok(())
    }
}
