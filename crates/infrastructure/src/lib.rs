//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: weather and geocoding
//! over HTTP, device position, key-value persistence. Also owns
//! configuration loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, DashboardConfig, GeocodingAppConfig, PositionConfig, StorageConfig,
    WeatherAppConfig, WeatherProvider,
};
pub use persistence::{InMemoryStore, JsonFileStore};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_tracing};
