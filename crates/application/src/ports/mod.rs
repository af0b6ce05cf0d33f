//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod geocoding_port;
mod geolocation_port;
mod key_value_store;
mod weather_port;

#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use geolocation_port::MockGeolocationPort;
pub use geolocation_port::GeolocationPort;
pub use key_value_store::{KeyValueStore, LOCATIONS_KEY, WEATHER_SNAPSHOT_KEY};
#[cfg(test)]
pub use weather_port::MockWeatherPort;
pub use weather_port::WeatherPort;
