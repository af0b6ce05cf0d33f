//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod geocoding_adapter;
mod geolocation_adapter;
mod weather_adapter;

pub use geocoding_adapter::GeocodingAdapter;
pub use geolocation_adapter::{
    BoundedGeolocation, DEFAULT_GEOLOCATION_TIMEOUT, FixedPositionAdapter,
};
pub use weather_adapter::WeatherAdapter;
