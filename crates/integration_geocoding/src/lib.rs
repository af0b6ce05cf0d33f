//! Open-Meteo geocoding integration
//!
//! Client for the Open-Meteo Geocoding API
//! (<https://open-meteo.com/en/docs/geocoding-api>). Resolves place names
//! to coordinates and coordinates to the nearest named place without an
//! API key.

pub mod client;
mod models;

pub use client::{GeocodingClient, GeocodingConfig, GeocodingError, OpenMeteoGeocodingClient};
pub use models::Place;
