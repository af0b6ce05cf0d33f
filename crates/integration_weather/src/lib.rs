//! Weather integration
//!
//! Clients for the Open-Meteo Weather API (<https://open-meteo.com>, no API
//! key) and the OpenWeatherMap API (<https://openweathermap.org>, API key).
//! Both deliver current conditions plus a sub-daily forecast as a
//! provider-neutral [`Forecast`].

pub mod client;
mod models;
mod open_meteo;
mod open_weather_map;

pub use client::{WeatherClient, WeatherError};
pub use models::{Forecast, Reading, WeatherCondition};
pub use open_meteo::{OpenMeteoClient, OpenMeteoConfig};
pub use open_weather_map::{OpenWeatherMapClient, OpenWeatherMapConfig};
