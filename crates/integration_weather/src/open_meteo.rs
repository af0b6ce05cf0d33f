//! Open-Meteo weather client
//!
//! HTTP client for the Open-Meteo Weather API. Requests a current block plus
//! hourly columns in Unix time so readings carry UTC timestamps, together
//! with the location's UTC offset.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::{
    WeatherClient, WeatherError, build_http_client, decode_json, parse_unix_time,
    validate_coordinates,
};
use crate::models::{
    Forecast, OpenMeteoCurrent, OpenMeteoHourly, OpenMeteoResponse, Reading, WeatherCondition,
};

const VARIABLES: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,\
                         surface_pressure,wind_speed_10m,weather_code,is_day";

/// Open-Meteo client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenMeteoConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenMeteoConfig) -> Result<Self, WeatherError> {
        let client = build_http_client(config.timeout_secs)?;
        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(OpenMeteoConfig::default())
    }

    fn parse_current(data: &OpenMeteoCurrent) -> Result<Reading, WeatherError> {
        let condition = WeatherCondition::from_wmo_code(data.weather_code);
        Ok(Reading {
            time: parse_unix_time(data.time)?,
            temperature: data.temperature_2m,
            apparent_temperature: data.apparent_temperature,
            humidity: data.relative_humidity_2m,
            pressure: data.surface_pressure,
            wind_speed: data.wind_speed_10m,
            condition_code: i32::from(data.weather_code),
            description: condition.description().to_string(),
            icon: condition.icon(data.is_day != 0),
        })
    }

    /// Turn the hourly columns into readings
    ///
    /// Hours without a temperature or weather code are skipped.
    fn parse_hourly(hourly: &OpenMeteoHourly) -> Result<Vec<Reading>, WeatherError> {
        let mut readings = Vec::with_capacity(hourly.time.len());

        for (i, &time) in hourly.time.iter().enumerate() {
            let (Some(temperature), Some(code)) = (
                hourly.temperature_2m.get(i).copied().flatten(),
                hourly.weather_code.get(i).copied().flatten(),
            ) else {
                continue;
            };

            let condition = WeatherCondition::from_wmo_code(code);
            let is_day = hourly.is_day.get(i).copied().flatten().unwrap_or(1) != 0;

            readings.push(Reading {
                time: parse_unix_time(time)?,
                temperature,
                apparent_temperature: hourly.apparent_temperature.get(i).copied().flatten(),
                humidity: hourly.relative_humidity_2m.get(i).copied().flatten(),
                pressure: hourly.surface_pressure.get(i).copied().flatten(),
                wind_speed: hourly.wind_speed_10m.get(i).copied().flatten(),
                condition_code: i32::from(code),
                description: condition.description().to_string(),
                icon: condition.icon(is_day),
            });
        }

        Ok(readings)
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude, days = %days))]
    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: u8,
    ) -> Result<Forecast, WeatherError> {
        validate_coordinates(latitude, longitude)?;

        let url = format!("{}/forecast", self.config.base_url);
        let days = days.clamp(1, 16);
        debug!(url = %url, "Fetching weather forecast");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", VARIABLES.to_string()),
                ("hourly", VARIABLES.to_string()),
                ("timezone", "auto".to_string()),
                ("timeformat", "unixtime".to_string()),
                ("forecast_days", days.to_string()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        let api_response: OpenMeteoResponse = decode_json(response).await?;

        let current = api_response
            .current
            .as_ref()
            .map(Self::parse_current)
            .transpose()?;
        let readings = match api_response.hourly.as_ref() {
            Some(hourly) => Self::parse_hourly(hourly)?,
            None => Vec::new(),
        };

        debug!(readings = readings.len(), "Parsed Open-Meteo forecast");

        Ok(Forecast {
            current,
            readings,
            utc_offset_seconds: api_response.utc_offset_seconds,
        })
    }

    fn provider(&self) -> &'static str {
        "open-meteo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OpenMeteoConfig::default();
        assert_eq!(config.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_parse_current() {
        let data = OpenMeteoCurrent {
            time: 1_714_564_800,
            temperature_2m: 10.5,
            apparent_temperature: Some(8.2),
            relative_humidity_2m: Some(75),
            surface_pressure: Some(1013.25),
            wind_speed_10m: Some(15.0),
            weather_code: 3,
            is_day: 0,
        };

        let reading = OpenMeteoClient::parse_current(&data).expect("should parse");
        assert!((reading.temperature - 10.5).abs() < f64::EPSILON);
        assert_eq!(reading.humidity, Some(75));
        assert_eq!(reading.condition_code, 3);
        assert_eq!(reading.description, "Overcast");
        assert_eq!(reading.icon, "04n");
    }

    #[test]
    fn test_parse_hourly_skips_incomplete_hours() {
        let hourly = OpenMeteoHourly {
            time: vec![1_714_521_600, 1_714_525_200, 1_714_528_800],
            temperature_2m: vec![Some(5.0), None, Some(7.0)],
            apparent_temperature: vec![],
            relative_humidity_2m: vec![],
            surface_pressure: vec![],
            wind_speed_10m: vec![],
            weather_code: vec![Some(0), Some(1), Some(61)],
            is_day: vec![Some(0), Some(0), Some(1)],
        };

        let readings = OpenMeteoClient::parse_hourly(&hourly).expect("should parse");
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].icon, "01n");
        assert_eq!(readings[1].description, "Rain");
        assert!(readings[0].apparent_temperature.is_none());
    }

    #[test]
    fn test_client_creation() {
        let client = OpenMeteoClient::with_defaults();
        assert!(client.is_ok());
        assert_eq!(client.unwrap().provider(), "open-meteo");
    }

    #[test]
    fn test_config_serialization() {
        let config = OpenMeteoConfig {
            base_url: "https://custom.api.com".to_string(),
            timeout_secs: 60,
        };

        let json = serde_json::to_string(&config).expect("should serialize");
        let deserialized: OpenMeteoConfig =
            serde_json::from_str(&json).expect("should deserialize");

        assert_eq!(deserialized.base_url, "https://custom.api.com");
        assert_eq!(deserialized.timeout_secs, 60);
    }
}
