//! OpenWeatherMap client
//!
//! Uses the free-tier `/weather` (current) and `/forecast` (3-hourly, five
//! days) endpoints in metric units. Both calls run concurrently.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::{
    WeatherClient, WeatherError, build_http_client, decode_json, parse_unix_time,
    validate_coordinates,
};
use crate::models::{
    Forecast, OwmCondition, OwmCurrentResponse, OwmForecastItem, OwmForecastResponse, Reading,
};

/// Maximum number of 3-hour slots the free forecast endpoint returns
const MAX_FORECAST_SLOTS: u16 = 40;

/// OpenWeatherMap client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherMapConfig {
    /// API base URL (default: <https://api.openweathermap.org/data/2.5>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (sensitive)
    #[serde(skip_serializing)]
    pub api_key: SecretString,

    /// Language for condition descriptions (default: "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Connection timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl OpenWeatherMapConfig {
    /// Configuration with default endpoint settings for `api_key`
    #[must_use]
    pub fn with_api_key(api_key: SecretString) -> Self {
        Self {
            base_url: default_base_url(),
            api_key,
            language: default_language(),
            timeout_secs: default_timeout(),
        }
    }
}

/// OpenWeatherMap HTTP client implementation
#[derive(Debug)]
pub struct OpenWeatherMapClient {
    client: Client,
    config: OpenWeatherMapConfig,
}

impl OpenWeatherMapClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenWeatherMapConfig) -> Result<Self, WeatherError> {
        let client = build_http_client(config.timeout_secs)?;
        Ok(Self { client, config })
    }

    fn query(&self, latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        vec![
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("units", "metric".to_string()),
            ("lang", self.config.language.clone()),
            ("appid", self.config.api_key.expose_secret().to_string()),
        ]
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.config.base_url);
        debug!(url = %url, "Requesting OpenWeatherMap");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed(e.to_string()))?;

        decode_json(response).await
    }

    fn reading(
        dt: i64,
        main: &crate::models::OwmMain,
        weather: &[OwmCondition],
        wind_speed: Option<f64>,
    ) -> Result<Reading, WeatherError> {
        let condition = weather
            .first()
            .ok_or_else(|| WeatherError::ParseError("Reading without weather condition".into()))?;

        Ok(Reading {
            time: parse_unix_time(dt)?,
            temperature: main.temp,
            apparent_temperature: main.feels_like,
            humidity: main.humidity,
            pressure: main.pressure,
            wind_speed,
            condition_code: condition.id,
            description: condition.description.clone(),
            icon: condition.icon.clone(),
        })
    }

    fn parse_current(data: &OwmCurrentResponse) -> Result<Reading, WeatherError> {
        Self::reading(
            data.dt,
            &data.main,
            &data.weather,
            data.wind.as_ref().map(|w| w.speed),
        )
    }

    fn parse_item(item: &OwmForecastItem) -> Result<Reading, WeatherError> {
        Self::reading(
            item.dt,
            &item.main,
            &item.weather,
            item.wind.as_ref().map(|w| w.speed),
        )
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherMapClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude, days = %days))]
    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: u8,
    ) -> Result<Forecast, WeatherError> {
        validate_coordinates(latitude, longitude)?;

        let base = self.query(latitude, longitude);
        let slots = (u16::from(days.max(1)) * 8).min(MAX_FORECAST_SLOTS);
        let mut forecast_query = base.clone();
        forecast_query.push(("cnt", slots.to_string()));

        let (current, forecast): (OwmCurrentResponse, OwmForecastResponse) = tokio::try_join!(
            self.get_json("weather", &base),
            self.get_json("forecast", &forecast_query),
        )?;

        let readings = forecast
            .list
            .iter()
            .map(Self::parse_item)
            .collect::<Result<Vec<_>, _>>()?;

        let utc_offset_seconds = current
            .timezone
            .or_else(|| forecast.city.as_ref().and_then(|c| c.timezone));

        Ok(Forecast {
            current: Some(Self::parse_current(&current)?),
            readings,
            utc_offset_seconds,
        })
    }

    fn provider(&self) -> &'static str {
        "openweathermap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OpenWeatherMapConfig {
        OpenWeatherMapConfig::with_api_key(SecretString::from("test-key"))
    }

    #[test]
    fn test_config_defaults() {
        let config = config();
        assert_eq!(config.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.language, "en");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let json = serde_json::to_string(&config()).expect("should serialize");
        assert!(!json.contains("test-key"));
    }

    #[test]
    fn test_query_carries_units_and_key() {
        let client = OpenWeatherMapClient::new(config()).expect("client");
        let query = client.query(55.79, 49.12);
        assert!(query.contains(&("units", "metric".to_string())));
        assert!(query.contains(&("appid", "test-key".to_string())));
    }

    #[test]
    fn test_parse_current() {
        let json = r#"{
            "dt": 1714564800,
            "timezone": 10800,
            "main": {"temp": 12.4, "feels_like": 11.0, "pressure": 1012, "humidity": 54},
            "weather": [{"id": 803, "description": "broken clouds", "icon": "04d"}],
            "wind": {"speed": 4.1}
        }"#;
        let data: OwmCurrentResponse = serde_json::from_str(json).unwrap();
        let reading = OpenWeatherMapClient::parse_current(&data).unwrap();

        assert_eq!(reading.condition_code, 803);
        assert_eq!(reading.description, "broken clouds");
        assert_eq!(reading.icon, "04d");
        assert_eq!(reading.wind_speed, Some(4.1));
    }

    #[test]
    fn test_reading_without_condition_is_rejected() {
        let json = r#"{"dt": 1714564800, "main": {"temp": 1.0}, "weather": []}"#;
        let data: OwmCurrentResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            OpenWeatherMapClient::parse_current(&data),
            Err(WeatherError::ParseError(_))
        ));
    }
}
