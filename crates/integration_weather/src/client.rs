//! Weather client abstraction
//!
//! Errors, the client trait and the HTTP plumbing shared by all providers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::Forecast;

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The API key was rejected
    #[error("Unauthorized: check the weather API key")]
    Unauthorized,
}

/// Weather client trait for fetching weather data
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Get current conditions and a sub-daily forecast covering `days` days
    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: u8,
    ) -> Result<Forecast, WeatherError>;

    /// Short provider name for logs
    fn provider(&self) -> &'static str;
}

/// Build an HTTP client with the given timeout
pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, WeatherError> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))
}

/// Validate coordinates
pub(crate) fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(WeatherError::InvalidCoordinates);
    }
    Ok(())
}

/// Map the response status and decode a JSON body
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, WeatherError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(WeatherError::RateLimitExceeded);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(WeatherError::Unauthorized);
    }
    if status.is_server_error() {
        return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
    }
    if !status.is_success() {
        return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
    }

    response
        .json()
        .await
        .map_err(|e| WeatherError::ParseError(e.to_string()))
}

/// Convert a Unix timestamp in seconds
pub(crate) fn parse_unix_time(seconds: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| WeatherError::ParseError(format!("Invalid timestamp: {seconds}")))
}
