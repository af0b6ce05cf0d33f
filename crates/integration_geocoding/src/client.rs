//! Open-Meteo geocoding client
//!
//! HTTP client for the Open-Meteo Geocoding API: forward search by name and
//! reverse lookup by coordinates.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ApiResponse, Place};

/// Geocoding client errors
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to the geocoding service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the geocoding service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from geocoding service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Empty query or out-of-range coordinates
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Geocoding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// API base URL (default: <https://geocoding-api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language of returned names (default: "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Connection timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Geocoding client trait
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Places matching `name`, best match first, at most `count`
    async fn search(&self, name: &str, count: u8) -> Result<Vec<Place>, GeocodingError>;

    /// Nearest named place to the coordinates, if any
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Place>, GeocodingError>;
}

/// Open-Meteo geocoding HTTP client
#[derive(Debug)]
pub struct OpenMeteoGeocodingClient {
    client: Client,
    config: GeocodingConfig,
}

impl OpenMeteoGeocodingClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: GeocodingConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, GeocodingError> {
        Self::new(GeocodingConfig::default())
    }

    async fn request(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse, GeocodingError> {
        let url = format!("{}/{endpoint}", self.config.base_url);
        debug!(url = %url, "Requesting geocoding API");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| GeocodingError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(GeocodingError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl GeocodingClient for OpenMeteoGeocodingClient {
    #[instrument(skip(self))]
    async fn search(&self, name: &str, count: u8) -> Result<Vec<Place>, GeocodingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GeocodingError::InvalidInput("empty place name".into()));
        }

        let response = self
            .request(
                "search",
                &[
                    ("name", name.to_string()),
                    ("count", count.clamp(1, 100).to_string()),
                    ("language", self.config.language.clone()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        debug!(count = response.results.len(), "Geocoding search returned");
        Ok(response.results)
    }

    #[instrument(skip(self))]
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Place>, GeocodingError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeocodingError::InvalidInput(format!(
                "coordinates out of range: {latitude}, {longitude}"
            )));
        }

        let response = self
            .request(
                "reverse",
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("language", self.config.language.clone()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        Ok(response.results.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GeocodingConfig::default();
        assert_eq!(config.base_url, "https://geocoding-api.open-meteo.com/v1");
        assert_eq!(config.language, "en");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_config_partial_deserialization() {
        let config: GeocodingConfig = serde_json::from_str(r#"{"language": "ru"}"#).unwrap();
        assert_eq!(config.language, "ru");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_client_creation() {
        assert!(OpenMeteoGeocodingClient::with_defaults().is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = GeocodingError::InvalidInput("empty place name".into());
        assert_eq!(err.to_string(), "Invalid input: empty place name");
    }
}
