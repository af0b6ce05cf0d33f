//! Integration configurations: weather provider and geocoding.

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// ==============================
// Weather Configuration
// ==============================

/// Weather data provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherProvider {
    /// Open-Meteo (no API key)
    #[default]
    OpenMeteo,
    /// OpenWeatherMap (requires `api_key`)
    OpenWeatherMap,
}

impl fmt::Display for WeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenMeteo => write!(f, "open_meteo"),
            Self::OpenWeatherMap => write!(f, "open_weather_map"),
        }
    }
}

impl std::str::FromStr for WeatherProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "open_meteo" | "openmeteo" => Ok(Self::OpenMeteo),
            "open_weather_map" | "openweathermap" | "owm" => Ok(Self::OpenWeatherMap),
            _ => Err(format!(
                "Invalid weather provider: {s}. Use 'open_meteo' or 'open_weather_map'"
            )),
        }
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// Active provider
    #[serde(default)]
    pub provider: WeatherProvider,

    /// API base URL override; the provider's public endpoint when unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key (OpenWeatherMap only)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Language for condition descriptions (OpenWeatherMap only)
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,

    /// Number of forecast days shown per location (1-16)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_weather_timeout() -> u64 {
    30
}

const fn default_forecast_days() -> u8 {
    3
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            provider: WeatherProvider::default(),
            base_url: None,
            api_key: None,
            language: default_language(),
            timeout_secs: default_weather_timeout(),
            forecast_days: default_forecast_days(),
        }
    }
}

// ==============================
// Geocoding Configuration
// ==============================

/// Geocoding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingAppConfig {
    /// API base URL
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Language of returned place names
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of suggestions per lookup
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: u8,
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

const fn default_geocoding_timeout() -> u64 {
    10
}

const fn default_max_suggestions() -> u8 {
    6
}

impl Default for GeocodingAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            language: default_language(),
            timeout_secs: default_geocoding_timeout(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl GeocodingAppConfig {
    /// Client configuration for the geocoding integration
    #[must_use]
    pub fn client_config(&self) -> integration_geocoding::GeocodingConfig {
        integration_geocoding::GeocodingConfig {
            base_url: self.base_url.clone(),
            language: self.language.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_defaults() {
        let config = WeatherAppConfig::default();
        assert_eq!(config.provider, WeatherProvider::OpenMeteo);
        assert!(config.base_url.is_none());
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.forecast_days, 3);
    }

    #[test]
    fn provider_deserializes_snake_case() {
        let config: WeatherAppConfig =
            serde_json::from_str(r#"{"provider": "open_weather_map", "api_key": "k"}"#).unwrap();
        assert_eq!(config.provider, WeatherProvider::OpenWeatherMap);
        assert!(config.api_key.is_some());
    }

    #[test]
    fn provider_from_str_accepts_aliases() {
        assert_eq!(
            "open-meteo".parse::<WeatherProvider>().unwrap(),
            WeatherProvider::OpenMeteo
        );
        assert_eq!(
            "OWM".parse::<WeatherProvider>().unwrap(),
            WeatherProvider::OpenWeatherMap
        );
        assert!("darksky".parse::<WeatherProvider>().is_err());
    }

    #[test]
    fn provider_display_round_trips() {
        for provider in [WeatherProvider::OpenMeteo, WeatherProvider::OpenWeatherMap] {
            assert_eq!(provider.to_string().parse::<WeatherProvider>().unwrap(), provider);
        }
    }

    #[test]
    fn api_key_is_not_serialized() {
        let config = WeatherAppConfig {
            api_key: Some(SecretString::from("super-secret")),
            ..WeatherAppConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn geocoding_defaults() {
        let config = GeocodingAppConfig::default();
        assert_eq!(config.base_url, "https://geocoding-api.open-meteo.com/v1");
        assert_eq!(config.max_suggestions, 6);

        let client = config.client_config();
        assert_eq!(client.timeout_secs, 10);
        assert_eq!(client.language, "en");
    }
}
