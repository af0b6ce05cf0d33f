//! Weather adapter - Implements WeatherPort using integration_weather

use application::{ApplicationError, WeatherPort};
use async_trait::async_trait;
use domain::{GeoLocation, RawWeatherSample, WeatherSeries};
use integration_weather::{
    Forecast, OpenMeteoClient, OpenMeteoConfig, OpenWeatherMapClient, OpenWeatherMapConfig,
    Reading, WeatherClient, WeatherError,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use crate::config::{WeatherAppConfig, WeatherProvider};

/// Adapter normalizing any weather provider into `WeatherSeries`
pub struct WeatherAdapter {
    client: Box<dyn WeatherClient>,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("provider", &self.client.provider())
            .finish()
    }
}

impl WeatherAdapter {
    /// Wrap an existing client
    pub fn new(client: impl WeatherClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Build the client selected by `config`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if OpenWeatherMap is selected
    /// without an API key, or `Internal` if the HTTP client fails to initialize.
    pub fn from_config(config: &WeatherAppConfig) -> Result<Self, ApplicationError> {
        match config.provider {
            WeatherProvider::OpenMeteo => {
                let mut client_config = OpenMeteoConfig {
                    timeout_secs: config.timeout_secs,
                    ..OpenMeteoConfig::default()
                };
                if let Some(base_url) = &config.base_url {
                    client_config.base_url.clone_from(base_url);
                }
                let client = OpenMeteoClient::new(client_config)
                    .map_err(|e| ApplicationError::Internal(e.to_string()))?;
                Ok(Self::new(client))
            },
            WeatherProvider::OpenWeatherMap => {
                let api_key = config.api_key.as_ref().ok_or_else(|| {
                    ApplicationError::Configuration(
                        "OpenWeatherMap requires weather.api_key".into(),
                    )
                })?;
                let mut client_config = OpenWeatherMapConfig::with_api_key(SecretString::from(
                    api_key.expose_secret().to_owned(),
                ));
                if let Some(base_url) = &config.base_url {
                    client_config.base_url.clone_from(base_url);
                }
                client_config.language.clone_from(&config.language);
                client_config.timeout_secs = config.timeout_secs;

                let client = OpenWeatherMapClient::new(client_config)
                    .map_err(|e| ApplicationError::Internal(e.to_string()))?;
                Ok(Self::new(client))
            },
        }
    }

    /// Short name of the wrapped provider
    pub fn provider(&self) -> &'static str {
        self.client.provider()
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::Network(e),
            WeatherError::RateLimitExceeded => {
                ApplicationError::Network("weather rate limit exceeded".into())
            },
            WeatherError::ParseError(e) => ApplicationError::InvalidResponse(e),
            WeatherError::InvalidCoordinates => {
                ApplicationError::Validation("Invalid coordinates".into())
            },
            WeatherError::Unauthorized => {
                ApplicationError::Configuration("weather API key was rejected".into())
            },
        }
    }

    fn map_reading(reading: Reading) -> RawWeatherSample {
        RawWeatherSample {
            timestamp: reading.time,
            temperature: reading.temperature,
            feels_like: reading.apparent_temperature,
            humidity: reading.humidity,
            pressure: reading.pressure,
            wind_speed: reading.wind_speed,
            condition_code: reading.condition_code,
            condition_text: reading.description,
            icon_ref: reading.icon,
        }
    }

    fn map_forecast(forecast: Forecast) -> WeatherSeries {
        WeatherSeries {
            current: forecast.current.map(Self::map_reading),
            samples: forecast
                .readings
                .into_iter()
                .map(Self::map_reading)
                .collect(),
            utc_offset_seconds: forecast.utc_offset_seconds,
        }
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    #[instrument(
        skip(self),
        fields(provider = self.client.provider(), lat = location.latitude(), lon = location.longitude())
    )]
    async fn fetch_series(
        &self,
        location: &GeoLocation,
        days: u8,
    ) -> Result<WeatherSeries, ApplicationError> {
        let result = self
            .client
            .get_forecast(location.latitude(), location.longitude(), days)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(forecast) => {
                debug!(
                    samples = forecast.readings.len(),
                    has_current = forecast.current.is_some(),
                    "Retrieved weather series"
                );
            },
            Err(e) => {
                debug!(error = %e, "Failed to get weather series");
            },
        }

        result.map(Self::map_forecast)
    }
}
