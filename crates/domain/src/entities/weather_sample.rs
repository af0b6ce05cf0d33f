//! Weather samples - Provider-independent timestamped readings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped weather reading
///
/// Providers deliver these at sub-daily granularity (hourly or 3-hourly).
/// Units are whatever the provider was asked for (metric by default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeatherSample {
    /// Time of the reading
    pub timestamp: DateTime<Utc>,
    /// Air temperature
    pub temperature: f64,
    /// Apparent (feels like) temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    /// Relative humidity percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<u8>,
    /// Surface pressure in hPa
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    /// Wind speed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    /// Provider condition code (WMO code or OpenWeatherMap condition id)
    pub condition_code: i32,
    /// Human-readable condition description
    pub condition_text: String,
    /// Provider icon reference
    pub icon_ref: String,
}

impl RawWeatherSample {
    /// Create a sample with the mandatory fields only
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        temperature: f64,
        condition_code: i32,
        condition_text: impl Into<String>,
        icon_ref: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            temperature,
            feels_like: None,
            humidity: None,
            pressure: None,
            wind_speed: None,
            condition_code,
            condition_text: condition_text.into(),
            icon_ref: icon_ref.into(),
        }
    }
}

/// A provider response normalized into samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSeries {
    /// Dedicated "now" reading, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<RawWeatherSample>,
    /// Forecast timeseries in ascending time order
    pub samples: Vec<RawWeatherSample>,
    /// UTC offset of the location's local time, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_seconds: Option<i32>,
}

impl WeatherSeries {
    /// The reading to show as current conditions
    ///
    /// Prefers the provider's current block and falls back to the first sample.
    #[must_use]
    pub fn now(&self) -> Option<&RawWeatherSample> {
        self.current.as_ref().or_else(|| self.samples.first())
    }

    /// Whether the series carries no readings at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.samples.is_empty()
    }
}
