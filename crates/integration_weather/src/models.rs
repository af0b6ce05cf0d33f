//! Weather data models
//!
//! Provider-neutral readings plus the wire formats of the supported APIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition derived from WMO weather codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    /// Clear sky (WMO 0)
    ClearSky,
    /// Mainly clear (WMO 1)
    MainlyClear,
    /// Partly cloudy (WMO 2)
    PartlyCloudy,
    /// Overcast (WMO 3)
    Overcast,
    /// Fog (WMO 45, 48)
    Fog,
    /// Drizzle (WMO 51, 53, 55)
    Drizzle,
    /// Freezing drizzle (WMO 56, 57)
    FreezingDrizzle,
    /// Rain (WMO 61, 63, 65)
    Rain,
    /// Freezing rain (WMO 66, 67)
    FreezingRain,
    /// Snow (WMO 71, 73, 75)
    Snow,
    /// Snow grains (WMO 77)
    SnowGrains,
    /// Rain showers (WMO 80, 81, 82)
    RainShowers,
    /// Snow showers (WMO 85, 86)
    SnowShowers,
    /// Thunderstorm (WMO 95)
    Thunderstorm,
    /// Thunderstorm with hail (WMO 96, 99)
    ThunderstormWithHail,
    /// Unknown condition
    Unknown,
}

impl WeatherCondition {
    /// Convert WMO weather code to `WeatherCondition`
    ///
    /// See: <https://open-meteo.com/en/docs> for WMO code reference
    #[must_use]
    pub const fn from_wmo_code(code: u8) -> Self {
        match code {
            0 => Self::ClearSky,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::FreezingDrizzle,
            61 | 63 | 65 => Self::Rain,
            66 | 67 => Self::FreezingRain,
            71 | 73 | 75 => Self::Snow,
            77 => Self::SnowGrains,
            80..=82 => Self::RainShowers,
            85 | 86 => Self::SnowShowers,
            95 => Self::Thunderstorm,
            96 | 99 => Self::ThunderstormWithHail,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description of the weather condition
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ClearSky => "Clear sky",
            Self::MainlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::FreezingDrizzle => "Freezing drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing rain",
            Self::Snow => "Snow",
            Self::SnowGrains => "Snow grains",
            Self::RainShowers => "Rain showers",
            Self::SnowShowers => "Snow showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::ThunderstormWithHail => "Thunderstorm with hail",
            Self::Unknown => "Unknown",
        }
    }

    /// Icon reference in the OpenWeatherMap naming scheme ("01d", "10n")
    ///
    /// Lets both providers share one icon set.
    #[must_use]
    pub fn icon(&self, is_day: bool) -> String {
        let base = match self {
            Self::ClearSky => "01",
            Self::MainlyClear => "02",
            Self::PartlyCloudy | Self::Unknown => "03",
            Self::Overcast => "04",
            Self::Drizzle | Self::FreezingDrizzle | Self::RainShowers => "09",
            Self::Rain | Self::FreezingRain => "10",
            Self::Thunderstorm | Self::ThunderstormWithHail => "11",
            Self::Snow | Self::SnowGrains | Self::SnowShowers => "13",
            Self::Fog => "50",
        };
        format!("{base}{}", if is_day { 'd' } else { 'n' })
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// One timestamped reading, normalized across providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Time of the reading
    pub time: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Apparent (feels like) temperature in Celsius
    pub apparent_temperature: Option<f64>,
    /// Relative humidity percentage (0-100)
    pub humidity: Option<u8>,
    /// Pressure in hPa
    pub pressure: Option<f64>,
    /// Wind speed
    pub wind_speed: Option<f64>,
    /// Provider condition code
    pub condition_code: i32,
    /// Condition description
    pub description: String,
    /// Icon reference
    pub icon: String,
}

/// Current conditions plus a sub-daily forecast
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Current conditions, if reported
    pub current: Option<Reading>,
    /// Forecast readings in ascending time order
    pub readings: Vec<Reading>,
    /// UTC offset of the location, if reported
    pub utc_offset_seconds: Option<i32>,
}

// ============================================================================
// Open-Meteo wire format
// ============================================================================

/// Open-Meteo forecast response (requested with `timeformat=unixtime`)
#[derive(Debug, Deserialize)]
pub(crate) struct OpenMeteoResponse {
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
    #[serde(default)]
    pub current: Option<OpenMeteoCurrent>,
    #[serde(default)]
    pub hourly: Option<OpenMeteoHourly>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenMeteoCurrent {
    pub time: i64,
    pub temperature_2m: f64,
    #[serde(default)]
    pub apparent_temperature: Option<f64>,
    #[serde(default)]
    pub relative_humidity_2m: Option<u8>,
    #[serde(default)]
    pub surface_pressure: Option<f64>,
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
    pub weather_code: u8,
    #[serde(default = "default_is_day")]
    pub is_day: u8,
}

const fn default_is_day() -> u8 {
    1
}

/// Column-oriented hourly block; missing values arrive as `null`
#[derive(Debug, Deserialize)]
pub(crate) struct OpenMeteoHourly {
    pub time: Vec<i64>,
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<u8>>,
    #[serde(default)]
    pub surface_pressure: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    pub weather_code: Vec<Option<u8>>,
    #[serde(default)]
    pub is_day: Vec<Option<u8>>,
}

// ============================================================================
// OpenWeatherMap wire format
// ============================================================================

/// `/weather` response
#[derive(Debug, Deserialize)]
pub(crate) struct OwmCurrentResponse {
    pub dt: i64,
    #[serde(default)]
    pub timezone: Option<i32>,
    pub main: OwmMain,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
    #[serde(default)]
    pub wind: Option<OwmWind>,
}

/// `/forecast` response
#[derive(Debug, Deserialize)]
pub(crate) struct OwmForecastResponse {
    #[serde(default)]
    pub list: Vec<OwmForecastItem>,
    #[serde(default)]
    pub city: Option<OwmCity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmForecastItem {
    pub dt: i64,
    pub main: OwmMain,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
    #[serde(default)]
    pub wind: Option<OwmWind>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmMain {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmCondition {
    pub id: i32,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmWind {
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwmCity {
    #[serde(default)]
    pub timezone: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wmo_code_mapping() {
        assert_eq!(WeatherCondition::from_wmo_code(0), WeatherCondition::ClearSky);
        assert_eq!(WeatherCondition::from_wmo_code(3), WeatherCondition::Overcast);
        assert_eq!(WeatherCondition::from_wmo_code(48), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_wmo_code(81), WeatherCondition::RainShowers);
        assert_eq!(
            WeatherCondition::from_wmo_code(99),
            WeatherCondition::ThunderstormWithHail
        );
        assert_eq!(WeatherCondition::from_wmo_code(42), WeatherCondition::Unknown);
    }

    #[test]
    fn test_icon_follows_day_and_night() {
        assert_eq!(WeatherCondition::ClearSky.icon(true), "01d");
        assert_eq!(WeatherCondition::ClearSky.icon(false), "01n");
        assert_eq!(WeatherCondition::Rain.icon(true), "10d");
        assert_eq!(WeatherCondition::Fog.icon(false), "50n");
    }

    #[test]
    fn test_display_uses_description() {
        assert_eq!(WeatherCondition::PartlyCloudy.to_string(), "Partly cloudy");
    }

    #[test]
    fn test_hourly_accepts_nulls() {
        let json = r#"{
            "time": [1714521600, 1714525200],
            "temperature_2m": [10.5, null],
            "weather_code": [1, null]
        }"#;
        let hourly: OpenMeteoHourly = serde_json::from_str(json).unwrap();
        assert_eq!(hourly.temperature_2m, vec![Some(10.5), None]);
        assert!(hourly.is_day.is_empty());
    }

    #[test]
    fn test_owm_item_without_wind() {
        let json = r#"{
            "dt": 1714521600,
            "main": {"temp": 4.2, "humidity": 81},
            "weather": [{"id": 500, "description": "light rain", "icon": "10n"}]
        }"#;
        let item: OwmForecastItem = serde_json::from_str(json).unwrap();
        assert!(item.wind.is_none());
        assert_eq!(item.main.humidity, Some(81));
    }
}
