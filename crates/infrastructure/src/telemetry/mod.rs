//! Tracing subscriber setup
//!
//! Console logging through `tracing-subscriber` with an `EnvFilter`. `RUST_LOG`
//! takes precedence over the configured filter.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter (e.g., "info", "skydeck=debug,reqwest=warn")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Output format
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            log_format: LogFormat::default(),
        }
    }
}

impl TelemetryConfig {
    /// Raise the filter for `-v` flags; zero keeps the configured filter
    #[must_use]
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        if let Some(level) = level_from_verbosity(verbose) {
            self.log_filter = level.to_string();
        }
        self
    }
}

/// Filter level for a `-v` count
const fn level_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// A global subscriber is already installed
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Install the global tracing subscriber
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.log_filter)?,
    };

    let (text_layer, json_layer) = match config.log_format {
        LogFormat::Text => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    debug!(filter = %config.log_filter, format = ?config.log_format, "Tracing initialized");
    Ok(())
}

fn build_filter(filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn verbosity_raises_filter() {
        assert_eq!(TelemetryConfig::default().with_verbosity(0).log_filter, "warn");
        assert_eq!(TelemetryConfig::default().with_verbosity(1).log_filter, "info");
        assert_eq!(TelemetryConfig::default().with_verbosity(2).log_filter, "debug");
        assert_eq!(TelemetryConfig::default().with_verbosity(7).log_filter, "trace");
    }

    #[test]
    fn format_deserializes_lowercase() {
        let config: TelemetryConfig = serde_json::from_str(r#"{"log_format": "json"}"#).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn invalid_filter_is_reported() {
        let result = build_filter("skydeck=notalevel");
        assert!(matches!(result, Err(TelemetryError::InvalidFilter { .. })));
    }

    #[test]
    fn valid_filter_builds() {
        assert!(build_filter("info,reqwest=warn").is_ok());
    }
}
