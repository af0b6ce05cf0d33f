//! Per-location weather view model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DailySummary, Location, RawWeatherSample};

/// Everything the dashboard shows for one tracked location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWeatherView {
    /// The location this view belongs to
    pub location: Location,
    /// Reading rendered as "now" conditions
    pub current: RawWeatherSample,
    /// Daily summaries, today first
    pub forecast: Vec<DailySummary>,
    /// When the underlying data was fetched
    pub fetched_at: DateTime<Utc>,
    /// Location's UTC offset reported with the data, if any
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
}

impl LocationWeatherView {
    /// Current temperature rounded for display
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn current_temperature(&self) -> i32 {
        self.current.temperature.round() as i32
    }
}
