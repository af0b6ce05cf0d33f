//! Daily summary - One day's weather derived from finer-grained samples

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregated weather for one calendar day
///
/// Recomputed on every fetch; never persisted independently of its view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Relative or weekday label ("Today", "Tomorrow", "Friday")
    pub day_label: String,
    /// Calendar date of the bucket
    pub date: NaiveDate,
    /// Mean temperature rounded half away from zero
    pub mean_temperature: i32,
    /// Most frequent condition description of the day
    pub representative_condition: String,
    /// Icon of the first sample carrying the representative condition
    pub representative_icon: String,
    /// Number of samples that fell into the day
    pub sample_count: usize,
}

impl DailySummary {
    /// Short text for logs and terminal output
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} ({}): {}°, {}",
            self.day_label,
            self.date.format("%d %b"),
            self.mean_temperature,
            self.representative_condition
        )
    }
}
