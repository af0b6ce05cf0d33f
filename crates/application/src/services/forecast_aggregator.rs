//! Forecast aggregator
//!
//! Buckets a sub-daily timeseries into calendar days and derives one
//! [`DailySummary`] per day. Pure: no I/O, no clock; the caller supplies
//! the reference date that day labels are relative to.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};
use domain::{DailySummary, RawWeatherSample, WeatherSeries};

/// Frame in which sample timestamps are assigned to calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFrame {
    /// Bucket by UTC date
    #[default]
    Utc,
    /// Bucket by the location's local date
    FixedOffset(FixedOffset),
}

impl DayFrame {
    /// Frame for a provider-reported UTC offset, UTC when absent or out of range
    #[must_use]
    pub fn from_offset_seconds(offset_seconds: Option<i32>) -> Self {
        offset_seconds
            .and_then(FixedOffset::east_opt)
            .map_or(Self::Utc, Self::FixedOffset)
    }

    /// Calendar date of `timestamp` in this frame
    #[must_use]
    pub fn date_of(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Utc => timestamp.date_naive(),
            Self::FixedOffset(offset) => timestamp.with_timezone(offset).date_naive(),
        }
    }
}

/// Groups samples into daily summaries
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastAggregator {
    frame: DayFrame,
}

impl ForecastAggregator {
    /// Create an aggregator bucketing in the given frame
    #[must_use]
    pub const fn new(frame: DayFrame) -> Self {
        Self { frame }
    }

    /// Aggregator matching the frame a provider response reports
    #[must_use]
    pub fn for_series(series: &WeatherSeries) -> Self {
        Self::new(DayFrame::from_offset_seconds(series.utc_offset_seconds))
    }

    /// The bucketing frame
    #[must_use]
    pub const fn frame(&self) -> DayFrame {
        self.frame
    }

    /// Date of `now` in the bucketing frame, used as the labels' reference
    #[must_use]
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.frame.date_of(now)
    }

    /// Aggregate `samples` into at most `day_count` daily summaries
    ///
    /// Returns exactly `min(day_count, distinct days)` entries in ascending
    /// date order. Days are never padded or repeated. Labels are relative to
    /// `today`.
    #[must_use]
    pub fn aggregate(
        &self,
        samples: &[RawWeatherSample],
        day_count: usize,
        today: NaiveDate,
    ) -> Vec<DailySummary> {
        if samples.is_empty() || day_count == 0 {
            return Vec::new();
        }

        let mut buckets: BTreeMap<NaiveDate, Vec<&RawWeatherSample>> = BTreeMap::new();
        for sample in samples {
            buckets
                .entry(self.frame.date_of(sample.timestamp))
                .or_default()
                .push(sample);
        }

        buckets
            .into_iter()
            .take(day_count)
            .map(|(date, day)| summarize(date, &day, today))
            .collect()
    }
}

fn summarize(date: NaiveDate, day: &[&RawWeatherSample], today: NaiveDate) -> DailySummary {
    let condition = mode(day.iter().map(|s| s.condition_text.as_str()));
    let icon = day
        .iter()
        .find(|s| s.condition_text == condition)
        .map(|s| s.icon_ref.clone())
        .unwrap_or_default();

    DailySummary {
        day_label: day_label(date, today),
        date,
        mean_temperature: mean_rounded(day.iter().map(|s| s.temperature)),
        representative_condition: condition.to_string(),
        representative_icon: icon,
        sample_count: day.len(),
    }
}

/// Arithmetic mean rounded half away from zero
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn mean_rounded(values: impl Iterator<Item = f64>) -> i32 {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        return 0;
    }
    (sum / count as f64).round() as i32
}

/// Most frequent value; on ties the value that first reached the top count wins
fn mode<'a>(values: impl Iterator<Item = &'a str>) -> &'a str {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut best = "";
    let mut best_count = 0;
    for value in values {
        let count = counts.entry(value).or_insert(0);
        *count += 1;
        if *count > best_count {
            best_count = *count;
            best = value;
        }
    }
    best
}

/// "Today" or "Tomorrow" relative to `today`, the weekday name otherwise
#[must_use]
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => weekday_name(date.weekday()).to_string(),
    }
}

/// Recompute the labels of already aggregated days against `today`
pub fn relabel(days: &mut [DailySummary], today: NaiveDate) {
    for day in days {
        day.day_label = day_label(day.date, today);
    }
}

const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
