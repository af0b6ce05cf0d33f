//! Domain entities - Objects with identity and lifecycle, plus derived weather records

mod daily_summary;
mod location;
mod weather_sample;
mod weather_view;

pub use daily_summary::DailySummary;
pub use location::Location;
pub use weather_sample::{RawWeatherSample, WeatherSeries};
pub use weather_view::LocationWeatherView;
