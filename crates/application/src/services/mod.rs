//! Application services

mod dashboard_service;
mod forecast_aggregator;
mod geo_resolver;
mod location_store;
mod suggestion_engine;
mod weather_orchestrator;

pub use dashboard_service::DashboardService;
pub use forecast_aggregator::{DayFrame, ForecastAggregator, day_label, relabel};
pub use geo_resolver::{DEFAULT_FALLBACK_PLACE_NAME, GeoResolver};
pub use location_store::{DEFAULT_MAX_LOCATIONS, LocationList, LocationStore, LocationStoreConfig};
pub use suggestion_engine::{
    DEFAULT_DEBOUNCE, DEFAULT_MAX_SUGGESTIONS, DebounceState, DebounceToken, LookupRequest,
    SuggestionEngine,
};
pub use weather_orchestrator::{
    DEFAULT_FORECAST_DAYS, FetchedView, LocationOutcome, RefreshReport, RefreshStatus,
    WeatherOrchestrator, WeatherSnapshot,
};
