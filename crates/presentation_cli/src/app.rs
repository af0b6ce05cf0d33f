//! Wiring of adapters and services from configuration

use std::sync::Arc;

use application::{
    ApplicationError, DashboardService, GeoResolver, KeyValueStore, LocationStore,
    SuggestionEngine, WeatherOrchestrator,
};
use domain::GeoLocation;
use infrastructure::{
    AppConfig, BoundedGeolocation, FixedPositionAdapter, GeocodingAdapter, JsonFileStore,
    WeatherAdapter,
};
use tracing::debug;

/// Services behind the command-line surface
#[derive(Debug)]
pub struct App {
    /// Tracked locations and weather
    pub dashboard: DashboardService,
    /// Debounced place suggestions
    pub suggestions: SuggestionEngine,
}

impl App {
    /// Build every adapter and service from `config`
    ///
    /// `position` overrides `dashboard.default_position` as the device position.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the data directory
    /// cannot be created or an HTTP client fails to initialize.
    pub fn build(config: &AppConfig, position: Option<GeoLocation>) -> Result<Self, ApplicationError> {
        config.validate()?;

        let storage: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::open(&config.storage.data_dir)?);
        Self::with_storage(config, position, storage)
    }

    /// Build with an explicit key-value store
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to initialize.
    pub fn with_storage(
        config: &AppConfig,
        position: Option<GeoLocation>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApplicationError> {
        let geocoding = Arc::new(GeocodingAdapter::with_config(
            config.geocoding.client_config(),
        )?);
        let weather = Arc::new(WeatherAdapter::from_config(&config.weather)?);

        let resolver = Arc::new(
            GeoResolver::new(geocoding)
                .with_fallback_name(config.dashboard.fallback_place_name.clone()),
        );

        let orchestrator = Arc::new(
            WeatherOrchestrator::new(weather, resolver.clone(), storage.clone())
                .with_forecast_days(config.weather.forecast_days),
        );
        let restored = orchestrator.load_snapshot();

        let position = position.or_else(|| {
            config
                .dashboard
                .default_position
                .and_then(|p| p.to_geo_location())
        });
        let geolocation = Arc::new(BoundedGeolocation::with_timeout(
            Arc::new(FixedPositionAdapter::from_option(position)),
            config.dashboard.geolocation_timeout(),
        ));

        let store = LocationStore::load(storage, config.dashboard.location_store_config());
        debug!(
            locations = store.len(),
            cached_views = restored,
            "Dashboard state restored"
        );

        let suggestions = SuggestionEngine::new(resolver.clone())
            .with_quiet_window(config.dashboard.debounce())
            .with_max_suggestions(config.geocoding.max_suggestions);

        Ok(Self {
            dashboard: DashboardService::new(resolver, geolocation, orchestrator, store),
            suggestions,
        })
    }
}
