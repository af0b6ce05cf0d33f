//! Dashboard service
//!
//! The user-facing actions of the dashboard: adding cities by name or from
//! a picked suggestion, adding the device position, removing locations and
//! refreshing weather.

use std::sync::Arc;

use domain::{Location, LocationId, PlaceCandidate};
use tracing::{info, instrument};

use super::geo_resolver::GeoResolver;
use super::location_store::LocationStore;
use super::weather_orchestrator::{RefreshReport, WeatherOrchestrator, WeatherSnapshot};
use crate::error::ApplicationError;
use crate::ports::GeolocationPort;

/// Dashboard use cases over the tracked-location store
pub struct DashboardService {
    resolver: Arc<GeoResolver>,
    geolocation: Arc<dyn GeolocationPort>,
    orchestrator: Arc<WeatherOrchestrator>,
    store: LocationStore,
}

impl std::fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService")
            .field("resolver", &self.resolver)
            .field("orchestrator", &self.orchestrator)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl DashboardService {
    /// Wire the service from its collaborators
    pub fn new(
        resolver: Arc<GeoResolver>,
        geolocation: Arc<dyn GeolocationPort>,
        orchestrator: Arc<WeatherOrchestrator>,
        store: LocationStore,
    ) -> Self {
        Self {
            resolver,
            geolocation,
            orchestrator,
            store,
        }
    }

    /// Geocode `name` and track the best match
    ///
    /// # Errors
    ///
    /// `Validation`, `NotFound` or `Network` from geocoding, then
    /// `DuplicateLocation` or `CapacityExceeded` from the store.
    #[instrument(skip(self))]
    pub async fn add_location_by_name(&mut self, name: &str) -> Result<Location, ApplicationError> {
        let candidate = self.resolver.resolve_first(name).await?;
        self.store.add(&candidate)
    }

    /// Track a candidate the user picked from the suggestions
    ///
    /// # Errors
    ///
    /// `DuplicateLocation` or `CapacityExceeded`.
    pub fn add_selection(&mut self, candidate: &PlaceCandidate) -> Result<Location, ApplicationError> {
        self.store.add(candidate)
    }

    /// Track the device position
    ///
    /// Reverse geocoding failures fall back to a placeholder name; only
    /// position failures and a full store are errors.
    ///
    /// # Errors
    ///
    /// `PermissionDenied`, `Timeout` or `PositionUnavailable` from the
    /// device, `CapacityExceeded` from the store.
    #[instrument(skip(self))]
    pub async fn add_current_location(&mut self) -> Result<Location, ApplicationError> {
        let coordinates = self.geolocation.current_position().await?;
        let name = self.resolver.resolve_current_position(&coordinates).await;
        let location = self.store.set_current_position(&name, coordinates)?;
        info!(display_name = %location.display_name, "Current position tracked");
        Ok(location)
    }

    /// Stop tracking a location
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn remove_location(&mut self, id: &LocationId) -> Result<Location, ApplicationError> {
        self.store.remove(id)
    }

    /// Refresh weather for every tracked location
    ///
    /// # Errors
    ///
    /// `RefreshInProgress` when a refresh is already running.
    pub async fn refresh(&mut self) -> Result<RefreshReport, ApplicationError> {
        self.orchestrator.refresh_all(&mut self.store).await
    }

    /// Tracked locations in display order
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        self.store.list()
    }

    /// Last known weather per location
    #[must_use]
    pub fn weather(&self) -> Arc<WeatherSnapshot> {
        self.orchestrator.snapshot()
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &LocationStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UserOutcome;
    use crate::ports::{MockGeocodingPort, MockGeolocationPort, MockWeatherPort};
    use crate::services::location_store::LocationStoreConfig;
    use crate::services::weather_orchestrator::RefreshStatus;
    use crate::test_support::MemoryKv;
    use chrono::Utc;
    use domain::{GeoLocation, RawWeatherSample, WeatherSeries};

    fn kazan() -> PlaceCandidate {
        PlaceCandidate::new("Kazan", 55.7887, 49.1221)
            .with_admin_region("Tatarstan")
            .with_country("Russia")
    }

    fn service(
        geocoding: MockGeocodingPort,
        geolocation: MockGeolocationPort,
        weather: MockWeatherPort,
    ) -> DashboardService {
        let kv = Arc::new(MemoryKv::default());
        let resolver = Arc::new(GeoResolver::new(Arc::new(geocoding)));
        let orchestrator = Arc::new(WeatherOrchestrator::new(
            Arc::new(weather),
            resolver.clone(),
            kv.clone(),
        ));
        let store = LocationStore::new(kv, LocationStoreConfig::default());
        DashboardService::new(resolver, Arc::new(geolocation), orchestrator, store)
    }

    #[tokio::test]
    async fn add_by_name_tracks_best_match() {
        let mut geocoding = MockGeocodingPort::new();
        geocoding
            .expect_search()
            .returning(|_, _| Ok(vec![kazan()]));
        let mut svc = service(geocoding, MockGeolocationPort::new(), MockWeatherPort::new());

        let location = svc.add_location_by_name("kazan").await.unwrap();
        assert_eq!(location.display_name, "Kazan, Tatarstan, Russia");
        assert_eq!(svc.locations().len(), 1);
    }

    #[tokio::test]
    async fn add_by_name_reports_not_found() {
        let mut geocoding = MockGeocodingPort::new();
        geocoding.expect_search().returning(|_, _| Ok(vec![]));
        let mut svc = service(geocoding, MockGeolocationPort::new(), MockWeatherPort::new());

        let err = svc.add_location_by_name("Atlantis").await.unwrap_err();
        assert_eq!(err.outcome(), UserOutcome::NotFound);
        assert!(svc.locations().is_empty());
    }

    #[tokio::test]
    async fn adding_twice_reports_duplicate() {
        let mut svc = service(
            MockGeocodingPort::new(),
            MockGeolocationPort::new(),
            MockWeatherPort::new(),
        );
        svc.add_selection(&kazan()).unwrap();

        let err = svc.add_selection(&kazan()).unwrap_err();
        assert_eq!(err.outcome(), UserOutcome::Duplicate);
    }

    #[tokio::test]
    async fn current_location_uses_reverse_geocoded_name() {
        let mut geolocation = MockGeolocationPort::new();
        geolocation
            .expect_current_position()
            .returning(|| Ok(GeoLocation::new_unchecked(55.79, 49.12)));
        let mut geocoding = MockGeocodingPort::new();
        geocoding.expect_reverse().returning(|_| Ok(Some(kazan())));
        let mut svc = service(geocoding, geolocation, MockWeatherPort::new());

        let location = svc.add_current_location().await.unwrap();
        assert!(location.is_current_position);
        assert_eq!(location.display_name, "Kazan, Tatarstan, Russia");
    }

    #[tokio::test]
    async fn current_location_survives_reverse_lookup_failure() {
        let mut geolocation = MockGeolocationPort::new();
        geolocation
            .expect_current_position()
            .returning(|| Ok(GeoLocation::new_unchecked(55.79, 49.12)));
        let mut geocoding = MockGeocodingPort::new();
        geocoding
            .expect_reverse()
            .returning(|_| Err(ApplicationError::Network("HTTP 502".into())));
        let mut svc = service(geocoding, geolocation, MockWeatherPort::new());

        let location = svc.add_current_location().await.unwrap();
        assert_eq!(location.display_name, "Your location");
    }

    #[tokio::test]
    async fn permission_denied_adds_nothing() {
        let mut geolocation = MockGeolocationPort::new();
        geolocation
            .expect_current_position()
            .returning(|| Err(ApplicationError::PermissionDenied));
        let mut svc = service(MockGeocodingPort::new(), geolocation, MockWeatherPort::new());

        let err = svc.add_current_location().await.unwrap_err();
        assert_eq!(err.outcome(), UserOutcome::LocationUnavailable);
        assert!(svc.locations().is_empty());
    }

    #[tokio::test]
    async fn refresh_builds_views_for_tracked_locations() {
        let mut weather = MockWeatherPort::new();
        weather.expect_fetch_series().returning(|_, _| {
            let now = Utc::now();
            Ok(WeatherSeries {
                current: None,
                samples: vec![RawWeatherSample::new(now, 21.4, 800, "clear sky", "01d")],
                utc_offset_seconds: None,
            })
        });
        let mut svc = service(MockGeocodingPort::new(), MockGeolocationPort::new(), weather);
        svc.add_selection(&kazan()).unwrap();

        let report = svc.refresh().await.unwrap();
        assert_eq!(report.status, RefreshStatus::Complete);
        assert_eq!(svc.weather().len(), 1);
        assert_eq!(svc.weather().views()[0].current_temperature(), 21);
    }

    #[tokio::test]
    async fn remove_unknown_reports_not_found() {
        let mut svc = service(
            MockGeocodingPort::new(),
            MockGeolocationPort::new(),
            MockWeatherPort::new(),
        );
        let err = svc.remove_location(&LocationId::new()).unwrap_err();
        assert_eq!(err.outcome(), UserOutcome::NotFound);
    }
}
