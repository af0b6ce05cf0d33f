//! Weather orchestrator
//!
//! Fetches weather for every tracked location concurrently, keeps the last
//! good view per location and reports a per-location outcome. One failing
//! location never blanks the others.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use domain::{GeoLocation, Location, LocationId, LocationWeatherView};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::forecast_aggregator::{DayFrame, ForecastAggregator, relabel};
use super::geo_resolver::GeoResolver;
use super::location_store::LocationStore;
use crate::error::ApplicationError;
use crate::ports::{KeyValueStore, WEATHER_SNAPSHOT_KEY, WeatherPort};

/// Default number of forecast days per location
pub const DEFAULT_FORECAST_DAYS: u8 = 3;

/// Last known view per tracked location
///
/// Replaced as a whole after each refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherSnapshot {
    views: Vec<LocationWeatherView>,
}

impl WeatherSnapshot {
    /// Snapshot holding the given views
    #[must_use]
    pub fn from_views(views: Vec<LocationWeatherView>) -> Self {
        Self { views }
    }

    /// View for a location, if one was ever fetched
    #[must_use]
    pub fn get(&self, id: &LocationId) -> Option<&LocationWeatherView> {
        self.views.iter().find(|v| v.location.id == *id)
    }

    /// All views in store order
    #[must_use]
    pub fn views(&self) -> &[LocationWeatherView] {
        &self.views
    }

    /// Number of cached views
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether no view is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// Result of refreshing one location
#[derive(Debug, Clone)]
pub enum LocationOutcome {
    /// New data was fetched
    Fresh(LocationWeatherView),
    /// The fetch failed; the previous view is still shown
    Stale {
        /// Last good view
        view: LocationWeatherView,
        /// Why the refresh failed
        error: ApplicationError,
    },
    /// The fetch failed and nothing was cached
    Unavailable {
        /// The location that could not be refreshed
        location: Location,
        /// Why the refresh failed
        error: ApplicationError,
    },
}

impl LocationOutcome {
    /// The location this outcome belongs to
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::Fresh(view) | Self::Stale { view, .. } => &view.location,
            Self::Unavailable { location, .. } => location,
        }
    }

    /// The view to render, fresh or stale
    #[must_use]
    pub const fn view(&self) -> Option<&LocationWeatherView> {
        match self {
            Self::Fresh(view) | Self::Stale { view, .. } => Some(view),
            Self::Unavailable { .. } => None,
        }
    }

    /// The fetch error, if the refresh failed
    #[must_use]
    pub const fn error(&self) -> Option<&ApplicationError> {
        match self {
            Self::Fresh(_) => None,
            Self::Stale { error, .. } | Self::Unavailable { error, .. } => Some(error),
        }
    }

    /// Whether new data was fetched
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

/// Overall result of a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    /// Nothing is tracked; no request was made
    Empty,
    /// Every location was refreshed
    Complete,
    /// Some locations were refreshed
    Partial,
    /// Every fetch failed but cached views are shown
    StaleOnly,
    /// Every fetch failed and nothing is cached
    Failed,
}

impl RefreshStatus {
    fn from_outcomes(outcomes: &[LocationOutcome]) -> Self {
        if outcomes.is_empty() {
            return Self::Empty;
        }
        let fresh = outcomes.iter().filter(|o| o.is_fresh()).count();
        let stale = outcomes
            .iter()
            .filter(|o| matches!(o, LocationOutcome::Stale { .. }))
            .count();

        if fresh == outcomes.len() {
            Self::Complete
        } else if fresh > 0 {
            Self::Partial
        } else if stale > 0 {
            Self::StaleOnly
        } else {
            Self::Failed
        }
    }
}

/// Per-location outcomes of one refresh, in store order
#[derive(Debug, Clone)]
pub struct RefreshReport {
    /// Overall status
    pub status: RefreshStatus,
    /// One outcome per tracked location
    pub outcomes: Vec<LocationOutcome>,
    /// When the refresh finished
    pub finished_at: DateTime<Utc>,
}

impl RefreshReport {
    fn new(outcomes: Vec<LocationOutcome>) -> Self {
        Self {
            status: RefreshStatus::from_outcomes(&outcomes),
            outcomes,
            finished_at: Utc::now(),
        }
    }

    /// Whether the whole page should show an error
    #[must_use]
    pub fn is_page_error(&self) -> bool {
        self.status == RefreshStatus::Failed
    }
}

/// A freshly fetched view
#[derive(Debug, Clone)]
pub struct FetchedView {
    /// The packaged view
    pub view: LocationWeatherView,
    /// Coordinates resolved on the fly for a location that had none
    pub resolved_coordinates: Option<GeoLocation>,
}

/// Coordinates concurrent weather fetches across tracked locations
pub struct WeatherOrchestrator {
    weather: Arc<dyn WeatherPort>,
    resolver: Arc<GeoResolver>,
    storage: Arc<dyn KeyValueStore>,
    forecast_days: u8,
    snapshot: ArcSwap<WeatherSnapshot>,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for WeatherOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherOrchestrator")
            .field("forecast_days", &self.forecast_days)
            .field("cached_views", &self.snapshot.load().len())
            .finish_non_exhaustive()
    }
}

impl WeatherOrchestrator {
    /// Create an orchestrator with an empty snapshot
    pub fn new(
        weather: Arc<dyn WeatherPort>,
        resolver: Arc<GeoResolver>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            weather,
            resolver,
            storage,
            forecast_days: DEFAULT_FORECAST_DAYS,
            snapshot: ArcSwap::from_pointee(WeatherSnapshot::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Set the number of forecast days per location
    #[must_use]
    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days;
        self
    }

    /// Number of forecast days per location
    #[must_use]
    pub const fn forecast_days(&self) -> u8 {
        self.forecast_days
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<WeatherSnapshot> {
        self.snapshot.load_full()
    }

    /// Whether a full refresh is running
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refresh_lock.try_lock().is_err()
    }

    /// Restore the offline snapshot from storage
    ///
    /// Missing or malformed data leaves the snapshot empty. Returns the number
    /// of restored views.
    pub fn load_snapshot(&self) -> usize {
        self.load_snapshot_at(Utc::now())
    }

    /// Restore the offline snapshot, relabelling days relative to `now`
    #[instrument(skip(self))]
    pub fn load_snapshot_at(&self, now: DateTime<Utc>) -> usize {
        let mut restored = match self.storage.get(WEATHER_SNAPSHOT_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<WeatherSnapshot>(&raw) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(error = %e, "Discarding malformed weather snapshot");
                    WeatherSnapshot::default()
                },
            },
            Ok(None) => WeatherSnapshot::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read weather snapshot");
                WeatherSnapshot::default()
            },
        };

        for view in &mut restored.views {
            let today = DayFrame::from_offset_seconds(view.utc_offset_seconds).date_of(now);
            relabel(&mut view.forecast, today);
        }

        let count = restored.len();
        self.snapshot.store(Arc::new(restored));
        debug!(count, "Weather snapshot restored");
        count
    }

    /// Fetch and package the view for one location
    ///
    /// Locations without coordinates are geocoded by canonical name first.
    ///
    /// # Errors
    ///
    /// Geocoding and weather errors propagate; a response without any
    /// reading is `InvalidResponse`.
    #[instrument(skip(self, location), fields(location = %location.display_name))]
    pub async fn fetch_one(&self, location: &Location) -> Result<FetchedView, ApplicationError> {
        let (coordinates, resolved_coordinates) = match location.coordinates {
            Some(coordinates) => (coordinates, None),
            None => {
                let place = self.resolver.resolve_first(&location.canonical_name).await?;
                let coordinates = place.coordinates();
                (coordinates, Some(coordinates))
            },
        };

        let series = self
            .weather
            .fetch_series(&coordinates, self.forecast_days)
            .await?;

        let current = series.now().cloned().ok_or_else(|| {
            ApplicationError::InvalidResponse("provider returned no readings".into())
        })?;
        let aggregator = ForecastAggregator::for_series(&series);
        let forecast = aggregator.aggregate(
            &series.samples,
            usize::from(self.forecast_days),
            aggregator.today(Utc::now()),
        );

        let mut location = location.clone();
        if let Some(coordinates) = resolved_coordinates {
            location = location.with_coordinates(coordinates);
        }

        Ok(FetchedView {
            view: LocationWeatherView {
                location,
                current,
                forecast,
                fetched_at: Utc::now(),
                utc_offset_seconds: series.utc_offset_seconds,
            },
            resolved_coordinates,
        })
    }

    /// Refresh every tracked location
    ///
    /// Fetches run concurrently and are all joined before the report is
    /// built. Views of locations no longer tracked are dropped.
    ///
    /// # Errors
    ///
    /// `RefreshInProgress` when another refresh is running. Per-location
    /// failures are reported in the outcomes, never as an error.
    #[instrument(skip_all, fields(locations = store.len()))]
    pub async fn refresh_all(
        &self,
        store: &mut LocationStore,
    ) -> Result<RefreshReport, ApplicationError> {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            return Err(ApplicationError::RefreshInProgress);
        };

        let locations = store.snapshot();
        if locations.is_empty() {
            debug!("Nothing to refresh");
            if !self.snapshot.load().is_empty() {
                self.replace_snapshot(WeatherSnapshot::default());
            }
            return Ok(RefreshReport::new(Vec::new()));
        }

        let previous = self.snapshot.load_full();
        let results = join_all(locations.as_slice().iter().map(|l| self.fetch_one(l))).await;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut views = Vec::with_capacity(results.len());
        for (location, result) in locations.as_slice().iter().zip(results) {
            match result {
                Ok(fetched) => {
                    if let Some(coordinates) = fetched.resolved_coordinates {
                        if let Err(e) = store.backfill_coordinates(&location.id, coordinates) {
                            warn!(error = %e, "Could not store resolved coordinates");
                        }
                    }
                    views.push(fetched.view.clone());
                    outcomes.push(LocationOutcome::Fresh(fetched.view));
                },
                Err(error) => {
                    warn!(location = %location.display_name, error = %error, "Weather fetch failed");
                    match previous.get(&location.id) {
                        Some(cached) => {
                            let view = LocationWeatherView {
                                location: location.clone(),
                                ..cached.clone()
                            };
                            views.push(view.clone());
                            outcomes.push(LocationOutcome::Stale { view, error });
                        },
                        None => outcomes.push(LocationOutcome::Unavailable {
                            location: location.clone(),
                            error,
                        }),
                    }
                },
            }
        }

        self.replace_snapshot(WeatherSnapshot::from_views(views));

        let report = RefreshReport::new(outcomes);
        info!(status = ?report.status, "Refresh finished");
        Ok(report)
    }

    fn replace_snapshot(&self, snapshot: WeatherSnapshot) {
        let result = serde_json::to_string(&snapshot)
            .map_err(|e| ApplicationError::Internal(e.to_string()))
            .and_then(|json| self.storage.set(WEATHER_SNAPSHOT_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist weather snapshot");
        }
        self.snapshot.store(Arc::new(snapshot));
    }
}
