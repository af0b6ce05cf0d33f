//! Location store
//!
//! Bounded, ordered collection of tracked locations: at most one
//! current-position slot (always first) followed by user-added cities in
//! insertion order. State transitions are pure functions on [`LocationList`];
//! [`LocationStore`] applies them and persists every change.

use std::sync::Arc;

use domain::{DEFAULT_COORDINATE_TOLERANCE, GeoLocation, Location, LocationId, PlaceCandidate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{KeyValueStore, LOCATIONS_KEY};

/// Default number of tracked locations, current slot included
pub const DEFAULT_MAX_LOCATIONS: usize = 3;

/// Limits applied when locations are added
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationStoreConfig {
    /// Maximum number of locations, current slot included
    pub max_locations: usize,
    /// Per-axis distance in degrees under which two points are the same place
    pub duplicate_tolerance: f64,
}

impl Default for LocationStoreConfig {
    fn default() -> Self {
        Self {
            max_locations: DEFAULT_MAX_LOCATIONS,
            duplicate_tolerance: DEFAULT_COORDINATE_TOLERANCE,
        }
    }
}

/// Immutable snapshot of the tracked locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationList {
    locations: Vec<Location>,
}

impl LocationList {
    /// Build a list from stored records, moving the current slot to the front
    ///
    /// Extra current-position records beyond the first are demoted.
    #[must_use]
    pub fn from_records(records: Vec<Location>) -> Self {
        let mut current = None;
        let mut named = Vec::with_capacity(records.len());
        for mut location in records {
            if location.is_current_position {
                if current.is_none() {
                    current = Some(location);
                    continue;
                }
                location.is_current_position = false;
            }
            named.push(location);
        }

        let locations = current.into_iter().chain(named).collect();
        Self { locations }
    }

    /// Locations in display order
    #[must_use]
    pub fn as_slice(&self) -> &[Location] {
        &self.locations
    }

    /// Number of tracked locations
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether nothing is tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Look up a location by id
    #[must_use]
    pub fn get(&self, id: &LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == *id)
    }

    /// The current-position record, if any
    #[must_use]
    pub fn current_position(&self) -> Option<&Location> {
        self.locations.iter().find(|l| l.is_current_position)
    }

    /// Find a tracked city that `candidate` would duplicate
    ///
    /// The current-position slot is never considered a duplicate.
    #[must_use]
    pub fn find_duplicate(&self, candidate: &PlaceCandidate, tolerance: f64) -> Option<&Location> {
        let point = candidate.coordinates();
        self.locations
            .iter()
            .filter(|l| !l.is_current_position)
            .find(|l| {
                l.has_name(&candidate.name)
                    || l.coordinates.is_some_and(|c| c.is_near(&point, tolerance))
            })
    }

    /// List with a new city appended
    ///
    /// # Errors
    ///
    /// `DuplicateLocation` when the candidate matches a tracked city by name
    /// or coordinates, then `CapacityExceeded` when the list is full.
    pub fn with_added(
        &self,
        candidate: &PlaceCandidate,
        config: &LocationStoreConfig,
    ) -> Result<(Self, Location), ApplicationError> {
        if let Some(existing) = self.find_duplicate(candidate, config.duplicate_tolerance) {
            return Err(ApplicationError::DuplicateLocation(
                existing.display_name.clone(),
            ));
        }
        if self.locations.len() >= config.max_locations {
            return Err(ApplicationError::CapacityExceeded {
                max: config.max_locations,
            });
        }

        let location = Location::from_candidate(candidate);
        let mut locations = self.locations.clone();
        locations.push(location.clone());
        Ok((Self { locations }, location))
    }

    /// List without the location `id`
    ///
    /// # Errors
    ///
    /// `NotFound` when no location has that id.
    pub fn without(&self, id: &LocationId) -> Result<(Self, Location), ApplicationError> {
        let index = self
            .locations
            .iter()
            .position(|l| l.id == *id)
            .ok_or_else(|| ApplicationError::NotFound(format!("location {id}")))?;

        let mut locations = self.locations.clone();
        let removed = locations.remove(index);
        Ok((Self { locations }, removed))
    }

    /// List with the current-position slot created or replaced
    ///
    /// An existing slot keeps its id and position; a new one goes first.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` when a new slot would not fit.
    pub fn with_current_position(
        &self,
        display_name: &str,
        coordinates: GeoLocation,
        max_locations: usize,
    ) -> Result<(Self, Location), ApplicationError> {
        let mut locations = self.locations.clone();

        if let Some(slot) = locations.iter_mut().find(|l| l.is_current_position) {
            let mut updated = Location::current_position(display_name, coordinates);
            updated.id = slot.id;
            *slot = updated.clone();
            return Ok((Self { locations }, updated));
        }

        if locations.len() >= max_locations {
            return Err(ApplicationError::CapacityExceeded { max: max_locations });
        }

        let location = Location::current_position(display_name, coordinates);
        locations.insert(0, location.clone());
        Ok((Self { locations }, location))
    }

    /// List with coordinates filled in for `id`
    ///
    /// # Errors
    ///
    /// `NotFound` when no location has that id.
    pub fn with_coordinates(
        &self,
        id: &LocationId,
        coordinates: GeoLocation,
    ) -> Result<Self, ApplicationError> {
        let mut locations = self.locations.clone();
        let location = locations
            .iter_mut()
            .find(|l| l.id == *id)
            .ok_or_else(|| ApplicationError::NotFound(format!("location {id}")))?;
        location.coordinates = Some(coordinates);
        Ok(Self { locations })
    }
}

/// Tracked locations backed by a key-value store
pub struct LocationStore {
    state: LocationList,
    config: LocationStoreConfig,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for LocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationStore")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LocationStore {
    /// Create an empty store
    pub fn new(storage: Arc<dyn KeyValueStore>, config: LocationStoreConfig) -> Self {
        Self {
            state: LocationList::default(),
            config,
            storage,
        }
    }

    /// Restore the store from persisted state
    ///
    /// Missing, unreadable or malformed state yields an empty store.
    #[instrument(skip_all)]
    pub fn load(storage: Arc<dyn KeyValueStore>, config: LocationStoreConfig) -> Self {
        let state = match read_state(storage.as_ref()) {
            Ok(Some(state)) => {
                debug!(count = state.len(), "Restored tracked locations");
                state
            },
            Ok(None) => LocationList::default(),
            Err(e) => {
                warn!(error = %e, "Discarding persisted locations");
                LocationList::default()
            },
        };

        Self {
            state,
            config,
            storage,
        }
    }

    /// Track a new city
    ///
    /// # Errors
    ///
    /// `DuplicateLocation` or `CapacityExceeded`; the state is unchanged.
    #[instrument(skip(self), fields(name = %candidate.name))]
    pub fn add(&mut self, candidate: &PlaceCandidate) -> Result<Location, ApplicationError> {
        let (next, location) = self.state.with_added(candidate, &self.config)?;
        self.commit(next);
        info!(id = %location.id, display_name = %location.display_name, "Location added");
        Ok(location)
    }

    /// Stop tracking a location
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: &LocationId) -> Result<Location, ApplicationError> {
        let (next, removed) = self.state.without(id)?;
        self.commit(next);
        info!(display_name = %removed.display_name, "Location removed");
        Ok(removed)
    }

    /// Create or replace the current-position slot
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` when no slot exists and the store is full.
    #[instrument(skip(self))]
    pub fn set_current_position(
        &mut self,
        display_name: &str,
        coordinates: GeoLocation,
    ) -> Result<Location, ApplicationError> {
        let (next, location) =
            self.state
                .with_current_position(display_name, coordinates, self.config.max_locations)?;
        self.commit(next);
        Ok(location)
    }

    /// Store lazily resolved coordinates
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub fn backfill_coordinates(
        &mut self,
        id: &LocationId,
        coordinates: GeoLocation,
    ) -> Result<(), ApplicationError> {
        let next = self.state.with_coordinates(id, coordinates)?;
        self.commit(next);
        debug!(%id, "Coordinates backfilled");
        Ok(())
    }

    /// Locations in display order
    #[must_use]
    pub fn list(&self) -> &[Location] {
        self.state.as_slice()
    }

    /// Current state snapshot
    #[must_use]
    pub fn snapshot(&self) -> LocationList {
        self.state.clone()
    }

    /// Look up a location by id
    #[must_use]
    pub fn get(&self, id: &LocationId) -> Option<&Location> {
        self.state.get(id)
    }

    /// Number of tracked locations
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether nothing is tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// The configured limits
    #[must_use]
    pub const fn config(&self) -> &LocationStoreConfig {
        &self.config
    }

    /// Write the whole state to storage
    ///
    /// Failures are logged; the in-memory state stays authoritative.
    pub fn persist(&self) {
        let result = serde_json::to_string(&self.state)
            .map_err(|e| ApplicationError::Internal(e.to_string()))
            .and_then(|json| self.storage.set(LOCATIONS_KEY, &json));

        if let Err(e) = result {
            warn!(error = %e, "Failed to persist tracked locations");
        }
    }

    fn commit(&mut self, next: LocationList) {
        self.state = next;
        self.persist();
    }
}

fn read_state(storage: &dyn KeyValueStore) -> Result<Option<LocationList>, ApplicationError> {
    let Some(raw) = storage.get(LOCATIONS_KEY)? else {
        return Ok(None);
    };
    let records: Vec<Location> = serde_json::from_str(&raw)
        .map_err(|e| ApplicationError::MalformedPersistedState(e.to_string()))?;
    Ok(Some(LocationList::from_records(records)))
}
