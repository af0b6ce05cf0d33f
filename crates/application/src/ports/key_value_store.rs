//! Key-value persistence port
//!
//! The dashboard persists a handful of whole-state snapshots (the tracked
//! location list and the last weather snapshot). Writes replace the entire
//! value for a key; implementations must never leave a half-written value
//! behind.

use crate::error::ApplicationError;

/// Key under which the tracked-location list is stored
pub const LOCATIONS_KEY: &str = "skydeck.locations";

/// Key under which the last weather snapshot is stored
pub const WEATHER_SNAPSHOT_KEY: &str = "skydeck.weather_snapshot";

/// Synchronous, whole-value key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the serialized value for `key`
    ///
    /// Returns `None` if nothing was stored under the key.
    fn get(&self, key: &str) -> Result<Option<String>, ApplicationError>;

    /// Replace the value for `key`
    fn set(&self, key: &str, value: &str) -> Result<(), ApplicationError>;
}
