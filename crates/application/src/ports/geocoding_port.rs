//! Geocoding port
//!
//! Defines the interface for turning place names into coordinates and back.

use async_trait::async_trait;
use domain::{GeoLocation, PlaceCandidate};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for forward and reverse geocoding
///
/// A transport failure and an empty result are distinct outcomes: the former
/// is an `Err(ApplicationError::Network)`, the latter an empty `Ok`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Search places by free-text name, best match first
    async fn search(&self, query: &str, limit: u8)
    -> Result<Vec<PlaceCandidate>, ApplicationError>;

    /// Find the nearest named place for a coordinate pair
    async fn reverse(
        &self,
        coordinates: &GeoLocation,
    ) -> Result<Option<PlaceCandidate>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn GeocodingPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeocodingPort>();
    }
}
