//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod location_id;
mod place_candidate;

pub use geo_location::{DEFAULT_COORDINATE_TOLERANCE, GeoLocation};
pub use location_id::LocationId;
pub use place_candidate::{PlaceCandidate, format_display_name};
