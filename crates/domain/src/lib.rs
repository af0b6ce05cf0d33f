//! Domain layer for Skydeck
//!
//! Contains the weather dashboard's entities, value objects, and domain errors.
//! This layer performs no I/O and defines the ubiquitous language: locations,
//! candidates, samples, daily summaries, and per-location views.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
