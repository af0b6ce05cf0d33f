//! Application layer - Use cases and orchestration
//!
//! Contains the dashboard services and the port definitions they depend on.
//! Adapters for the ports live in the infrastructure crate.

pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod test_support;

pub use error::{ApplicationError, UserOutcome};
pub use ports::*;
pub use services::*;
