//! Persistence module
//!
//! Whole-value key-value stores backing the tracked-location list and the
//! last weather snapshot.

pub mod error;
mod in_memory_store;
mod json_file_store;

pub use in_memory_store::InMemoryStore;
pub use json_file_store::JsonFileStore;
