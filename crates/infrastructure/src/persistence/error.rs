//! Shared error mapping for the key-value stores

use application::ApplicationError;

/// Map an I/O error on `key` to an application-layer storage error
pub fn map_io_error(key: &str, e: &std::io::Error) -> ApplicationError {
    ApplicationError::Storage(format!("{key}: {e}"))
}
