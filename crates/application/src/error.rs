//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A query or coordinates produced no geocoding result, or an id is unknown
    #[error("Not found: {0}")]
    NotFound(String),

    /// The location is already tracked (same name or same coordinates)
    #[error("Location already tracked: {0}")]
    DuplicateLocation(String),

    /// The tracked-location limit is reached
    #[error("Cannot track more than {max} locations")]
    CapacityExceeded { max: usize },

    /// Transport failure or non-success status from an upstream service
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered but the payload is unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Persisted state could not be parsed
    #[error("Malformed persisted state: {0}")]
    MalformedPersistedState(String),

    /// The user refused access to the device position
    #[error("Location permission denied")]
    PermissionDenied,

    /// The device position was not obtained in time
    #[error("Location request timed out")]
    Timeout,

    /// The device position could not be determined
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// A full refresh is already running
    #[error("A refresh is already in progress")]
    RefreshInProgress,

    /// Caller supplied invalid input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Key-value storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result category reported to the user for each dashboard action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOutcome {
    /// The action completed
    Success,
    /// Nothing matched the query
    NotFound,
    /// The location is already tracked
    Duplicate,
    /// The tracked-location limit is reached
    CapacityExceeded,
    /// An upstream service could not be reached
    NetworkError,
    /// The device position could not be used
    LocationUnavailable,
    /// Any other failure
    Failed,
}

impl UserOutcome {
    /// Short message for the user
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Done",
            Self::NotFound => "City not found",
            Self::Duplicate => "This city is already added",
            Self::CapacityExceeded => "Maximum number of cities reached",
            Self::NetworkError => "Connection error, please try again",
            Self::LocationUnavailable => "Could not determine your location",
            Self::Failed => "Something went wrong",
        }
    }
}

impl ApplicationError {
    /// Map the error to the outcome category shown to the user
    #[must_use]
    pub const fn outcome(&self) -> UserOutcome {
        match self {
            Self::NotFound(_) => UserOutcome::NotFound,
            Self::DuplicateLocation(_) => UserOutcome::Duplicate,
            Self::CapacityExceeded { .. } => UserOutcome::CapacityExceeded,
            Self::Network(_) | Self::InvalidResponse(_) => UserOutcome::NetworkError,
            Self::PermissionDenied
            | Self::Timeout
            | Self::PositionUnavailable(_)
            | Self::Domain(DomainError::InvalidCoordinates { .. }) => {
                UserOutcome::LocationUnavailable
            },
            Self::MalformedPersistedState(_)
            | Self::RefreshInProgress
            | Self::Validation(_)
            | Self::Storage(_)
            | Self::Configuration(_)
            | Self::Internal(_) => UserOutcome::Failed,
        }
    }
}
