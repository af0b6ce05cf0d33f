//! Identifier for tracked locations

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stable, opaque identifier for a tracked location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(Uuid);

impl LocationId {
    /// Create a new random location ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a location ID from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a location ID from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }

    /// Get the underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for LocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for LocationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(LocationId::new(), LocationId::new());
    }

    #[test]
    fn roundtrips_through_string() {
        let original = LocationId::new();
        let parsed = LocationId::parse(&original.to_string()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn parse_tolerates_surrounding_whitespace() {
        let original = LocationId::new();
        let parsed = LocationId::parse(&format!("  {original}\n")).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(LocationId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&LocationId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }
}
