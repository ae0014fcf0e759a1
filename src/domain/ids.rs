//! Record identifier value objects.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a property listing.
///
/// # Example
///
/// ```
/// use realty_mcp_server::domain::PropertyId;
///
/// let id = PropertyId::new("0b6c1c1e-9a55-4f0e-8d0b-3f7c2f1d9e10").unwrap();
/// assert_eq!(id.as_str(), "0b6c1c1e-9a55-4f0e-8d0b-3f7c2f1d9e10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(String);

/// Identifier of a signed-in user (also the primary key of their profile).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl PropertyId {
    /// Create a new PropertyId, trimming whitespace and rejecting empty input.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::EmptyId("Property"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl UserId {
    /// Create a new UserId, trimming whitespace and rejecting empty input.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::EmptyId("User"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Serialize for PropertyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropertyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PropertyId::new(s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        UserId::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_id_rejects_blank() {
        assert_eq!(PropertyId::new(""), Err(ValidationError::EmptyId("Property")));
        assert_eq!(PropertyId::new("   "), Err(ValidationError::EmptyId("Property")));
    }

    #[test]
    fn test_ids_are_trimmed() {
        let id = UserId::new("  user-1 ").unwrap();
        assert_eq!(id.as_str(), "user-1");
        assert_eq!(id.to_string(), "user-1");
    }

    #[test]
    fn test_id_serde_as_plain_string() {
        let id = PropertyId::new("p-9").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p-9\"");

        let back: PropertyId = serde_json::from_str("\"p-9\"").unwrap();
        assert_eq!(back, id);

        let empty: Result<UserId, _> = serde_json::from_str("\"\"");
        assert!(empty.is_err());
    }
}
