//! Type-safe wrapper for live query subscription identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CommonError;

/// Unique identifier for one registered live query subscription.
///
/// Allocated when a live operation is registered and valid until the
/// subscription is unregistered or its connection goes away. Callers treat it
/// as opaque; only the store hands them out.
///
/// # Examples
/// ```
/// use livestore_commons::models::SubscriptionId;
///
/// let id = SubscriptionId::generate();
/// assert!(id.as_str().starts_with("lq_"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    /// Creates a SubscriptionId from an existing string.
    ///
    /// # Panics
    /// Panics if the id is empty.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.is_empty(), "SubscriptionId cannot be empty");
        Self(id)
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(format!("lq_{}", uuid::Uuid::new_v4().simple()))
    }

    /// Parse from string format, validating non-emptiness.
    pub fn from_string(s: &str) -> Result<Self, CommonError> {
        if s.is_empty() {
            return Err(CommonError::InvalidInput(
                "SubscriptionId cannot be empty".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubscriptionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SubscriptionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = SubscriptionId::generate();
        let b = SubscriptionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_string_rejects_empty() {
        assert!(SubscriptionId::from_string("").is_err());
        assert!(SubscriptionId::from_string("lq_abc").is_ok());
    }

    #[test]
    fn test_display_matches_as_str() {
        let id = SubscriptionId::new("lq_test");
        assert_eq!(id.to_string(), "lq_test");
        assert_eq!(id.as_str(), "lq_test");
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = SubscriptionId::new("lq_test");
        let json = serde_json::to_string(&id).unwrap();
        let back: SubscriptionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
