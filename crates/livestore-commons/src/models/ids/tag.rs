//! Type-safe wrapper for invalidation tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque label identifying a unit of invalidatable data.
///
/// A tag exists implicitly for as long as at least one subscription's last
/// execution touched it; the store never interprets its contents. Callers
/// choose the naming convention — `"<TypeName>.<fieldName>"` is the common
/// one (e.g. `"Query.greetings"`).
///
/// # Examples
/// ```
/// use livestore_commons::models::Tag;
///
/// let tag = Tag::new("Query.greetings");
/// assert_eq!(tag.as_str(), "Query.greetings");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(String);

impl Tag {
    /// Creates a new Tag from a string.
    ///
    /// # Panics
    /// Panics if the tag is empty.
    #[inline]
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        assert!(!tag.is_empty(), "Tag cannot be empty");
        Self(tag)
    }

    /// Returns the tag as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
