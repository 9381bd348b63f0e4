//! Shared error types for livestore.
//!
//! Kept dependency-free so every crate in the workspace can use them without
//! pulling in anything beyond the standard library.

use std::fmt;

/// Common error type for validation and parsing of shared types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// An input value failed validation (empty id, malformed tag, ...).
    InvalidInput(String),
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommonError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for CommonError {}

/// Result type alias using [`CommonError`].
pub type Result<T> = std::result::Result<T, CommonError>;
