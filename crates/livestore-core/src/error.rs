//! Error types for livestore-core

use thiserror::Error;

/// Errors that can occur in live query store operations.
///
/// Query-level errors (a resolver throwing, validation failing inside the
/// engine) are deliberately absent: they travel inside
/// [`ExecutionResult::errors`](livestore_commons::ExecutionResult) as normal
/// payload. Only adapter-level failures surface here.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The executor adapter itself failed (transport-level, not query-level).
    #[error("Execution unavailable: {0}")]
    ExecutionUnavailable(String),

    /// The store is shutting down and rejects new registrations.
    #[error("Store is shutting down")]
    ShuttingDown,
}

/// Result type for live query store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
