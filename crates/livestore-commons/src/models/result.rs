//! Structured execution results delivered to live query subscribers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A query-level error produced while executing an operation.
///
/// These are part of a normal result payload — a resolver throwing does not
/// terminate the subscription, it just shows up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryError {
    /// Human-readable error message.
    pub message: String,
    /// Response path at which the error occurred, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
}

impl QueryError {
    /// Creates an error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Attaches the response path.
    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = Some(path);
        self
    }
}

/// The structured success/error value one execution produces.
///
/// Mirrors the usual query-response shape: optional `data` plus a list of
/// query-level errors. Both can be present at once (partial results).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Resolved data, if any part of the operation succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Query-level errors raised during execution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<QueryError>,
}

impl ExecutionResult {
    /// A pure success result.
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// A pure error result with a single message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![QueryError::new(message)],
        }
    }

    /// True if any query-level error is attached.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
