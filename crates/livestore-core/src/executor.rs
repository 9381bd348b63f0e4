//! Executor adapter contract.
//!
//! The store never executes queries itself; an externally supplied adapter
//! does. One call returns both the structured result and the set of tags the
//! execution touched, which is what the store indexes for invalidation.

use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use livestore_commons::models::{ExecutionResult, Operation, Tag};

/// Output of a single execution: the result plus every tag it touched.
#[derive(Debug, Clone)]
pub struct Execution {
    /// Structured success/error payload to deliver.
    pub result: ExecutionResult,
    /// Tags read during this execution. Replaces the subscription's previous
    /// tag set wholesale.
    pub tags: HashSet<Tag>,
}

impl Execution {
    pub fn new(result: ExecutionResult, tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            result,
            tags: tags.into_iter().collect(),
        }
    }
}

/// Adapter-level failure: the executor itself broke (out of memory, engine
/// gone, transport torn down). Distinct from a query-level error, which is a
/// valid result payload.
#[derive(Debug)]
pub struct ExecutorError {
    message: String,
}

impl ExecutorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExecutorError {}

/// External capability that executes an operation and reports touched tags.
///
/// Implementations must be safe to call concurrently for different
/// subscriptions; the store serializes calls only within one subscription.
/// This is the only step expected to suspend for meaningful time, so the
/// store never holds an index or registry lock across it.
#[async_trait]
pub trait QueryExecutor: Send + Sync + 'static {
    /// Request-scoped context captured at registration. Opaque to the store:
    /// constructed once, passed by reference into every execution. Identity
    /// and authorization data belong here.
    type Context: Send + Sync + 'static;

    /// Execute the operation and collect the tags it touched.
    ///
    /// A query-level error (resolver threw, runtime validation failed) is a
    /// successful `Execution` whose result carries `errors`. Return `Err`
    /// only when the adapter itself is broken — the store closes the
    /// subscription in response.
    async fn execute(
        &self,
        operation: &Operation,
        context: &Self::Context,
    ) -> Result<Execution, ExecutorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_collects_tags() {
        let exec = Execution::new(
            ExecutionResult::data(json!({ "ping": true })),
            [Tag::new("Query.ping"), Tag::new("Query.ping")],
        );
        assert_eq!(exec.tags.len(), 1);
    }

    #[test]
    fn test_executor_error_display() {
        let err = ExecutorError::new("engine went away");
        assert_eq!(err.to_string(), "engine went away");
    }
}
