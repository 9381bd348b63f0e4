//! # livestore-commons
//!
//! Shared types for the livestore live query engine.
//!
//! This crate provides the foundational types used by `livestore-core` and by
//! callers integrating the store with an execution engine:
//!
//! - `SubscriptionId`: type-safe identifier for one registered live query
//! - `Tag`: opaque label for a unit of invalidatable data
//! - `Operation`: descriptor for a parsed query (text, name, variables)
//! - `ExecutionResult` / `QueryError`: the structured success/error payload an
//!   execution engine produces and the store delivers
//!
//! ## Example Usage
//!
//! ```rust
//! use livestore_commons::models::{Operation, SubscriptionId, Tag};
//!
//! let tag = Tag::new("Query.greetings");
//! let op = Operation::new("query { greetings }");
//! let id = SubscriptionId::generate();
//!
//! assert_eq!(tag.as_str(), "Query.greetings");
//! assert!(id.as_str().starts_with("lq_"));
//! ```

pub mod errors;
pub mod models;

// Re-export commonly used types at crate root
pub use errors::{CommonError, Result};
pub use models::{ExecutionResult, Operation, QueryError, SubscriptionId, Tag};
