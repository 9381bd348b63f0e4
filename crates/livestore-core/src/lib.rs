//! # livestore-core
//!
//! In-memory live query store: registration of live operations, dependency
//! (tag) tracking, invalidation propagation, and result re-delivery.
//!
//! The store sits between a query-serving transport and a mutable data
//! source. The transport registers operations marked "live"; the data source
//! calls [`LiveQueryStore::invalidate`] whenever something changes; the store
//! re-executes affected subscriptions through an externally supplied
//! [`QueryExecutor`] and streams updated results out through per-subscription
//! channels.
//!
//! ## Module Structure
//!
//! - [`tag_index`] — tag → subscriber-set index (pure, no execution logic)
//! - [`registry`] — subscription records and lifecycle
//! - [`executor`] — the executor adapter contract
//! - [`sanitize`] — pluggable result transform before delivery
//! - [`store`] — orchestration, invalidation fan-out, coalescing
//!
//! ## Guarantees
//!
//! - A subscription's tag set always matches its index entries
//! - Closing a subscription drops its channel exactly once and purges every
//!   index entry
//! - At most one execution per subscription runs at a time; invalidations
//!   arriving while busy collapse into one trailing re-execution
//! - Per-subscription delivery order matches execution order; across
//!   subscriptions there is no ordering and fan-out runs in parallel

pub mod error;
pub mod executor;
pub mod registry;
pub mod sanitize;
pub mod store;
pub mod tag_index;

// Re-export shared types from livestore-commons (canonical source)
pub use livestore_commons::models::{ExecutionResult, Operation, QueryError, SubscriptionId, Tag};

pub use error::{Result, StoreError};
pub use executor::{Execution, ExecutorError, QueryExecutor};
pub use registry::{ResultReceiver, ResultSender, Subscription, SubscriptionRegistry};
pub use sanitize::{MaskErrors, Passthrough, ResultSanitizer};
pub use store::{LiveQueryStore, StoreStats};
pub use tag_index::TagIndex;
