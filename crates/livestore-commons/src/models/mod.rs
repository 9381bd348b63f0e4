//! Model types shared across the livestore workspace.

pub mod ids;
pub mod operation;
pub mod result;

pub use ids::{SubscriptionId, Tag};
pub use operation::Operation;
pub use result::{ExecutionResult, QueryError};
