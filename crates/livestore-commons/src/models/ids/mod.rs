//! Type-safe identifier wrappers.

pub mod subscription_id;
pub mod tag;

pub use subscription_id::SubscriptionId;
pub use tag::Tag;
