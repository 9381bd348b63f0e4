//! Live Query Store
//!
//! Orchestrates the tag index, subscription registry, and executor adapter:
//!
//! - `register` runs the initial execution, indexes the touched tags, and
//!   delivers the first result on the subscription's channel
//! - `invalidate` looks up dependents of a tag and schedules re-executions,
//!   coalescing repeat invalidations per subscription into a single trailing
//!   run
//! - `unregister` purges the index and closes the delivery channel
//!
//! All shared state lives in DashMap-backed structures owned exclusively by
//! the store; the executor call is the only step that suspends, and no index
//! or registry lock is ever held across it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use livestore_commons::models::{ExecutionResult, Operation, SubscriptionId, Tag};
use log::{debug, info, trace, warn};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, StoreError};
use crate::executor::{Execution, QueryExecutor};
use crate::registry::{ResultReceiver, Subscription, SubscriptionRegistry};
use crate::sanitize::{Passthrough, ResultSanitizer};
use crate::tag_index::TagIndex;

/// Point-in-time counters for monitoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Subscriptions currently registered.
    pub active_subscriptions: usize,
    /// Tags with at least one dependent subscription.
    pub tracked_tags: usize,
    /// Executions run since the store was created (initial + re-executions).
    pub executions: u64,
    /// Results actually handed to a live channel.
    pub deliveries: u64,
}

/// In-memory live query store.
///
/// Generic over the externally supplied [`QueryExecutor`]; the executor's
/// associated `Context` is captured once per registration and passed by
/// reference into every execution. Wrap in `Arc` for shared ownership — the
/// invalidation fan-out spawns tasks that hold a clone.
pub struct LiveQueryStore<E: QueryExecutor> {
    executor: Arc<E>,
    registry: SubscriptionRegistry<E::Context>,
    tag_index: TagIndex,
    sanitizer: Arc<dyn ResultSanitizer>,

    shutdown_token: CancellationToken,
    is_shutting_down: AtomicBool,

    executions: AtomicU64,
    deliveries: AtomicU64,
}

impl<E: QueryExecutor> LiveQueryStore<E> {
    /// Create a store that delivers executor results untouched.
    pub fn new(executor: Arc<E>) -> Arc<Self> {
        Self::with_sanitizer(executor, Arc::new(Passthrough))
    }

    /// Create a store with a result-sanitizing step applied to every
    /// delivered result (e.g. [`MaskErrors`](crate::sanitize::MaskErrors)).
    pub fn with_sanitizer(executor: Arc<E>, sanitizer: Arc<dyn ResultSanitizer>) -> Arc<Self> {
        Arc::new(Self {
            executor,
            registry: SubscriptionRegistry::new(),
            tag_index: TagIndex::new(),
            sanitizer,
            shutdown_token: CancellationToken::new(),
            is_shutting_down: AtomicBool::new(false),
            executions: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
        })
    }

    // ==================== Registration ====================

    /// Register a live operation.
    ///
    /// Runs the initial execution, indexes the tags it touched, and delivers
    /// the initial result on the returned channel. A query-level error still
    /// produces a delivered result; only an adapter failure makes `register`
    /// itself fail with [`StoreError::ExecutionUnavailable`].
    pub async fn register(
        &self,
        operation: Operation,
        context: E::Context,
    ) -> Result<(SubscriptionId, ResultReceiver)> {
        if self.is_shutting_down.load(Ordering::Acquire) {
            return Err(StoreError::ShuttingDown);
        }

        let (subscription, receiver) = self.registry.create(operation, context);
        let id = subscription.id().clone();

        let execution = match self
            .executor
            .execute(subscription.operation(), subscription.context())
            .await
        {
            Ok(execution) => execution,
            Err(e) => {
                self.registry.close(&id);
                return Err(StoreError::ExecutionUnavailable(e.to_string()));
            }
        };
        self.executions.fetch_add(1, Ordering::Relaxed);

        // Store result + tags, deliver, then index. Indexing last means no
        // invalidation can schedule a re-execution whose delivery would race
        // ahead of the initial result.
        if let Some(delta) = subscription.update_result(execution.result.clone(), execution.tags) {
            if subscription.deliver(self.sanitizer.sanitize(execution.result)) {
                self.deliveries.fetch_add(1, Ordering::Relaxed);
            }
            for tag in delta.added {
                self.tag_index.add_subscription(tag, &id);
            }
            if subscription.is_closed() {
                // Lost a race with close between indexing and here.
                self.tag_index.remove_all(&id, &delta.current);
            }
        }

        debug!(
            "Registered live query {} ({} active)",
            id,
            self.registry.count()
        );
        Ok((id, receiver))
    }

    /// Unregister a subscription: purge every tag index entry and close the
    /// delivery channel. Unknown or already-closed ids are no-ops, keeping
    /// unregister idempotent under races with disconnect-driven cleanup.
    pub fn unregister(&self, id: &SubscriptionId) {
        self.close_subscription(id);
    }

    // ==================== Invalidation ====================

    /// Notify the store that the data behind a tag changed.
    ///
    /// Fire-and-forget: snapshots the dependents and schedules one
    /// re-execution unit per affected subscription on the Tokio runtime.
    /// Must be called from within a runtime. Independent subscriptions
    /// re-execute in parallel; repeat invalidations of a busy subscription
    /// collapse into a single trailing run.
    pub fn invalidate(self: &Arc<Self>, tag: &Tag) {
        let subscribers = self.tag_index.subscribers_of(tag);
        if subscribers.is_empty() {
            trace!("Invalidated tag {} with no subscribers", tag);
            return;
        }

        debug!(
            "Invalidating tag {} ({} subscriber(s))",
            tag,
            subscribers.len()
        );
        for id in subscribers {
            self.schedule_reexecution(id);
        }
    }

    /// Schedule one re-execution unit, enforcing at most one in-flight
    /// execution per subscription.
    fn schedule_reexecution(self: &Arc<Self>, id: SubscriptionId) {
        let Some(subscription) = self.registry.get(&id) else {
            // Unregistered between snapshot and scheduling.
            return;
        };

        {
            let mut flags = subscription.exec.lock();
            if subscription.is_closed() {
                return;
            }
            if flags.in_flight {
                // Collapse into a single trailing re-execution.
                flags.rerun = true;
                return;
            }
            flags.in_flight = true;
        }

        let store = Arc::clone(self);
        tokio::spawn(async move {
            store.run_execution_loop(subscription).await;
        });
    }

    /// Owns the subscription's execution slot: runs executions one at a time,
    /// performing exactly one trailing run if invalidations arrived while
    /// busy. Deliveries therefore happen in execution order.
    async fn run_execution_loop(self: Arc<Self>, subscription: Arc<Subscription<E::Context>>) {
        loop {
            if subscription.is_closed() {
                return;
            }

            let execution = tokio::select! {
                biased;
                _ = self.shutdown_token.cancelled() => return,
                result = self
                    .executor
                    .execute(subscription.operation(), subscription.context()) => result,
            };

            match execution {
                Ok(execution) => {
                    self.executions.fetch_add(1, Ordering::Relaxed);
                    self.apply_execution(&subscription, execution);
                }
                Err(e) => {
                    warn!(
                        "Executor failed for subscription {}: {}; closing",
                        subscription.id(),
                        e
                    );
                    self.close_subscription(subscription.id());
                    return;
                }
            }

            let run_again = {
                let mut flags = subscription.exec.lock();
                if flags.rerun {
                    flags.rerun = false;
                    true
                } else {
                    flags.in_flight = false;
                    false
                }
            };
            if !run_again {
                return;
            }
        }
    }

    /// Apply one successful execution: swap stored result and tags, update
    /// the index by delta, deliver the sanitized result.
    fn apply_execution(&self, subscription: &Subscription<E::Context>, execution: Execution) {
        let id = subscription.id().clone();

        let Some(delta) = subscription.update_result(execution.result.clone(), execution.tags)
        else {
            // Closed while we were executing; the in-flight result is dropped.
            return;
        };

        for tag in delta.added {
            self.tag_index.add_subscription(tag, &id);
        }
        for tag in &delta.removed {
            self.tag_index.remove_subscription(tag, &id);
        }

        if subscription.is_closed() {
            // Close raced the index update; purge whatever we just added.
            self.tag_index.remove_all(&id, &delta.current);
            return;
        }

        if subscription.deliver(self.sanitizer.sanitize(execution.result)) {
            self.deliveries.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn close_subscription(&self, id: &SubscriptionId) {
        if let Some(tags) = self.registry.close(id) {
            self.tag_index.remove_all(id, &tags);
            debug!(
                "Subscription {} unregistered ({} tag(s) released)",
                id,
                tags.len()
            );
        }
    }

    // ==================== Queries / Metrics ====================

    /// Snapshot of the subscriptions currently depending on a tag.
    /// Read-only view; the index itself is never exposed for mutation.
    pub fn subscribers_of(&self, tag: &Tag) -> Vec<SubscriptionId> {
        self.tag_index.subscribers_of(tag)
    }

    /// Last result stored for a subscription, if it is still active.
    pub fn last_result(&self, id: &SubscriptionId) -> Option<ExecutionResult> {
        self.registry.get(id).and_then(|sub| sub.last_result())
    }

    pub fn subscription_count(&self) -> usize {
        self.registry.count()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            active_subscriptions: self.registry.count(),
            tracked_tags: self.tag_index.tag_count(),
            executions: self.executions.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
        }
    }

    // ==================== Shutdown ====================

    /// Close every subscription, reject further registrations, and cancel
    /// in-flight re-executions.
    pub fn shutdown(&self) {
        if self.is_shutting_down.swap(true, Ordering::AcqRel) {
            return;
        }

        let ids = self.registry.ids();
        info!(
            "Shutting down live query store ({} active subscription(s))",
            ids.len()
        );
        for id in ids {
            self.close_subscription(&id);
        }
        self.shutdown_token.cancel();
    }

    /// Whether shutdown has been initiated.
    pub fn is_shutting_down(&self) -> bool {
        self.is_shutting_down.load(Ordering::Acquire)
    }
}

impl<E: QueryExecutor> Drop for LiveQueryStore<E> {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}
