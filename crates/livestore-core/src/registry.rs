//! Subscription Registry
//!
//! Single source of truth for subscription state: operation descriptor,
//! registration context, delivery channel, current tag set, last result, and
//! lifecycle. The registry owns every `Subscription` record; the tag index
//! only ever holds their ids.
//!
//! Lifecycle per record: created by `create`, mutated by every successful
//! re-execution through `update_result`, destroyed by `close`. `close` is
//! idempotent and drops the delivery sender exactly once — the receiving
//! transport observes the channel closing and knows the live query ended.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use livestore_commons::models::{ExecutionResult, Operation, SubscriptionId, Tag};
use log::debug;
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Sending half of a subscription's result channel.
pub type ResultSender = mpsc::UnboundedSender<ExecutionResult>;
/// Receiving half handed to the transport layer on registration.
pub type ResultReceiver = mpsc::UnboundedReceiver<ExecutionResult>;

/// Coalescing state for one subscription.
///
/// At most one execution runs at a time; an invalidation arriving while one
/// is running only sets `rerun`, and the running task performs exactly one
/// trailing execution when it finishes.
#[derive(Debug, Default)]
pub(crate) struct ExecFlags {
    pub in_flight: bool,
    pub rerun: bool,
}

/// Outcome of swapping a subscription's tag set after an execution.
#[derive(Debug)]
pub(crate) struct TagDelta {
    /// Tags in the new set but not the old: add to the index.
    pub added: Vec<Tag>,
    /// Tags in the old set but not the new: remove from the index.
    pub removed: Vec<Tag>,
    /// The full new tag set, for purge-after-close races.
    pub current: HashSet<Tag>,
}

/// Result/tag state guarded together so close and update cannot interleave.
#[derive(Debug, Default)]
struct ResultState {
    tags: HashSet<Tag>,
    last_result: Option<ExecutionResult>,
}

/// One registered live query.
pub struct Subscription<C> {
    id: SubscriptionId,
    operation: Operation,
    context: C,
    /// Taken exactly once on close; dropping it closes the receiver.
    sender: Mutex<Option<ResultSender>>,
    state: Mutex<ResultState>,
    closed: AtomicBool,
    pub(crate) exec: Mutex<ExecFlags>,
}

impl<C> Subscription<C> {
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Last result stored for this subscription, if any execution completed.
    pub fn last_result(&self) -> Option<ExecutionResult> {
        self.state.lock().last_result.clone()
    }

    /// Snapshot of the current tag set.
    pub fn tags(&self) -> HashSet<Tag> {
        self.state.lock().tags.clone()
    }

    /// Replace the stored result and tag set, returning the tag delta the
    /// caller must apply to the index. Returns `None` if the subscription was
    /// concurrently closed — in that case nothing was stored and the index
    /// must not be touched.
    pub(crate) fn update_result(
        &self,
        result: ExecutionResult,
        new_tags: HashSet<Tag>,
    ) -> Option<TagDelta> {
        let mut state = self.state.lock();
        if self.is_closed() {
            return None;
        }

        let added: Vec<Tag> = new_tags.difference(&state.tags).cloned().collect();
        let removed: Vec<Tag> = state.tags.difference(&new_tags).cloned().collect();

        state.tags = new_tags;
        state.last_result = Some(result);

        Some(TagDelta {
            added,
            removed,
            current: state.tags.clone(),
        })
    }

    /// Send a result to the transport. A delivery that finds the channel
    /// already closed (race with `close`, or the receiver dropped) is
    /// dropped, not buffered.
    pub(crate) fn deliver(&self, result: ExecutionResult) -> bool {
        match &*self.sender.lock() {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }

    /// Mark closed and drop the delivery sender. Idempotent: only the first
    /// call observes the tag set; later calls return `None`.
    pub(crate) fn close(&self) -> Option<HashSet<Tag>> {
        let mut state = self.state.lock();
        if self.closed.swap(true, Ordering::AcqRel) {
            return None;
        }
        // Dropping the sender closes the receiver exactly once.
        self.sender.lock().take();
        Some(std::mem::take(&mut state.tags))
    }
}

/// Registry of all active subscriptions.
///
/// DashMap for lock-free concurrent access; records are shared as `Arc` with
/// in-flight execution tasks, which observe closure through the record's own
/// `closed` flag after removal from the map.
pub struct SubscriptionRegistry<C> {
    subscriptions: DashMap<SubscriptionId, Arc<Subscription<C>>>,
}

impl<C> SubscriptionRegistry<C> {
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
        }
    }

    /// Allocate an id, store the record in active state, and return it along
    /// with the read side of its result channel.
    pub fn create(&self, operation: Operation, context: C) -> (Arc<Subscription<C>>, ResultReceiver) {
        let id = SubscriptionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();

        let subscription = Arc::new(Subscription {
            id: id.clone(),
            operation,
            context,
            sender: Mutex::new(Some(tx)),
            state: Mutex::new(ResultState::default()),
            closed: AtomicBool::new(false),
            exec: Mutex::new(ExecFlags::default()),
        });

        let previous = self.subscriptions.insert(id, Arc::clone(&subscription));
        assert!(previous.is_none(), "subscription id collision");

        (subscription, rx)
    }

    pub fn get(&self, id: &SubscriptionId) -> Option<Arc<Subscription<C>>> {
        self.subscriptions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove and close a subscription, returning the tag set it held so the
    /// caller can purge the index. Unknown or already-closed ids are no-ops.
    pub fn close(&self, id: &SubscriptionId) -> Option<HashSet<Tag>> {
        let (_, subscription) = self.subscriptions.remove(id)?;
        let tags = subscription.close();
        if tags.is_some() {
            debug!("Subscription closed: {}", id);
        }
        tags
    }

    /// Ids of every active subscription (snapshot).
    pub fn ids(&self) -> Vec<SubscriptionId> {
        self.subscriptions.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl<C> Default for SubscriptionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
