//! Tag Index
//!
//! Maps an opaque invalidation tag to the set of subscriptions whose last
//! execution touched it. A pure index: no execution logic, all operations
//! total. Entries are created on first reference and removed when their set
//! empties, so the map never accumulates dead tags.

use std::collections::HashSet;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use livestore_commons::models::{SubscriptionId, Tag};

/// Concurrent tag → subscriber-set index.
///
/// DashMap gives lock-free reads on the invalidation hot path; the entry API
/// keeps add/remove atomic per tag so an empty set is never left behind.
#[derive(Debug, Default)]
pub struct TagIndex {
    entries: DashMap<Tag, HashSet<SubscriptionId>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Add a subscription under a tag. Idempotent; creates the tag entry if
    /// absent.
    pub fn add_subscription(&self, tag: Tag, id: &SubscriptionId) {
        self.entries.entry(tag).or_default().insert(id.clone());
    }

    /// Remove a subscription from a tag's set, deleting the entry when the
    /// set becomes empty. Unknown tags and absent ids are no-ops.
    pub fn remove_subscription(&self, tag: &Tag, id: &SubscriptionId) {
        if let Entry::Occupied(mut entry) = self.entries.entry(tag.clone()) {
            entry.get_mut().remove(id);
            if entry.get().is_empty() {
                entry.remove();
            }
        }
    }

    /// Snapshot of the subscribers currently depending on a tag.
    ///
    /// Returns a copy so invalidation handlers can register/unregister
    /// concurrently without iteration-during-mutation hazards.
    pub fn subscribers_of(&self, tag: &Tag) -> Vec<SubscriptionId> {
        self.entries
            .get(tag)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Bulk removal of one subscription from every tag it references.
    /// Used by the unregister/close paths.
    pub fn remove_all(&self, id: &SubscriptionId, tags: &HashSet<Tag>) {
        for tag in tags {
            self.remove_subscription(tag, id);
        }
    }

    /// Number of tags currently tracked.
    pub fn tag_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(n: u32) -> SubscriptionId {
        SubscriptionId::new(format!("lq_{}", n))
    }

    #[test]
    fn test_add_is_idempotent() {
        let index = TagIndex::new();
        let tag = Tag::new("Query.greetings");

        index.add_subscription(tag.clone(), &sub(1));
        index.add_subscription(tag.clone(), &sub(1));

        assert_eq!(index.subscribers_of(&tag), vec![sub(1)]);
        assert_eq!(index.tag_count(), 1);
    }

    #[test]
    fn test_remove_deletes_empty_entries() {
        let index = TagIndex::new();
        let tag = Tag::new("Query.greetings");

        index.add_subscription(tag.clone(), &sub(1));
        index.add_subscription(tag.clone(), &sub(2));
        assert_eq!(index.subscribers_of(&tag).len(), 2);

        index.remove_subscription(&tag, &sub(1));
        assert_eq!(index.subscribers_of(&tag), vec![sub(2)]);
        assert_eq!(index.tag_count(), 1);

        index.remove_subscription(&tag, &sub(2));
        assert!(index.subscribers_of(&tag).is_empty());
        assert_eq!(index.tag_count(), 0);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let index = TagIndex::new();
        index.remove_subscription(&Tag::new("Query.missing"), &sub(1));
        assert_eq!(index.tag_count(), 0);
    }

    #[test]
    fn test_remove_all() {
        let index = TagIndex::new();
        let a = Tag::new("Query.a");
        let b = Tag::new("Query.b");

        index.add_subscription(a.clone(), &sub(1));
        index.add_subscription(b.clone(), &sub(1));
        index.add_subscription(b.clone(), &sub(2));

        let tags: HashSet<Tag> = [a.clone(), b.clone()].into_iter().collect();
        index.remove_all(&sub(1), &tags);

        assert!(index.subscribers_of(&a).is_empty());
        assert_eq!(index.subscribers_of(&b), vec![sub(2)]);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let index = TagIndex::new();
        let tag = Tag::new("Query.greetings");
        index.add_subscription(tag.clone(), &sub(1));

        let snapshot = index.subscribers_of(&tag);
        index.remove_subscription(&tag, &sub(1));

        // The earlier snapshot is unaffected by the removal.
        assert_eq!(snapshot, vec![sub(1)]);
    }
}
