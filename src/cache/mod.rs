//! Story caches.
//!
//! Two strategies share the [`StoryCache`] contract:
//! - [`SnapshotCache`] - one immutable top list swapped atomically on refresh.
//!   Readers never block and never observe a partially built list.
//! - [`TtlCache`] - a small capacity-bounded set of stories, each expiring on
//!   its own, guarded by a mutex.
//!
//! Neither cache ever hands out an entry older than its expiry.

mod snapshot;
mod ttl;

pub use snapshot::{Snapshot, SnapshotCache};
pub use ttl::{CacheEntry, TtlCache};

use crate::types::{ItemId, Story};

/// Common interface over the cache strategies
pub trait StoryCache: Send + Sync {
    /// Fetch a non-expired story by ID
    fn lookup(&self, id: ItemId) -> Option<Story>;

    /// Add resolved stories
    fn insert(&self, stories: &[Story]);

    /// Drop everything that has expired
    fn purge(&self);

    /// Number of stories currently held, expired or not
    fn len(&self) -> usize;

    /// Whether the cache holds nothing
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
