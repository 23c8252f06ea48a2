//! Capacity-bounded cache with per-entry expiry.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use super::StoryCache;
use crate::types::{ItemId, Story};

/// A cached story and the moment it was inserted
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// Story ID
    pub id: ItemId,
    /// The story
    pub story: Story,
    /// Insertion time, the basis for expiry
    pub inserted_at: Instant,
}

/// Incrementally filled cache holding at most `capacity` stories for `ttl` each
///
/// Lookups are linear scans, which is fine at the intended size (tens of
/// entries). Inserting into a full cache is a silent no-op; room only comes
/// back through [`purge`](StoryCache::purge).
pub struct TtlCache {
    entries: Mutex<Vec<CacheEntry>>,
    capacity: usize,
    ttl: Duration,
}

impl TtlCache {
    /// Create an empty cache
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            capacity,
            ttl,
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, Vec<CacheEntry>> {
        // Entries are plain data; a panic elsewhere can't leave them half-written
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }
}

impl StoryCache for TtlCache {
    fn lookup(&self, id: ItemId) -> Option<Story> {
        let now = Instant::now();
        self.entries()
            .iter()
            .find(|e| e.id == id && self.is_fresh(e, now))
            .map(|e| e.story.clone())
    }

    fn insert(&self, stories: &[Story]) {
        let now = Instant::now();
        let mut entries = self.entries();

        for story in stories {
            if entries.len() >= self.capacity {
                tracing::trace!(capacity = self.capacity, "Story cache full, skipping insert");
                break;
            }
            if entries.iter().any(|e| e.id == story.id) {
                continue;
            }
            entries.push(CacheEntry {
                id: story.id,
                story: story.clone(),
                inserted_at: now,
            });
        }
    }

    fn purge(&self) {
        let now = Instant::now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|e| self.is_fresh(e, now));

        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "Purged expired stories");
        }
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}
