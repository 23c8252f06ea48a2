//! Whole-list snapshot swapped atomically on refresh.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::time::Instant;

use super::StoryCache;
use crate::types::{ItemId, Story};

/// An immutable, fully built top list
#[derive(Debug)]
pub struct Snapshot {
    stories: Vec<Story>,
    target: usize,
    built_at: Instant,
}

impl Snapshot {
    /// Wrap a freshly aggregated list that was built to hold `target` stories
    pub fn new(stories: Vec<Story>, target: usize) -> Self {
        Self {
            stories,
            target,
            built_at: Instant::now(),
        }
    }

    /// Stories in rank order
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// How many stories the aggregation was asked for
    ///
    /// May exceed `stories().len()` when the feed ran out of qualifying items.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Time since the snapshot was built
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.built_at)
    }
}

/// Holder of the current [`Snapshot`]
///
/// Readers `load` the current snapshot without locking; the refresher
/// `store`s a complete replacement in a single atomic swap. A snapshot is
/// never modified after it has been published, and one older than `max_age`
/// is treated as absent.
pub struct SnapshotCache {
    current: ArcSwapOption<Snapshot>,
    capacity: usize,
    max_age: Duration,
}

impl SnapshotCache {
    /// Create an empty holder
    ///
    /// `capacity` bounds the length of snapshots built through
    /// [`insert`](StoryCache::insert); `max_age` is normally the refresh period.
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            capacity,
            max_age,
        }
    }

    /// The current snapshot, unless there is none or it has expired
    pub fn load(&self) -> Option<Arc<Snapshot>> {
        self.current
            .load_full()
            .filter(|snapshot| snapshot.age() < self.max_age)
    }

    /// Publish a new snapshot, replacing the previous one wholesale
    pub fn store(&self, stories: Vec<Story>, target: usize) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot::new(stories, target));
        self.current.store(Some(Arc::clone(&snapshot)));
        tracing::debug!(
            stories = snapshot.stories.len(),
            target = snapshot.target,
            "Published story snapshot"
        );
        snapshot
    }

    /// Maximum snapshot age before it stops being served
    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}

impl StoryCache for SnapshotCache {
    fn lookup(&self, id: ItemId) -> Option<Story> {
        self.load()?
            .stories
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    fn insert(&self, stories: &[Story]) {
        let mut kept: Vec<Story> = Vec::with_capacity(stories.len().min(self.capacity));
        for story in stories {
            if kept.len() >= self.capacity {
                break;
            }
            if !kept.iter().any(|s| s.id == story.id) {
                kept.push(story.clone());
            }
        }
        let target = kept.len();
        self.store(kept, target);
    }

    fn purge(&self) {
        let current = self.current.load_full();
        if current
            .as_ref()
            .is_some_and(|snapshot| snapshot.age() >= self.max_age)
        {
            // Only clear the snapshot we inspected, not one published meanwhile
            let _ = self.current.compare_and_swap(&current, None);
        }
    }

    fn len(&self) -> usize {
        self.current
            .load_full()
            .map_or(0, |snapshot| snapshot.stories.len())
    }
}
