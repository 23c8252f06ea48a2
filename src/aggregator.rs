//! Over-fetching aggregation of the ranked feed into a top-N story list.
//!
//! Only a fraction of ranked items are linked stories, so each round asks for
//! more raw IDs than the number of stories still missing. Rounds continue
//! until the target is reached or the ranked list runs out.

use std::collections::HashSet;

use crate::cache::StoryCache;
use crate::collector;
use crate::pool::WorkerPool;
use crate::types::{ItemId, RankedStory, Story};

/// Drives rounds of lookups through a shared [`WorkerPool`]
#[derive(Clone)]
pub struct Aggregator {
    pool: WorkerPool,
    overfetch_factor: f64,
}

impl Aggregator {
    /// Create an aggregator requesting `overfetch_factor` raw IDs per missing story
    ///
    /// Factors below 1.0 (or not finite) are treated as 1.0.
    pub fn new(pool: WorkerPool, overfetch_factor: f64) -> Self {
        let overfetch_factor = if overfetch_factor.is_finite() && overfetch_factor >= 1.0 {
            overfetch_factor
        } else {
            1.0
        };
        Self {
            pool,
            overfetch_factor,
        }
    }

    /// The effective over-fetch factor
    pub fn overfetch_factor(&self) -> f64 {
        self.overfetch_factor
    }

    /// Raw IDs to request when `missing` stories are still needed
    fn batch_size(&self, missing: usize) -> usize {
        let wanted = (missing as f64 * self.overfetch_factor).ceil();
        // `wanted` is finite and non-negative here
        (wanted as usize).max(1)
    }

    /// Collect up to `target` qualifying stories from `ids` in rank order
    ///
    /// When `cache` is given, IDs it holds are served from it and only the
    /// misses are looked up. Running out of IDs before reaching `target`
    /// yields a short list; it is not an error. An ID repeated in `ids` is
    /// only considered at its first position.
    pub async fn fill(
        &self,
        ids: &[ItemId],
        target: usize,
        cache: Option<&dyn StoryCache>,
    ) -> Vec<Story> {
        let mut stories: Vec<Story> = Vec::with_capacity(target.min(ids.len()));
        let mut seen: HashSet<ItemId> = HashSet::with_capacity(ids.len().min(target.saturating_mul(2)));
        let mut cursor = 0;
        let mut round = 0;

        while stories.len() < target && cursor < ids.len() {
            round += 1;
            let requested = self.batch_size(target - stories.len()).min(ids.len() - cursor);
            let window = &ids[cursor..cursor + requested];

            let mut hits: Vec<RankedStory> = Vec::new();
            let mut misses: Vec<(ItemId, usize)> = Vec::new();
            for (offset, &id) in window.iter().enumerate() {
                if !seen.insert(id) {
                    continue;
                }
                let rank = cursor + offset;
                match cache.and_then(|c| c.lookup(id)) {
                    Some(story) => hits.push(RankedStory { rank, story }),
                    None => misses.push((id, rank)),
                }
            }

            let hit_count = hits.len();
            let mut found = collector::collect(&self.pool, &misses).await;
            let fetched = found.len();
            found.append(&mut hits);
            found.sort_by_key(|r| r.rank);

            tracing::debug!(
                round,
                cursor,
                requested,
                hits = hit_count,
                fetched,
                "Aggregation round complete"
            );

            stories.extend(found.into_iter().map(|r| r.story));
            // Advance even when nothing qualified, so exhaustion always terminates
            cursor += requested;
        }

        if stories.len() < target {
            tracing::debug!(
                found = stories.len(),
                target,
                scanned = cursor,
                "Ranked list exhausted before target"
            );
        }

        stories.truncate(target);
        stories
    }
}
