//! The top-stories service: ranked feed, worker pool, aggregator and cache
//! wired together behind one entry point.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::aggregator::Aggregator;
use crate::cache::{Snapshot, SnapshotCache, StoryCache, TtlCache};
use crate::config::{CacheStrategy, Config};
use crate::error::{Error, Result};
use crate::pool::WorkerPool;
use crate::refresher::SnapshotRefresher;
use crate::source::{HnClient, ItemSource};
use crate::types::{ItemId, Story};

/// The configured cache, owned by the service
enum Cache {
    Snapshot(SnapshotCache),
    Ttl(TtlCache),
}

impl Cache {
    fn from_config(config: &Config) -> Self {
        match config.cache.strategy {
            CacheStrategy::Snapshot => {
                Cache::Snapshot(SnapshotCache::new(config.cache.capacity, config.cache.ttl))
            }
            CacheStrategy::Ttl => Cache::Ttl(TtlCache::new(config.cache.capacity, config.cache.ttl)),
        }
    }

    fn as_story_cache(&self) -> &dyn StoryCache {
        match self {
            Cache::Snapshot(cache) => cache,
            Cache::Ttl(cache) => cache,
        }
    }
}

/// Serves the current top linked stories of the feed
///
/// One instance owns one worker pool and one cache; share it behind an
/// [`Arc`]. Any number of callers may request stories concurrently.
///
/// # Example
///
/// ```no_run
/// use quiet_hn::{Config, TopStories};
///
/// # async fn example() -> quiet_hn::Result<()> {
/// let service = TopStories::new(Config::default())?;
/// for story in service.get_top_stories(10).await? {
///     println!("{} ({})", story.title, story.host);
/// }
/// service.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct TopStories {
    config: Config,
    source: Arc<dyn ItemSource>,
    pool: WorkerPool,
    aggregator: Aggregator,
    cache: Cache,
    cancel_token: CancellationToken,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl TopStories {
    /// Build a service talking to the feed named in `config.feed`
    ///
    /// Must be called from within a tokio runtime, since the worker pool is
    /// started immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = HnClient::new(&config.feed)?;
        Self::with_source(config, Arc::new(client))
    }

    /// Build a service on top of a custom [`ItemSource`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_source(config: Config, source: Arc<dyn ItemSource>) -> Result<Self> {
        config.validate()?;

        let pool = WorkerPool::start(
            config.fetch.worker_count,
            config.fetch.queue_capacity,
            Arc::clone(&source),
        );
        let aggregator = Aggregator::new(pool.clone(), config.fetch.overfetch_factor);
        let cache = Cache::from_config(&config);

        tracing::info!(
            strategy = ?config.cache.strategy,
            workers = config.fetch.worker_count,
            num_stories = config.fetch.num_stories,
            "Top stories service ready"
        );

        Ok(Self {
            config,
            source,
            pool,
            aggregator,
            cache,
            cancel_token: CancellationToken::new(),
            refresher: Mutex::new(None),
        })
    }

    /// The configuration the service was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The cache backing this service
    pub fn cache(&self) -> &dyn StoryCache {
        self.cache.as_story_cache()
    }

    /// Return up to `num_stories` linked stories in feed rank order
    ///
    /// Fewer stories than requested is a normal outcome when the feed does
    /// not hold enough qualifying items.
    ///
    /// # Errors
    ///
    /// - [`Error::Aggregation`] if the ranked list could not be loaded
    /// - [`Error::ShuttingDown`] after [`shutdown`](Self::shutdown)
    pub async fn get_top_stories(&self, num_stories: usize) -> Result<Vec<Story>> {
        if self.cancel_token.is_cancelled() {
            return Err(Error::ShuttingDown);
        }
        if num_stories == 0 {
            return Ok(Vec::new());
        }

        match &self.cache {
            Cache::Snapshot(snapshots) => {
                if let Some(snapshot) = snapshots.load()
                    && snapshot.target() >= num_stories
                {
                    tracing::debug!(
                        num_stories,
                        age_ms = snapshot.age().as_millis() as u64,
                        "Serving from snapshot"
                    );
                    return Ok(first(snapshot.stories(), num_stories));
                }

                let target = num_stories.max(self.config.fetch.num_stories);
                let snapshot = self.rebuild_snapshot(snapshots, target).await?;
                Ok(first(snapshot.stories(), num_stories))
            }
            Cache::Ttl(cache) => self.fill_through(cache, num_stories).await,
        }
    }

    /// Rebuild the cached top list for the configured story count
    ///
    /// With the snapshot strategy this replaces the snapshot; with the TTL
    /// strategy it purges and re-warms the cache. On failure the cache is
    /// left as it was. Returns the number of stories now cached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aggregation`] if the ranked list could not be loaded.
    pub async fn refresh(&self) -> Result<usize> {
        if self.cancel_token.is_cancelled() {
            return Err(Error::ShuttingDown);
        }
        let target = self.config.fetch.num_stories;

        match &self.cache {
            Cache::Snapshot(snapshots) => {
                let snapshot = self.rebuild_snapshot(snapshots, target).await?;
                Ok(snapshot.stories().len())
            }
            Cache::Ttl(cache) => {
                self.fill_through(cache, target).await?;
                Ok(cache.len())
            }
        }
    }

    /// Start refreshing the snapshot every `cache.ttl`
    ///
    /// Returns `false` (and does nothing) for the TTL strategy or when a
    /// refresher is already running.
    pub fn start_refresher(self: &Arc<Self>) -> bool {
        if !matches!(self.cache, Cache::Snapshot(_)) {
            return false;
        }

        let mut slot = self.refresher.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        *slot = Some(SnapshotRefresher::spawn(
            Arc::clone(self),
            self.config.cache.ttl,
            self.cancel_token.child_token(),
        ));
        true
    }

    /// Stop the refresher and the worker pool
    ///
    /// Subsequent requests fail with [`Error::ShuttingDown`].
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();

        let refresher = self
            .refresher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = refresher
            && let Err(e) = handle.await
        {
            tracing::error!(error = %e, "Snapshot refresher task failed");
        }

        self.pool.shutdown().await;
        tracing::info!("Top stories service stopped");
    }

    async fn rebuild_snapshot(
        &self,
        snapshots: &SnapshotCache,
        target: usize,
    ) -> Result<Arc<Snapshot>> {
        let ids = self.ranked_ids().await?;
        let stories = self.aggregator.fill(&ids, target, None).await;
        Ok(snapshots.store(stories, target))
    }

    async fn fill_through(&self, cache: &TtlCache, target: usize) -> Result<Vec<Story>> {
        cache.purge();
        let ids = self.ranked_ids().await?;
        let stories = self
            .aggregator
            .fill(&ids, target, Some(cache as &dyn StoryCache))
            .await;
        cache.insert(&stories);
        Ok(stories)
    }

    async fn ranked_ids(&self) -> Result<Vec<ItemId>> {
        self.source.top_items().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to load ranked story list");
            Error::Aggregation(e)
        })
    }
}

fn first(stories: &[Story], n: usize) -> Vec<Story> {
    stories.iter().take(n).cloned().collect()
}
