//! Periodic snapshot rebuilding
//!
//! The refresher rebuilds the top-stories snapshot on a fixed period so the
//! serving path normally finds a fresh list and never waits on the feed.
//!
//! # Example
//!
//! ```no_run
//! use quiet_hn::{Config, TopStories};
//! use quiet_hn::refresher::SnapshotRefresher;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> quiet_hn::Result<()> {
//! let config = Config::default();
//! let period = config.cache.ttl;
//! let service = Arc::new(TopStories::new(config)?);
//!
//! let cancel = CancellationToken::new();
//! let handle = SnapshotRefresher::spawn(service.clone(), period, cancel.clone());
//!
//! // ... later
//! cancel.cancel();
//! let _ = handle.await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::service::TopStories;

/// Background task that rebuilds the snapshot every `period`
pub struct SnapshotRefresher {
    /// Service whose snapshot is rebuilt
    service: Arc<TopStories>,

    /// Time between rebuilds
    period: Duration,

    /// Stops the loop when cancelled
    cancel_token: CancellationToken,
}

impl SnapshotRefresher {
    /// Creates a new refresher
    pub fn new(service: Arc<TopStories>, period: Duration, cancel_token: CancellationToken) -> Self {
        Self {
            service,
            period,
            cancel_token,
        }
    }

    /// Creates a refresher and runs it on a new task
    pub fn spawn(
        service: Arc<TopStories>,
        period: Duration,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(Self::new(service, period, cancel_token).run())
    }

    /// Runs the refresh loop until cancelled
    ///
    /// The first rebuild happens immediately. Ticks missed while a rebuild
    /// was running are skipped rather than replayed. A failed rebuild keeps
    /// the previous snapshot, which simply expires if the feed stays down.
    pub async fn run(self) {
        info!(period_secs = self.period.as_secs_f64(), "Snapshot refresher started");

        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => break,
                _ = interval.tick() => {}
            }

            let started = tokio::time::Instant::now();
            match self.service.refresh().await {
                Ok(stories) => debug!(
                    stories,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Snapshot refreshed"
                ),
                Err(e) => warn!(error = %e, "Snapshot refresh failed, keeping previous snapshot"),
            }
        }

        info!("Snapshot refresher stopped");
    }
}
