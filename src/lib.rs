//! # quiet-hn
//!
//! Concurrent top-stories aggregator for a ranked item feed (Hacker News by
//! default).
//!
//! The feed publishes a ranked list of item IDs, most of which are not
//! linked stories. quiet-hn resolves IDs through a fixed pool of workers,
//! over-fetching in rounds until it has the requested number of linked
//! stories, and returns them in feed rank order regardless of which lookup
//! finished first. Results are cached either as one atomically swapped
//! snapshot or as individually expiring entries.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quiet_hn::{Config, TopStories};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = Arc::new(TopStories::new(Config::default())?);
//!     service.start_refresher();
//!
//!     for story in service.get_top_stories(30).await? {
//!         println!("{:>5}  {} ({})", story.score, story.title, story.host);
//!     }
//!
//!     service.shutdown().await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Over-fetching aggregation rounds
pub mod aggregator;
/// REST API module
pub mod api;
/// Story caches
pub mod cache;
/// Order-preserving batch collection
pub mod collector;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Lookup worker pool
pub mod pool;
/// Periodic snapshot refresh
pub mod refresher;
/// The top stories service
pub mod service;
/// Ranked feed access
pub mod source;
/// Core types
pub mod types;

#[cfg(test)]
mod test_helpers;

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use cache::{Snapshot, SnapshotCache, StoryCache, TtlCache};
pub use config::{CacheStrategy, Config};
pub use error::{ApiError, Error, ErrorDetail, LookupError, Result, ToHttpStatus};
pub use pool::WorkerPool;
pub use service::TopStories;
pub use source::{HnClient, ItemSource};
pub use types::{ItemId, ItemRecord, Story};

/// Helper function to run the service with graceful signal handling.
///
/// Waits for a termination signal and then calls the service's `shutdown()` method.
///
/// Listens for Ctrl+C everywhere and additionally for SIGTERM on Unix.
///
/// # Example
///
/// ```no_run
/// use quiet_hn::{Config, TopStories, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = Arc::new(TopStories::new(Config::default())?);
///     service.start_refresher();
///
///     // Run with automatic signal handling
///     run_with_shutdown(service).await;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(service: std::sync::Arc<TopStories>) {
    wait_for_signal().await;
    service.shutdown().await;
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // SIGTERM registration can fail in restricted environments; Ctrl+C still works
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for Ctrl+C only");
            wait_for_ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
