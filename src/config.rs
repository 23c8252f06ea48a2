//! Configuration types for quiet-hn

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

use crate::error::{Error, Result};

/// Feed endpoint settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedConfig {
    /// API root serving `topstories.json` and `item/{id}.json`
    /// (default: "https://hacker-news.firebaseio.com/v0")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request HTTP timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Worker pool and over-fetch settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Number of lookup workers (default: 10)
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Capacity of the shared job queue; submission waits when full (default: 30)
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Multiplier applied to the remaining target when sizing a batch (default: 1.25)
    ///
    /// Models the share of ranked IDs that turn out not to be linked stories.
    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: f64,

    /// Number of stories served when a request doesn't ask for a count (default: 30)
    #[serde(default = "default_num_stories")]
    pub num_stories: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            queue_capacity: default_queue_capacity(),
            overfetch_factor: default_overfetch_factor(),
            num_stories: default_num_stories(),
        }
    }
}

/// How resolved stories are kept between requests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStrategy {
    /// Serve one immutable top list, rebuilt in the background every `ttl` (default)
    #[default]
    Snapshot,
    /// Keep up to `capacity` individual stories, each expiring after `ttl`
    Ttl,
}

/// Cache settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Refresh strategy (default: snapshot)
    #[serde(default)]
    pub strategy: CacheStrategy,

    /// Maximum number of stories held by the TTL cache (default: 40)
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Entry time-to-live, and the snapshot refresh period (default: 10 seconds)
    #[serde(default = "default_ttl", with = "duration_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            strategy: CacheStrategy::default(),
            capacity: default_cache_capacity(),
            ttl: default_ttl(),
        }
    }
}

/// HTTP API settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: false)
    #[serde(default)]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: false,
        }
    }
}

/// Main configuration for [`TopStories`](crate::TopStories)
///
/// Every section and field has a default, so an empty JSON object is a
/// valid configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Feed endpoint settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Worker pool and over-fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP API settings
    #[serde(default)]
    pub server: ApiConfig,
}

impl Config {
    /// Check that the configuration can drive a working service
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.worker_count == 0 {
            return Err(config_error("fetch.worker_count", "must be at least 1"));
        }
        if self.fetch.queue_capacity == 0 {
            return Err(config_error("fetch.queue_capacity", "must be at least 1"));
        }
        if !self.fetch.overfetch_factor.is_finite() || self.fetch.overfetch_factor < 1.0 {
            return Err(config_error(
                "fetch.overfetch_factor",
                "must be a finite number >= 1.0",
            ));
        }
        if self.fetch.num_stories == 0 {
            return Err(config_error("fetch.num_stories", "must be at least 1"));
        }
        if self.cache.capacity == 0 {
            return Err(config_error("cache.capacity", "must be at least 1"));
        }
        if self.cache.ttl.is_zero() {
            return Err(config_error("cache.ttl", "must be at least 1 second"));
        }
        if url::Url::parse(&self.feed.base_url).is_err() {
            return Err(config_error("feed.base_url", "must be an absolute URL"));
        }
        Ok(())
    }
}

fn config_error(key: &str, problem: &str) -> Error {
    Error::Config {
        message: format!("{key} {problem}"),
        key: Some(key.to_string()),
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://hacker-news.firebaseio.com/v0".into()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_worker_count() -> usize {
    10
}

fn default_queue_capacity() -> usize {
    30
}

fn default_overfetch_factor() -> f64 {
    1.25
}

fn default_num_stories() -> usize {
    30
}

fn default_cache_capacity() -> usize {
    40
}

fn default_ttl() -> Duration {
    Duration::from_secs(10)
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_true() -> bool {
    true
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
