//! Core types for quiet-hn

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::LookupError;

/// Identifier of an item in the ranked feed
///
/// The order in which the feed returns IDs defines their rank.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    ToSchema,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Create a new ItemId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ItemId> for u64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Item detail as returned by the lookup service
///
/// Field names follow the feed's JSON. Everything except `id` is optional on
/// the wire, so missing fields fall back to their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Item ID
    pub id: ItemId,

    /// Item kind ("story", "comment", "job", "poll", ...)
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Destination URL, absent for text posts
    #[serde(default)]
    pub url: Option<String>,

    /// Author username
    #[serde(default)]
    pub by: String,

    /// Headline
    #[serde(default)]
    pub title: String,

    /// Score
    #[serde(default)]
    pub score: i64,

    /// Creation time (unix seconds)
    #[serde(default)]
    pub time: i64,

    /// Total comment count
    #[serde(default)]
    pub descendants: i64,

    /// Direct child IDs
    #[serde(default)]
    pub kids: Vec<ItemId>,

    /// Body text (HTML) for text posts and comments
    #[serde(default)]
    pub text: Option<String>,
}

impl ItemRecord {
    /// Whether this record is a story that links somewhere
    pub fn is_story_link(&self) -> bool {
        self.kind == "story" && self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// A qualifying story: a linked "story" item plus derived display fields
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Story {
    /// Item ID
    #[schema(value_type = u64)]
    pub id: ItemId,
    /// Headline
    pub title: String,
    /// Author username
    pub by: String,
    /// Destination URL (never empty)
    pub url: String,
    /// Host of `url` with a leading "www." removed
    pub host: String,
    /// Score
    pub score: i64,
    /// Comment count
    pub descendants: i64,
    /// Creation time (unix seconds)
    pub time: i64,
    /// When this story was resolved from the lookup service
    pub observed_at: DateTime<Utc>,
}

impl Story {
    /// Build a story from a fetched record
    ///
    /// Returns `None` unless the record is a "story" with a URL that has a
    /// host.
    pub fn from_record(record: ItemRecord, observed_at: DateTime<Utc>) -> Option<Self> {
        if !record.is_story_link() {
            return None;
        }
        let url = record.url?;
        let host = host_of(&url)?;

        Some(Self {
            id: record.id,
            title: record.title,
            by: record.by,
            url,
            host,
            score: record.score,
            descendants: record.descendants,
            time: record.time,
            observed_at,
        })
    }
}

/// Extract the host of a URL, stripping a leading "www."
///
/// Returns `None` for unparsable URLs and URLs without a host.
pub fn host_of(raw_url: &str) -> Option<String> {
    let parsed = url::Url::parse(raw_url).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Channel on which a worker reports the outcome of a job
pub type ReplySender = tokio::sync::mpsc::Sender<FetchResult>;

/// A single lookup request handed to the worker pool
#[derive(Debug)]
pub struct FetchJob {
    /// Item to resolve
    pub id: ItemId,
    /// Rank position of the item in the caller's ID list
    pub rank: usize,
    /// Reply conduit owned by the batch that submitted the job
    pub reply: ReplySender,
}

/// Outcome of one [`FetchJob`]
#[derive(Debug)]
pub struct FetchResult {
    /// Rank position copied from the job
    pub rank: usize,
    /// Item that was looked up
    pub id: ItemId,
    /// The fetched record or the lookup failure
    pub outcome: Result<ItemRecord, LookupError>,
}

/// A story tagged with the rank it was found at in the current request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedStory {
    /// Position of the originating ID in the ranked list
    pub rank: usize,
    /// The story
    pub story: Story,
}
