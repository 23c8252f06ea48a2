//! Ranked feed access.
//!
//! [`ItemSource`] is the seam between the aggregation engine and the remote
//! feed. [`HnClient`] talks to the Hacker News Firebase API; tests and
//! mirrors can supply their own implementation.

mod hn;

pub use hn::HnClient;

use async_trait::async_trait;

use crate::error::LookupError;
use crate::types::{ItemId, ItemRecord};

/// Remote feed exposing a ranked ID list and per-item details
///
/// Implementations must be safe to call from many workers at once. Each call
/// maps to one outbound request; retries are not expected.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Load the current ranking, best item first
    async fn top_items(&self) -> Result<Vec<ItemId>, LookupError>;

    /// Resolve one item
    async fn get_item(&self, id: ItemId) -> Result<ItemRecord, LookupError>;
}
