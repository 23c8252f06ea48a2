//! Route handlers for the REST API
//!
//! - [`stories`] - The top stories list
//! - [`system`] - Health and OpenAPI

use serde::{Deserialize, Serialize};

mod stories;
mod system;

pub use stories::*;
pub use system::*;

/// Largest `limit` accepted by `GET /stories`
pub const MAX_STORIES_LIMIT: usize = 500;

/// Query parameters for GET /stories
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StoriesQuery {
    /// Number of stories to return, 1 to 500 (default: `fetch.num_stories`)
    pub limit: Option<usize>,
}

/// Response body for GET /stories
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StoriesResponse {
    /// Stories in feed rank order; may be shorter than requested
    pub stories: Vec<crate::types::Story>,
    /// Time spent producing the list, in milliseconds
    pub elapsed_ms: u64,
}

/// Response body for GET /health
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// Always "ok" while the server is answering
    pub status: String,
    /// Crate version
    pub version: String,
    /// Active cache strategy ("snapshot" or "ttl")
    pub cache_strategy: String,
    /// Stories currently held by the cache
    pub cached_stories: usize,
}
