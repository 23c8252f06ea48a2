//! Application state for the API server

use crate::{Config, TopStories};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clones).
#[derive(Clone)]
pub struct AppState {
    /// The story service
    pub service: Arc<TopStories>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service: Arc<TopStories>, config: Arc<Config>) -> Self {
        Self { service, config }
    }
}
