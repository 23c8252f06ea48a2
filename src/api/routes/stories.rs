//! Top stories handler.

use super::{MAX_STORIES_LIMIT, StoriesQuery, StoriesResponse};
use crate::api::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::time::Instant;

/// GET /stories - Top linked stories in rank order
#[utoipa::path(
    get,
    path = "/stories",
    tag = "stories",
    params(StoriesQuery),
    responses(
        (status = 200, description = "Top stories, best first", body = StoriesResponse),
        (status = 400, description = "Invalid limit", body = ApiError),
        (status = 502, description = "Ranked story list unavailable", body = ApiError),
        (status = 503, description = "Service shutting down", body = ApiError)
    )
)]
pub async fn list_stories(
    State(state): State<AppState>,
    Query(query): Query<StoriesQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(state.config.fetch.num_stories);
    if limit == 0 || limit > MAX_STORIES_LIMIT {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation(format!(
                "limit must be between 1 and {MAX_STORIES_LIMIT}, got {limit}"
            ))),
        )
            .into_response();
    }

    let started = Instant::now();
    match state.service.get_top_stories(limit).await {
        Ok(stories) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            tracing::debug!(limit, returned = stories.len(), elapsed_ms, "Served top stories");
            (StatusCode::OK, Json(StoriesResponse { stories, elapsed_ms })).into_response()
        }
        Err(e) => {
            tracing::warn!(limit, error = %e, "Failed to serve top stories");
            e.into_response()
        }
    }
}
