//! HTTP API handlers for the vodstats daemon.
//!
//! Error responses are plain text bodies whose wording clients match on.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use vodstats_core::{StatsError, VideoStatsSummary};

use crate::stats::StatsService;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub stats: Arc<StatsService>,
    /// Largest accepted `n`.
    pub max_videos: u32,
}

impl AppState {
    pub fn new(stats: StatsService, max_videos: u32) -> Self {
        Self {
            stats: Arc::new(stats),
            max_videos,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    InvalidCount,
    NoVideos,
    Internal(String),
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::NoVideos => ApiError::NoVideos,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidCount => (
                StatusCode::BAD_REQUEST,
                "Invalid query parameter 'n'".to_string(),
            ),
            ApiError::NoVideos => (StatusCode::NOT_FOUND, StatsError::NoVideos.to_string()),
            ApiError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get video stats: {e}"),
            ),
        };

        (status, message).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Value of the first `n` pair in the query string, if any.
fn first_count(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(key, _)| key == "n")
        .map(|(_, value)| value.as_str())
}

/// Parse `n` as an integer in `1..=max`.
fn parse_count(raw: Option<&str>, max: u32) -> Result<u32, ApiError> {
    raw.and_then(|n| n.parse::<u32>().ok())
        .filter(|n| (1..=max).contains(n))
        .ok_or(ApiError::InvalidCount)
}

/// `GET /streamers/{channel_id}/videos?n=<count>`
pub async fn get_video_stats(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<VideoStatsSummary>, ApiError> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let n = first_count(&pairs);
    let count = parse_count(n, state.max_videos).inspect_err(|_| {
        debug!(channel_id = %channel_id, n = ?n, "rejected video count");
    })?;

    let summary = state.stats.get_stats(&channel_id, count).await?;
    info!(
        channel_id = %channel_id,
        count,
        total_views = summary.total_views,
        "served video stats"
    );
    Ok(Json(summary))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "source": state.stats.source_id(),
    }))
}
