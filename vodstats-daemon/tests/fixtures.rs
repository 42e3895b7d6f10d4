//! Test fixtures for integration tests.
//!
//! This module provides reusable video data and helpers for driving the
//! router in-process.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use provider_fixture::FixtureVideoSource;
use std::sync::Arc;
use tower::ServiceExt;
use vodstats_core::{VideoRecord, VideoSource};
use vodstats_daemon::api::{router, AppState};
use vodstats_daemon::stats::StatsService;

/// Channel populated by [`fixture_source`].
pub const CHANNEL: &str = "12345";

/// Two videos whose stats are easy to check by hand.
pub fn two_videos() -> Vec<VideoRecord> {
    vec![
        VideoRecord::new("Vid1", 100, "10m"),
        VideoRecord::new("Vid2", 200, "20m"),
    ]
}

/// A fixture source with [`two_videos`] under [`CHANNEL`].
pub fn fixture_source() -> FixtureVideoSource {
    FixtureVideoSource::new().with_channel(CHANNEL, two_videos())
}

/// A router over `source` accepting `n` up to `max_videos`.
pub fn router_with(source: impl VideoSource + 'static, max_videos: u32) -> Router {
    router(AppState::new(StatsService::new(Arc::new(source)), max_videos))
}

/// Issue a GET against `router` and return the status and body text.
pub async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");

    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    (status, String::from_utf8_lossy(&body).into_owned())
}
