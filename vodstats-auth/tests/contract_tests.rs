//! Contract tests for the client-credentials refresher.
//!
//! These tests run the refresher and the credential manager against a local
//! mock identity service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Form, Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use vodstats_auth::{
    AuthError, ClientCredentialsRefresher, CredentialManager, CredentialManagerConfig,
    ManualClock, RefreshStrategy,
};

// ============================================================================
// Mock Server Helpers
// ============================================================================

#[derive(Clone, Default)]
struct IdentityState {
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
    hits: Arc<AtomicUsize>,
}

/// Serve `router` on an ephemeral localhost port and return the token URL.
async fn start_mock_identity(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("mock identity service failed");
    });

    format!("http://{addr}/oauth2/token")
}

async fn issue_token(
    State(state): State<IdentityState>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().unwrap().push(form);
    // Slow enough that concurrent callers overlap.
    tokio::time::sleep(Duration::from_millis(25)).await;
    Json(json!({
        "access_token": "mock-token",
        "expires_in": 60,
        "token_type": "bearer"
    }))
}

fn identity_router(state: IdentityState) -> Router {
    Router::new()
        .route("/oauth2/token", post(issue_token))
        .with_state(state)
}

fn refresher(token_url: &str) -> ClientCredentialsRefresher {
    ClientCredentialsRefresher::new(reqwest::Client::new(), "fake-client-id", "fake-secret")
        .with_token_url(token_url)
}

// ============================================================================
// Refresher Tests
// ============================================================================

#[tokio::test]
async fn test_refresher_posts_client_credentials() {
    let state = IdentityState::default();
    let token_url = start_mock_identity(identity_router(state.clone())).await;

    let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    let issued = refresher(&token_url)
        .with_clock(Arc::new(ManualClock::new(now)))
        .refresh()
        .await
        .unwrap();

    assert_eq!(issued.token, "mock-token");
    assert_eq!(issued.expires_at, now + chrono::Duration::seconds(60));

    let requests = state.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["client_id"], "fake-client-id");
    assert_eq!(requests[0]["client_secret"], "fake-secret");
    assert_eq!(requests[0]["grant_type"], "client_credentials");
}

#[tokio::test]
async fn test_refresher_reports_rejection() {
    let router = Router::new().route(
        "/oauth2/token",
        post(|| async { (StatusCode::BAD_REQUEST, "invalid client secret") }),
    );
    let token_url = start_mock_identity(router).await;

    let err = refresher(&token_url).refresh().await.unwrap_err();
    match err {
        AuthError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "invalid client secret");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refresher_reports_malformed_body() {
    let router = Router::new().route(
        "/oauth2/token",
        post(|| async { Json(json!({ "token": "wrong-shape" })) }),
    );
    let token_url = start_mock_identity(router).await;

    let err = refresher(&token_url).refresh().await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_refresher_unreachable_endpoint() {
    let err = refresher("http://127.0.0.1:1/oauth2/token")
        .refresh()
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Http(_)));
}

// ============================================================================
// Manager + Refresher
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_manager_issues_single_token_request_under_contention() {
    let state = IdentityState::default();
    let token_url = start_mock_identity(identity_router(state.clone())).await;

    let manager = Arc::new(CredentialManager::new(CredentialManagerConfig::new(
        Arc::new(refresher(&token_url)),
    )));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let manager = Arc::clone(&manager);
        handles.push(tokio::spawn(async move { manager.ensure_valid().await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "mock-token");
    }

    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
}
