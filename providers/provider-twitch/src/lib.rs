//! # provider-twitch
//!
//! Twitch video source for vodstats using the Helix API.
//!
//! Every listing request carries the application client id and a bearer
//! token obtained through a [`CredentialManager`]. The default manager
//! performs the OAuth client-credentials grant against the Twitch identity
//! service and caches the token until it expires.
//!
//! ## API Reference
//!
//! - [Get Videos](https://dev.twitch.tv/docs/api/reference/#get-videos)
//! - [Client credentials grant](https://dev.twitch.tv/docs/authentication/getting-tokens-oauth/#client-credentials-grant-flow)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use vodstats_auth::{ClientCredentialsRefresher, CredentialManager, CredentialManagerConfig};
use vodstats_core::prelude::*;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum TwitchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to obtain access token: {0}")]
    AuthError(String),

    #[error("Helix API returned status {0}")]
    ApiError(u16),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<TwitchError> for FetchError {
    fn from(err: TwitchError) -> Self {
        match err {
            TwitchError::HttpError(e) => FetchError::Transport(e.to_string()),
            TwitchError::AuthError(e) => FetchError::CredentialFailure(e),
            TwitchError::ApiError(code) => FetchError::UpstreamStatus { code },
            TwitchError::ParseError(e) => FetchError::DecodeFailure(e),
        }
    }
}

// ============================================================================
// Helix Response Types
// ============================================================================

/// One page of the Get Videos listing. Only `data` is consumed; pagination
/// is not followed because a single page holds up to 100 entries.
#[derive(Debug, Deserialize)]
struct VideoPage {
    data: Vec<VideoRecord>,
}

fn parse_page(body: &[u8]) -> std::result::Result<Vec<VideoRecord>, TwitchError> {
    serde_json::from_slice::<VideoPage>(body)
        .map(|page| page.data)
        .map_err(|e| TwitchError::ParseError(e.to_string()))
}

// ============================================================================
// Configuration
// ============================================================================

/// Connection settings for the Twitch source.
#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub client_id: String,
    pub client_secret: String,
    pub videos_url: String,
    pub token_url: String,
    /// Bounds each HTTP request, including token requests.
    pub request_timeout: Duration,
}

impl TwitchConfig {
    pub const DEFAULT_VIDEOS_URL: &'static str = "https://api.twitch.tv/helix/videos";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            videos_url: Self::DEFAULT_VIDEOS_URL.to_string(),
            token_url: ClientCredentialsRefresher::DEFAULT_TOKEN_URL.to_string(),
            request_timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

// ============================================================================
// Twitch Source Implementation
// ============================================================================

/// Video source backed by the Twitch Helix API.
pub struct TwitchVideoSource {
    client: Client,
    videos_url: String,
    client_id: String,
    credentials: Arc<CredentialManager>,
}

impl TwitchVideoSource {
    /// Create a source that obtains tokens through the client-credentials
    /// grant with the configured id and secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: TwitchConfig) -> std::result::Result<Self, TwitchError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        let refresher = ClientCredentialsRefresher::new(
            client.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        )
        .with_token_url(config.token_url.clone());
        let credentials = CredentialManager::new(CredentialManagerConfig::new(Arc::new(refresher)));

        Ok(Self::with_credentials(config, client, Arc::new(credentials)))
    }

    /// Create a source around an existing HTTP client and credential manager.
    ///
    /// The credential manager is shared, not copied; every request made by
    /// this source goes through its cache.
    pub fn with_credentials(
        config: TwitchConfig,
        client: Client,
        credentials: Arc<CredentialManager>,
    ) -> Self {
        Self {
            client,
            videos_url: config.videos_url,
            client_id: config.client_id,
            credentials,
        }
    }

    async fn list_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> std::result::Result<Vec<VideoRecord>, TwitchError> {
        let token = self
            .credentials
            .ensure_valid()
            .await
            .map_err(|e| TwitchError::AuthError(e.to_string()))?;

        let first = limit.to_string();
        debug!(channel_id, first = %first, "listing videos");

        let response = self
            .client
            .get(&self.videos_url)
            .header("Client-Id", &self.client_id)
            .bearer_auth(&token)
            .query(&[("user_id", channel_id), ("first", first.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(channel_id, status = status.as_u16(), "video listing rejected");
            return Err(TwitchError::ApiError(status.as_u16()));
        }

        let body = response.bytes().await?;
        let videos = parse_page(&body)?;
        debug!(channel_id, count = videos.len(), "listed videos");
        Ok(videos)
    }
}

#[async_trait]
impl VideoSource for TwitchVideoSource {
    fn id(&self) -> &'static str {
        "twitch"
    }

    fn name(&self) -> &'static str {
        "Twitch"
    }

    async fn fetch_videos(&self, channel_id: &str, limit: u32) -> Result<Vec<VideoRecord>> {
        self.list_videos(channel_id, limit)
            .await
            .map_err(FetchError::from)
    }
}

// ============================================================================
// Tests
// ============================================================================
