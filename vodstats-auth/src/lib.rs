//! # vodstats-auth
//!
//! Bearer credential management for the upstream video platform.
//!
//! This crate provides:
//! - [`CredentialManager`] - Caches one credential and refreshes it on expiry
//! - [`RefreshStrategy`] - Trait for components that can issue a new credential
//! - [`ClientCredentialsRefresher`] - OAuth client-credentials grant over HTTP
//! - [`Clock`] - Time source, with [`SystemClock`] and [`ManualClock`]
//! - [`MockRefreshStrategy`] - Scripted strategy for testing
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vodstats_auth::{
//!     ClientCredentialsRefresher, CredentialManager, CredentialManagerConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let refresher = ClientCredentialsRefresher::new(reqwest::Client::new(), "id", "secret");
//! let manager = CredentialManager::new(CredentialManagerConfig::new(Arc::new(refresher)));
//!
//! let token = manager.ensure_valid().await?;
//! println!("token is {} bytes long", token.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

mod clock;
mod manager;
mod mock;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{CredentialManager, CredentialManagerConfig};
pub use mock::MockRefreshStrategy;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token endpoint returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    #[error("Credential refresh failed: {0}")]
    Refresh(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

// ============================================================================
// Credential Types
// ============================================================================

/// A bearer token together with the instant it stops being valid.
///
/// The default value has an empty token and an expiry at the earliest
/// representable instant, so it always reads as expired.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialState {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl CredentialState {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Expired means `now >= expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl Default for CredentialState {
    fn default() -> Self {
        Self {
            token: String::new(),
            expires_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

impl fmt::Debug for CredentialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialState")
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Body of a successful client-credentials token response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
}

// ============================================================================
// RefreshStrategy Trait
// ============================================================================

/// Trait for components that can obtain a fresh credential.
///
/// [`CredentialManager`] calls this only while holding its state lock, so an
/// implementation never sees two concurrent calls from the same manager.
#[async_trait]
pub trait RefreshStrategy: Send + Sync {
    /// Obtain a new token and the absolute instant it expires.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity service is unreachable or rejects
    /// the request.
    async fn refresh(&self) -> Result<CredentialState>;
}

// ============================================================================
// Client Credentials Implementation
// ============================================================================

/// Refresh strategy that performs an OAuth client-credentials grant.
///
/// The expiry is computed from `expires_in` relative to the clock reading
/// taken once the token response has arrived.
pub struct ClientCredentialsRefresher {
    client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    clock: Arc<dyn Clock>,
}

impl ClientCredentialsRefresher {
    pub const DEFAULT_TOKEN_URL: &'static str = "https://id.twitch.tv/oauth2/token";

    /// Create a refresher for the default Twitch identity endpoint.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client; its timeout bounds each refresh
    /// * `client_id` - Application client identifier
    /// * `client_secret` - Application client secret
    pub fn new(
        client: reqwest::Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: Self::DEFAULT_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Override the identity endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Override the clock used to compute expiry instants.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Request a new token from the identity endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request cannot be sent
    /// - The endpoint answers with a non-success status
    /// - The body is not a valid token response
    pub async fn request_token(&self) -> Result<TokenResponse> {
        debug!(token_url = %self.token_url, "requesting client credentials token");

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl RefreshStrategy for ClientCredentialsRefresher {
    async fn refresh(&self) -> Result<CredentialState> {
        let response = self.request_token().await?;
        let now = self.clock.now();

        let expires_at = i64::try_from(response.expires_in)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthError::InvalidResponse(format!(
                    "expires_in out of range: {}",
                    response.expires_in
                ))
            })?;

        debug!(
            token_type = %response.token_type,
            expires_in = response.expires_in,
            "issued client credentials token"
        );

        Ok(CredentialState::new(response.access_token, expires_at))
    }
}

// ============================================================================
// Tests
// ============================================================================
