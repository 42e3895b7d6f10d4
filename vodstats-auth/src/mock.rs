use crate::{AuthError, CredentialState, RefreshStrategy, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock refresh strategy for testing purposes.
///
/// Returns a configurable outcome without contacting an identity service
/// and counts how often it was invoked.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use vodstats_auth::{MockRefreshStrategy, RefreshStrategy};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let strategy = MockRefreshStrategy::issuing("test_token", Utc::now());
/// let state = strategy.refresh().await?;
/// assert_eq!(state.token, "test_token");
/// assert_eq!(strategy.calls(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MockRefreshStrategy {
    outcome: Mutex<std::result::Result<CredentialState, String>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockRefreshStrategy {
    /// A strategy that always issues `token` expiring at `expires_at`.
    pub fn issuing(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self::with_outcome(Ok(CredentialState::new(token, expires_at)))
    }

    /// A strategy that always fails with [`AuthError::Refresh`].
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Err(message.into()))
    }

    fn with_outcome(outcome: std::result::Result<CredentialState, String>) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep for `delay` before answering each refresh.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the outcome returned by subsequent refreshes.
    pub fn set_outcome(&self, outcome: std::result::Result<CredentialState, String>) {
        *self.outcome.lock().unwrap_or_else(|e| e.into_inner()) = outcome;
    }

    /// Number of refreshes started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshStrategy for MockRefreshStrategy {
    async fn refresh(&self) -> Result<CredentialState> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self
            .outcome
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        outcome.map_err(AuthError::Refresh)
    }
}
