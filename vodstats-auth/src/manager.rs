//! Cached bearer credential with single-flight refresh.

use crate::{AuthError, Clock, CredentialState, RefreshStrategy, Result, SystemClock};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Construction parameters for a [`CredentialManager`].
pub struct CredentialManagerConfig {
    /// Strategy invoked whenever the cached credential is expired.
    pub refresh_strategy: Arc<dyn RefreshStrategy>,
    /// Time source for expiry checks.
    pub clock: Arc<dyn Clock>,
    /// State the manager starts from. The default is already expired.
    pub initial_state: CredentialState,
}

impl CredentialManagerConfig {
    pub fn new(refresh_strategy: Arc<dyn RefreshStrategy>) -> Self {
        Self {
            refresh_strategy,
            clock: Arc::new(SystemClock),
            initial_state: CredentialState::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_initial_state(mut self, initial_state: CredentialState) -> Self {
        self.initial_state = initial_state;
        self
    }
}

/// Owns one cached credential and refreshes it when it expires.
///
/// A single lock covers the expiry check, the refresh call and the store of
/// the new state. Callers queued behind an in-flight refresh therefore see
/// the refreshed credential and return without refreshing again.
///
/// A failed refresh leaves the previous state in place. Every waiter that
/// then acquires the lock re-checks expiry and attempts its own refresh.
pub struct CredentialManager {
    state: Arc<Mutex<CredentialState>>,
    refresh_strategy: Arc<dyn RefreshStrategy>,
    clock: Arc<dyn Clock>,
}

impl CredentialManager {
    pub fn new(config: CredentialManagerConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(config.initial_state)),
            refresh_strategy: config.refresh_strategy,
            clock: config.clock,
        }
    }

    /// Return a token that is valid at the current instant, refreshing first
    /// if the cached one is expired.
    ///
    /// The refresh runs on its own task while holding the state lock, so it
    /// completes and commits even if the calling future is dropped.
    ///
    /// # Errors
    ///
    /// Returns the refresh strategy's error when a refresh was needed and
    /// failed.
    pub async fn ensure_valid(&self) -> Result<String> {
        let mut state = Arc::clone(&self.state).lock_owned().await;

        if !state.is_expired_at(self.clock.now()) {
            return Ok(state.token.clone());
        }

        debug!(expires_at = %state.expires_at, "credential expired, refreshing");

        let strategy = Arc::clone(&self.refresh_strategy);
        let refresh = tokio::spawn(async move {
            match strategy.refresh().await {
                Ok(fresh) => {
                    debug!(expires_at = %fresh.expires_at, "credential refreshed");
                    let token = fresh.token.clone();
                    *state = fresh;
                    Ok(token)
                }
                Err(e) => {
                    warn!(error = %e, "credential refresh failed");
                    Err(e)
                }
            }
        });

        refresh
            .await
            .map_err(|e| AuthError::Refresh(format!("refresh task did not complete: {e}")))?
    }

    /// Snapshot of the cached state.
    ///
    /// Waits for any in-flight refresh to commit.
    pub async fn state(&self) -> CredentialState {
        self.state.lock().await.clone()
    }
}
