//! # vodstats-core
//!
//! Core traits and types shared by every vodstats crate.
//!
//! This crate defines:
//!
//! - [`VideoRecord`] - A single video as returned by a video source
//! - [`VideoStatsSummary`] - The aggregate payload served to API clients
//! - [`VideoSource`] - The capability every video backend implements
//! - [`duration::parse_minutes`] - Compact elapsed-time parsing (`"1h5m30s"`)
//! - [`stats::summarize`] - Reduction of a video list into a summary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod duration;
pub mod stats;

// ============================================================================
// Error Types
// ============================================================================

/// Failure while fetching videos from a [`VideoSource`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The identity service could not be reached or rejected the request.
    #[error("Failed to obtain credentials: {0}")]
    CredentialFailure(String),

    /// The video listing service answered with a non-success status.
    #[error("Upstream API returned status {code}")]
    UpstreamStatus { code: u16 },

    /// The listing body did not have the expected shape.
    #[error("Failed to decode upstream response: {0}")]
    DecodeFailure(String),

    /// The listing request could not be sent or did not complete.
    #[error("Network error: {0}")]
    Transport(String),
}

/// Failure while computing statistics for a channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The source returned zero videos for the requested channel and limit.
    #[error("no videos found")]
    NoVideos,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, FetchError>;

// ============================================================================
// Video Types
// ============================================================================

/// A video entry as listed by the upstream platform.
///
/// `duration` is kept in the upstream's compact encoding (e.g. `"3h8m33s"`)
/// and only interpreted during aggregation. Fields absent from the upstream
/// payload fall back to their zero values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoRecord {
    pub title: String,
    pub view_count: u64,
    pub duration: String,
}

impl VideoRecord {
    pub fn new(title: impl Into<String>, view_count: u64, duration: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            view_count,
            duration: duration.into(),
        }
    }
}

/// Aggregate statistics over a channel's recent videos.
///
/// The serialized field names are part of the public API contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStatsSummary {
    pub total_views: u64,
    pub average_views: f64,
    pub total_duration_minutes: f64,
    #[serde(rename = "views_per_minute")]
    pub average_views_per_minute: f64,
    pub most_viewed_title: String,
    pub most_viewed_view_count: u64,
}

// ============================================================================
// Video Source Trait
// ============================================================================

/// A backend that can list a channel's recent videos.
///
/// Implementations return records in the order the backend produced them,
/// without filtering or deduplication. Callers guarantee `limit > 0`.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Unique identifier for this source type (e.g., "twitch", "fixture")
    fn id(&self) -> &'static str;

    /// Human-readable name for display
    fn name(&self) -> &'static str;

    /// Fetch up to `limit` recent videos for `channel_id`.
    async fn fetch_videos(&self, channel_id: &str, limit: u32) -> Result<Vec<VideoRecord>>;
}

// ============================================================================
// Re-exports
// ============================================================================

pub mod prelude {
    pub use crate::duration::parse_minutes;
    pub use crate::stats::summarize;
    pub use crate::{
        FetchError, Result, StatsError, VideoRecord, VideoSource, VideoStatsSummary,
    };
}
