//! Channel statistics service.
//!
//! Fetches a channel's recent videos from the configured [`VideoSource`] and
//! reduces them into a [`VideoStatsSummary`].

use std::sync::Arc;
use tracing::{debug, warn};
use vodstats_core::prelude::*;

/// Computes video statistics on top of a shared video source.
#[derive(Clone)]
pub struct StatsService {
    source: Arc<dyn VideoSource>,
}

impl StatsService {
    pub fn new(source: Arc<dyn VideoSource>) -> Self {
        Self { source }
    }

    /// Identifier of the backing source.
    pub fn source_id(&self) -> &'static str {
        self.source.id()
    }

    /// Summarize up to `limit` of the channel's most recent videos.
    ///
    /// # Errors
    ///
    /// - [`StatsError::Fetch`] if the source fails
    /// - [`StatsError::NoVideos`] if the source lists nothing
    pub async fn get_stats(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> std::result::Result<VideoStatsSummary, StatsError> {
        let videos = self
            .source
            .fetch_videos(channel_id, limit)
            .await
            .inspect_err(|e| {
                warn!(source = self.source.id(), channel_id, error = %e, "video fetch failed")
            })?;

        debug!(channel_id, count = videos.len(), "summarizing videos");
        summarize(&videos)
    }
}
