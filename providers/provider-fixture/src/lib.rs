//! # provider-fixture
//!
//! A video source that serves static fixture data from memory.
//!
//! It never touches the network, which makes it the source of choice for
//! integration tests and for running the daemon without Twitch credentials.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;
use vodstats_core::prelude::*;

/// Channel id populated by [`FixtureVideoSource::sample`].
pub const SAMPLE_CHANNEL: &str = "fixture-channel";

/// A video source backed by an in-memory map of channel id to videos.
#[derive(Debug, Clone, Default)]
pub struct FixtureVideoSource {
    channels: HashMap<String, Vec<VideoRecord>>,
}

impl FixtureVideoSource {
    /// Create an empty fixture source. Every channel lists zero videos.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `videos` for `channel_id`, newest first.
    pub fn with_channel(mut self, channel_id: impl Into<String>, videos: Vec<VideoRecord>) -> Self {
        self.channels.insert(channel_id.into(), videos);
        self
    }

    /// A source with one populated channel, [`SAMPLE_CHANNEL`].
    pub fn sample() -> Self {
        Self::new().with_channel(
            SAMPLE_CHANNEL,
            vec![
                VideoRecord::new("Speedrun practice", 1_500, "2h30m"),
                VideoRecord::new("Community game night", 4_200, "3h8m33s"),
                VideoRecord::new("Patch notes reaction", 900, "45m"),
                VideoRecord::new("Short clip compilation", 300, "9m59s"),
                VideoRecord::new("Charity marathon", 12_000, "8h"),
            ],
        )
    }
}

#[async_trait]
impl VideoSource for FixtureVideoSource {
    fn id(&self) -> &'static str {
        "fixture"
    }

    fn name(&self) -> &'static str {
        "Fixture"
    }

    async fn fetch_videos(&self, channel_id: &str, limit: u32) -> Result<Vec<VideoRecord>> {
        let videos = self
            .channels
            .get(channel_id)
            .map(|videos| {
                let take = usize::try_from(limit).unwrap_or(usize::MAX);
                videos.iter().take(take).cloned().collect::<Vec<_>>()
            })
            .unwrap_or_default();

        debug!(channel_id, limit, count = videos.len(), "served fixture videos");
        Ok(videos)
    }
}
