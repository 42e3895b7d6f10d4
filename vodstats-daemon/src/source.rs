//! Video source construction from configuration.

use crate::config::{Config, SourceKind};
use anyhow::{Context, Result};
use provider_fixture::FixtureVideoSource;
use provider_twitch::{TwitchConfig, TwitchVideoSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vodstats_core::VideoSource;

/// Build the video source selected by `config.source.kind`.
pub fn build_source(config: &Config) -> Result<Arc<dyn VideoSource>> {
    let source: Arc<dyn VideoSource> = match config.source.kind {
        SourceKind::Twitch => {
            let settings = &config.twitch;
            let twitch = TwitchConfig {
                client_id: settings.client_id.clone(),
                client_secret: settings.client_secret.clone(),
                videos_url: settings.videos_url.clone(),
                token_url: settings.token_url.clone(),
                request_timeout: Duration::from_secs(settings.request_timeout_secs),
            };
            Arc::new(TwitchVideoSource::new(twitch).context("Failed to create Twitch source")?)
        }
        SourceKind::Fixture => Arc::new(FixtureVideoSource::sample()),
    };

    info!("Using video source: {} ({})", source.name(), source.id());
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_fixture_source() {
        let mut config = Config::default();
        config.source.kind = SourceKind::Fixture;
        assert_eq!(build_source(&config).unwrap().id(), "fixture");
    }

    #[test]
    fn test_build_twitch_source() {
        let mut config = Config::default();
        config.twitch.client_id = "id".to_string();
        config.twitch.client_secret = "secret".to_string();
        assert_eq!(build_source(&config).unwrap().id(), "twitch");
    }
}
