//! # vodstats-daemon
//!
//! Serves aggregate statistics over a channel's recent videos.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   vodstats-daemon                     │
//! │                                                       │
//! │  ┌─────────────┐   ┌──────────────┐   ┌────────────┐  │
//! │  │  HTTP API   │──▶│ StatsService │──▶│VideoSource │  │
//! │  └─────────────┘   └──────────────┘   └────────────┘  │
//! └───────────────────────────────────────────│──────────┘
//!                                              ▼
//!                         ┌────────────────────────────────┐
//!                         │ Twitch Helix + identity service │
//!                         └────────────────────────────────┘
//! ```
//!
//! ## Configuration
//!
//! The daemon reads configuration from `$XDG_CONFIG_HOME/vodstats/config.toml`
//! (or `$VODSTATS_CONFIG`). A `.env` file in the working directory is loaded
//! first, so `PORT`, `TWITCH_CLIENT_ID` and `TWITCH_CLIENT_SECRET` may live
//! there.
//!
//! ## Running
//!
//! ```bash
//! # Start the daemon
//! cargo run --bin vodstats-daemon
//!
//! # With debug logging
//! RUST_LOG=debug cargo run --bin vodstats-daemon
//! ```

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vodstats_daemon::api::{self, AppState};
use vodstats_daemon::config::Config;
use vodstats_daemon::source::build_source;
use vodstats_daemon::stats::StatsService;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is not an error
    let dotenv = dotenvy::dotenv();

    let config_path = Config::config_path()?;
    let created = Config::ensure_file(&config_path)?;
    let config = Config::load(&config_path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .context("Failed to build log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting vodstats-daemon v{}", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }
    if created {
        info!("Created default configuration file at: {}", config_path.display());
    }
    info!("Loaded configuration from {}", config_path.display());

    let source = build_source(&config)?;
    let state = AppState::new(StatsService::new(source), config.server.max_videos);

    api::start_server(config.bind_address()?, state).await?;

    info!("Daemon stopped");
    Ok(())
}
