//! Configuration file loading and management
//!
//! This module handles loading and parsing the daemon configuration from
//! `$XDG_CONFIG_HOME/vodstats/config.toml`, or from the path named by the
//! `VODSTATS_CONFIG` environment variable. If the configuration file doesn't
//! exist, a default configuration is created with documented comments.
//!
//! After the file is parsed, the `PORT`, `TWITCH_CLIENT_ID` and
//! `TWITCH_CLIENT_SECRET` environment variables override the matching
//! settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file path.
pub const CONFIG_PATH_ENV: &str = "VODSTATS_CONFIG";

/// Bind address used when neither the file nor `PORT` sets one.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Largest page the Helix videos endpoint will return.
pub const MAX_VIDEOS_LIMIT: u32 = 100;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Which video source backs the daemon
    pub source: SourceConfig,
    /// Twitch connection settings, used when `source.kind = "twitch"`
    pub twitch: TwitchSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the HTTP API
    /// Unset: `PORT` binds all interfaces, otherwise "127.0.0.1:8080"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    /// Default: "info"
    pub log_level: String,
    /// Largest accepted value of the `n` query parameter
    /// Default: 100
    pub max_videos: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Twitch,
    Fixture,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
}

/// Twitch application credentials and endpoints
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TwitchSettings {
    pub client_id: String,
    pub client_secret: String,
    pub videos_url: String,
    pub token_url: String,
    /// Per-request timeout in seconds
    /// Default: 10
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: None,
            log_level: "info".to_string(),
            max_videos: MAX_VIDEOS_LIMIT,
        }
    }
}

impl Default for TwitchSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            videos_url: "https://api.twitch.tv/helix/videos".to_string(),
            token_url: "https://id.twitch.tv/oauth2/token".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for TwitchSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("videos_url", &self.videos_url)
            .field("token_url", &self.token_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load configuration from the specified path
    ///
    /// Parses the file, applies environment overrides, then validates.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file without overrides or validation
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve the configuration file path
    ///
    /// Returns the value of `VODSTATS_CONFIG` if set, otherwise
    /// `$XDG_CONFIG_HOME/vodstats/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Self::default_config_path(),
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "raibid-labs", "vodstats")
            .context("Failed to determine project directories")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Write the default configuration file if `path` does not exist
    ///
    /// Returns `true` when a file was created.
    pub fn ensure_file(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config file: {}", path.display()))?;

        Ok(true)
    }

    /// Generate the default configuration file content with comments
    fn default_config_content() -> &'static str {
        r#"# vodstats Daemon Configuration

[server]
# Bind address for the HTTP API
# When set, the PORT environment variable replaces only its port.
# When unset, PORT alone binds all interfaces ("0.0.0.0:$PORT"),
# and without PORT the daemon listens on "127.0.0.1:8080".
# bind_address = "127.0.0.1:8080"

# Log level: trace, debug, info, warn, error
# RUST_LOG takes precedence when set
# Default: "info"
log_level = "info"

# Largest accepted value of the `n` query parameter (1-100)
# Default: 100
max_videos = 100

[source]
# Video source: "twitch" or "fixture"
# The fixture source serves built-in sample data and needs no credentials
kind = "twitch"

[twitch]
# Application credentials from https://dev.twitch.tv/console
# TWITCH_CLIENT_ID and TWITCH_CLIENT_SECRET override these
client_id = ""
client_secret = ""

videos_url = "https://api.twitch.tv/helix/videos"
token_url = "https://id.twitch.tv/oauth2/token"

# Timeout for each upstream request, in seconds
request_timeout_secs = 10
"#
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(port) = var("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("Invalid PORT: {port}"))?;
            let addr = match self.server.bind_address {
                Some(_) => {
                    let mut addr = self.bind_address()?;
                    addr.set_port(port);
                    addr
                }
                None => SocketAddr::from(([0, 0, 0, 0], port)),
            };
            self.server.bind_address = Some(addr.to_string());
        }

        if let Some(client_id) = var("TWITCH_CLIENT_ID") {
            self.twitch.client_id = client_id;
        }

        if let Some(client_secret) = var("TWITCH_CLIENT_SECRET") {
            self.twitch.client_secret = client_secret;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.bind_address()?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.server.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log_level: {}. Must be one of: {}",
                self.server.log_level,
                valid_log_levels.join(", ")
            );
        }

        if !(1..=MAX_VIDEOS_LIMIT).contains(&self.server.max_videos) {
            anyhow::bail!(
                "server.max_videos must be between 1 and {}",
                MAX_VIDEOS_LIMIT
            );
        }

        if self.twitch.request_timeout_secs == 0 {
            anyhow::bail!("twitch.request_timeout_secs must be greater than 0");
        }

        if self.source.kind == SourceKind::Twitch
            && (self.twitch.client_id.is_empty() || self.twitch.client_secret.is_empty())
        {
            anyhow::bail!("twitch credentials missing");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        let bind_address = self
            .server
            .bind_address
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDRESS);
        bind_address
            .parse()
            .with_context(|| format!("Invalid bind_address: {bind_address}"))
    }
}
