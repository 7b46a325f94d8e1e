//! Configuration system for xg.
//!
//! Layered configuration from multiple sources:
//!
//! 1. **Compiled defaults** - local Redis, colored output
//! 2. **User config file** - `~/.config/xg/config.toml`
//! 3. **Environment variables** - `XG_*` prefix (plus plain `REDIS_URL`)
//! 4. **CLI arguments** - Highest priority, always wins
//!
//! # Example Configuration File
//!
//! ```toml
//! [redis]
//! url = "redis://127.0.0.1:6379"
//! retries = 1
//!
//! [output]
//! colors = true
//! quiet = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Main configuration structure for xg.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backing-store connection configuration.
    pub redis: RedisConfig,
    /// Output formatting configuration.
    pub output: OutputConfig,
}

/// Redis connection configuration.
///
/// Supplied at startup and injected into the store; nothing reads
/// credentials ambiently at call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Connection URL, e.g. `redis://127.0.0.1:6379`.
    /// Environment variable: `XG_REDIS_URL` or `REDIS_URL`.
    pub url: String,

    /// Reconnect attempts the connection manager makes before an operation
    /// is reported as failed.
    pub retries: usize,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Enable colored output.
    pub colors: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            retries: 1,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            colors: true,
            quiet: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest): environment variables, user config
    /// file, compiled defaults.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(user_config) = Self::load_user_config() {
            config = user_config;
        }

        config.apply_env_overrides();

        debug!("Configuration loaded: {:?}", config);
        config
    }

    /// Load configuration from a specific file.
    ///
    /// Returns `None` (with a logged warning) when the file is missing or
    /// malformed, so a broken config never blocks startup.
    #[must_use]
    pub fn load_from_file(path: &PathBuf) -> Option<Self> {
        if !path.exists() {
            debug!("Config file not found: {}", path.display());
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    debug!("Loaded config from: {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse config file {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read config file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn load_user_config() -> Option<Self> {
        let config_path = Self::user_config_path()?;
        Self::load_from_file(&config_path)
    }

    /// Get the path to the user configuration file.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("xg").join("config.toml"))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("XG_REDIS_URL") {
            self.redis.url = url;
        } else if let Ok(url) = std::env::var("REDIS_URL") {
            self.redis.url = url;
        }

        if let Ok(retries) = std::env::var("XG_RETRIES") {
            if let Ok(n) = retries.parse() {
                self.redis.retries = n;
            }
        }

        if std::env::var("XG_NO_COLOR").is_ok() || std::env::var("NO_COLOR").is_ok() {
            self.output.colors = false;
        }
        if std::env::var("XG_QUIET").is_ok() {
            self.output.quiet = true;
        }
    }
}
