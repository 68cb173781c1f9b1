//! Configuration system for cs2prac
//!
//! This module provides a trait-based configuration system that supports:
//! - Type-safe config structs via serde
//! - TOML file format
//! - Auto-generation of default configs
//! - Manual reload capability
//!
//! # Example
//!
//! ```ignore
//! use cs2prac_core::{PluginConfig, PracticeConfig};
//!
//! let config = PracticeConfig::load().unwrap_or_default();
//! println!("Max bots: {}", config.max_bots);
//! ```

mod loader;

use std::path::Path;
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use loader::{
    configs_dir, plugin_base_dir, plugin_config_path, plugin_dir, resolve_data_path,
};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine config directory from plugin location
    #[error("Config directory not available - could not resolve plugin base path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Trait for plugin configuration types.
///
/// Implement this trait on your config struct to enable automatic loading,
/// saving, and reloading of configuration files.
///
/// # File Location
///
/// Configs are stored at:
/// `game/csgo/addons/cs2prac/configs/plugins/{PLUGIN_NAME}/{PLUGIN_NAME}.toml`
pub trait PluginConfig: Default + Serialize + DeserializeOwned + Send + Sync {
    /// The plugin name used for config file path resolution.
    const PLUGIN_NAME: &'static str;

    /// Load config from the install location, creating default if missing.
    fn load() -> ConfigResult<Self> {
        let base = plugin_base_dir()?;
        Self::load_from(&plugin_config_path(&base, Self::PLUGIN_NAME))
    }

    /// Load config from an explicit path, creating default if missing.
    fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded config for {} from {:?}", Self::PLUGIN_NAME, path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!(
                "Created default config for {} at {:?}",
                Self::PLUGIN_NAME,
                path
            );
            Ok(default)
        }
    }

    /// Save config to an explicit path.
    ///
    /// Creates parent directories if they don't exist.
    fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved config for {} to {:?}", Self::PLUGIN_NAME, path);
        Ok(())
    }

    /// Reload config from an explicit path.
    ///
    /// Updates self with the current file contents.
    fn reload_from(&mut self, path: &Path) -> ConfigResult<()> {
        let content = std::fs::read_to_string(path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded config for {} from {:?}", Self::PLUGIN_NAME, path);
        Ok(())
    }
}

/// Practice plugin configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Maximum number of managed bots
    pub max_bots: usize,

    /// Allow crouching bots
    pub allow_crouch_bots: bool,

    /// Bot difficulty (0 = easy, 1 = normal, 2 = hard, 3 = expert)
    pub bot_difficulty: i32,

    /// Grenade throws remembered per player
    pub history_capacity: usize,

    /// Seconds between playtime flushes
    pub flush_interval_secs: u64,

    /// Minimum seconds since the last flush before a player is flushed again
    pub flush_guard_secs: u64,

    /// Seconds before a teleport or watch request expires
    pub request_ttl_secs: u64,

    /// Seconds between expired-request sweeps
    pub request_sweep_secs: u64,

    /// Seconds between stale bot handle cleanups
    pub bot_cleanup_secs: u64,

    /// SQLite database file (relative to the plugin directory)
    pub database_file: String,

    /// Admin list file (relative to the plugin directory)
    pub admin_file: String,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            max_bots: 32,
            allow_crouch_bots: true,
            bot_difficulty: 1,
            history_capacity: 50,
            flush_interval_secs: 60,
            flush_guard_secs: 55,
            request_ttl_secs: 300,
            request_sweep_secs: 60,
            bot_cleanup_secs: 30,
            database_file: "cs2prac.db".to_string(),
            admin_file: "admins.cfg".to_string(),
        }
    }
}

impl PracticeConfig {
    /// Playtime flush interval
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }

    /// Minimum elapsed time before a session is flushed again
    pub fn flush_guard(&self) -> Duration {
        Duration::from_secs(self.flush_guard_secs)
    }

    /// Request lifetime
    pub fn request_ttl(&self) -> Duration {
        Duration::from_secs(self.request_ttl_secs)
    }

    /// Expired-request sweep interval
    pub fn request_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.request_sweep_secs)
    }

    /// Bot cleanup interval
    pub fn bot_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.bot_cleanup_secs)
    }
}

impl PluginConfig for PracticeConfig {
    const PLUGIN_NAME: &'static str = "cs2prac";
}
