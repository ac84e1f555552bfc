//! Configuration system for treequill.
//!
//! This module provides the configuration structure for treequill with sensible defaults
//! and support for serialization/deserialization via serde. Configuration is loaded
//! from a TOML file and merged with command-line arguments.
//!
//! # Example
//!
//! ```
//! use treequill::config::Config;
//! use treequill::document::node::NodeId;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.theme, "default-dark");
//! assert_eq!(config.root_id, NodeId::from(1));
//!
//! // Create custom configuration
//! let custom = Config {
//!     server_url: "http://tree.local:9000/".to_string(),
//!     avatars: false,
//!     ..Config::default()
//! };
//! ```

use crate::document::node::NodeId;
use crate::editor::state::DEFAULT_MAX_DEPTH;
use crate::service::http::ApiStyle;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the treequill application.
///
/// All fields have sensible defaults via `Config::default()`, and any field
/// missing from the config file takes its default.
///
/// # Fields
///
/// * `server_url` - Base URL of the tree service (default: "http://localhost:8080/")
/// * `api` - Request encoding, "form" or "json" (default: "form")
/// * `root_id` - Id of the node treated as the root (default: 1)
/// * `theme` - Color scheme name (default: "default-dark")
/// * `avatars` - Load node avatars (default: true)
/// * `avatar_file` - Serve every avatar from this local file instead of the service
/// * `max_depth` - Levels rendered before the view stops descending (default: 64)
/// * `enable_mouse` - Enable mouse clicks and wheel (default: true)
/// * `request_timeout_secs` - Per-request timeout; unset means none (default: unset)
/// * `log_file` - Where to write the log (default: under the cache directory)
/// * `log_level` - Log level when `RUST_LOG` is unset (default: "info")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the tree service
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Request encoding
    #[serde(default)]
    pub api: ApiStyle,

    /// Id of the node treated as the root
    #[serde(default = "default_root_id")]
    pub root_id: NodeId,

    /// Color scheme name
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Load node avatars
    #[serde(default = "default_avatars")]
    pub avatars: bool,

    /// Serve every avatar from this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_file: Option<PathBuf>,

    /// Levels rendered before the view stops descending
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Enable mouse clicks and wheel
    #[serde(default = "default_enable_mouse")]
    pub enable_mouse: bool,

    /// Per-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Log file path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Returns the default service URL.
fn default_server_url() -> String {
    "http://localhost:8080/".to_string()
}

/// Returns the default root id (the service's root row).
fn default_root_id() -> NodeId {
    NodeId::Int(1)
}

/// Returns the default theme name.
fn default_theme() -> String {
    "default-dark".to_string()
}

fn default_avatars() -> bool {
    true
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Returns the default for enabling mouse support.
fn default_enable_mouse() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    /// Creates a new configuration with default values.
    ///
    /// # Example
    ///
    /// ```
    /// use treequill::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.server_url, "http://localhost:8080/");
    /// assert!(config.avatars);
    /// assert!(config.request_timeout().is_none());
    /// ```
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            api: ApiStyle::default(),
            root_id: default_root_id(),
            theme: default_theme(),
            avatars: default_avatars(),
            avatar_file: None,
            max_depth: default_max_depth(),
            enable_mouse: default_enable_mouse(),
            request_timeout_secs: None,
            log_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/treequill/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("treequill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        Self::load_from(&config_path).unwrap_or_else(|_| Self::default())
    }

    /// Loads configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or isn't valid TOML for this
    /// structure.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// The request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
