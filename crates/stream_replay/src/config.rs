//! Configuration management for the replay driver.
//!
//! Loads a TOML file describing the session, the translator tuning, the key
//! binding table and the scripted input to replay. Every section is optional
//! and falls back to its defaults.

use crate::script::{ScriptedInput, ShellToggle};
use message_stream::{LookAtSettings, MetaMap, MetaMapError, MetaMapRecord, MouseSettings, TranslatorConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Failures while loading or checking a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid key binding: {0}")]
    Binding(#[from] MetaMapError),
    #[error("Configuration validation failed: {0}")]
    Invalid(String),
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_viewport_width() -> i32 {
    800
}

fn default_viewport_height() -> i32 {
    600
}

/// Default tick interval for serde deserialization
fn default_tick_interval() -> u64 {
    33 // ~30 client frames per second
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub session: SessionSettings,
    /// Click refinement for the meta translator
    #[serde(default)]
    pub mouse: MouseSettings,
    /// Camera tuning for the look-at translator
    #[serde(default)]
    pub look_at: LookAtSettings,
    /// Key binding table, in match order. Empty means the stock bindings.
    #[serde(default)]
    pub bindings: Vec<MetaMapRecord>,
    /// Scripted device events
    #[serde(default)]
    pub input: Vec<ScriptedInput>,
    /// Scripted shell screen changes
    #[serde(default)]
    pub shell: Vec<ShellToggle>,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

/// Client session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Index of the player this client plays as
    #[serde(default)]
    pub local_player: i32,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: i32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: i32,
    /// Client tick interval in milliseconds
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Ticks to run; 0 runs until the script is exhausted
    #[serde(default)]
    pub max_ticks: u32,
    /// Whether a shell screen is up when the replay starts
    #[serde(default)]
    pub start_in_shell: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            local_player: 0,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            tick_interval_ms: default_tick_interval(),
            max_ticks: 0,
            start_in_shell: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file. A missing file yields the
    /// defaults; the caller decides whether to warn about it.
    pub async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path).await.map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Builds the translator chain settings, checking the binding table.
    pub fn to_translator_config(&self) -> Result<TranslatorConfig, ConfigError> {
        let bindings = if self.bindings.is_empty() {
            MetaMap::default_bindings()
        } else {
            MetaMap::from_records(self.bindings.iter().cloned())?
        };
        Ok(TranslatorConfig {
            bindings,
            mouse: self.mouse,
            look_at: self.look_at,
        })
    }

    /// Validates the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        if self.session.local_player < 0 {
            return Err(format!("session.local_player must not be negative (got {})", self.session.local_player));
        }
        if self.session.viewport_width <= 0 || self.session.viewport_height <= 0 {
            return Err(format!(
                "Viewport must be positive (got {}x{})",
                self.session.viewport_width, self.session.viewport_height
            ));
        }
        if self.session.tick_interval_ms == 0 {
            return Err("session.tick_interval_ms must be greater than 0".to_string());
        }

        if self.mouse.drag_tolerance < 0 {
            return Err("mouse.drag_tolerance must not be negative".to_string());
        }

        let look_at = &self.look_at;
        if look_at.scroll_amount < 0.0 {
            return Err("look_at.scroll_amount must not be negative".to_string());
        }
        if look_at.screen_edge_size < 0 || look_at.rmb_scroll_threshold < 0 {
            return Err("look_at edge size and scroll threshold must not be negative".to_string());
        }
        let half_min = self.session.viewport_width.min(self.session.viewport_height) / 2;
        if look_at.screen_edge_size >= half_min {
            return Err(format!(
                "look_at.screen_edge_size {} leaves no interior in a {}x{} viewport",
                look_at.screen_edge_size, self.session.viewport_width, self.session.viewport_height
            ));
        }

        Ok(())
    }
}
