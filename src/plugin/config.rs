// Configuration module for the chat bubble mod

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::constants::{
    DEFAULT_BUBBLE_SECONDS, DEFAULT_MAX_MESSAGE_CHARS, DEFAULT_TICK_INTERVAL,
};
use crate::core::{ApiSubstitutions, ChatPolicy, DisplayFormat};

// =============================================================================
// CONFIGURATION STRUCTURES
// =============================================================================

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingSettings {
    /// Mirror logs to stdout
    #[serde(default)]
    pub console: bool,
    /// Log file path (relative to the config directory or absolute). Empty = no file logging.
    #[serde(default)]
    pub log_file: String,
}

/// Bubble scheduler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BubbleSettings {
    /// Tick cadence in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Bubble lifetime for chat messages, in seconds (one tick = one second)
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,

    /// Text inserted after the title inside the brackets
    #[serde(default)]
    pub title_suffix: String,

    /// Record document path (relative to the config directory or absolute)
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL.as_millis() as u64
}
fn default_duration_secs() -> u32 {
    DEFAULT_BUBBLE_SECONDS
}
fn default_data_file() -> String {
    "data/Data.json".to_string()
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            duration_secs: default_duration_secs(),
            title_suffix: String::new(),
            data_file: default_data_file(),
        }
    }
}

impl BubbleSettings {
    /// Tick interval, never zero
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn display_format(&self) -> DisplayFormat {
        DisplayFormat::new(self.title_suffix.clone())
    }
}

/// Chat filtering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default)]
    pub forbidden_words: Vec<String>,
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

fn default_max_message_chars() -> usize {
    DEFAULT_MAX_MESSAGE_CHARS
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            forbidden_words: Vec::new(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

/// Main configuration structure
///
/// Loaded once at startup and handed to the plugin; nothing reads it globally.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub bubble: BubbleSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    /// Literal substitutions, applied in document order
    #[serde(default)]
    pub api: ApiSubstitutions,
}

// =============================================================================
// CONFIG LOADING
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

impl Config {
    pub const CONFIG_FILENAME: &'static str = "chat_bubble.toml";

    /// Load `chat_bubble.toml` from `dir`, or defaults if the file is absent
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(Self::CONFIG_FILENAME);

        debug!(
            path = %config_path.display(),
            "[config] Looking for config"
        );

        if !config_path.exists() {
            debug!("[config] No config found, using defaults");
            return Ok(Config::default());
        }

        let config = Self::load_from(&config_path)?;
        info!(
            path = %config_path.display(),
            substitutions = config.api.len(),
            "[config] Loaded config"
        );
        Ok(config)
    }

    /// Load a config file at an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::parse(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn chat_policy(&self) -> ChatPolicy {
        ChatPolicy {
            bubble_seconds: self.bubble.duration_secs,
            max_message_chars: self.chat.max_message_chars,
            forbidden_words: self.chat.forbidden_words.clone(),
        }
    }

    /// Record document path, resolved against `base_dir` when relative
    pub fn data_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.bubble.data_file)
    }

    /// Log file path resolved against `base_dir`, or None when file logging is off
    pub fn log_path(&self, base_dir: &Path) -> Option<PathBuf> {
        if self.logging.log_file.is_empty() {
            None
        } else {
            Some(base_dir.join(&self.logging.log_file))
        }
    }
}
