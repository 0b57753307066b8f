//! Configuration management

pub mod bots;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::messaging::FilterConfig;
use crate::application::services::{DEFAULT_DETECTION_TIMEOUT, DEFAULT_MAX_CONCURRENT_DETECTIONS};
use crate::infrastructure::llm::LLMConfig;
use crate::plugins::BlueBotConfig;

pub use bots::{load_bots, load_bots_str, LoadReport};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub filter: FilterConfig,
    /// Path of the bot-definition document
    pub bots_file: PathBuf,
    pub bluebot: BlueBotConfig,
    pub detection: DetectionConfig,
    pub llm: LLMConfig,
}

/// Limits for LLM-backed detection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DetectionConfig {
    pub timeout_ms: u64,
    pub max_concurrent: usize,
}

impl DetectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_DETECTION_TIMEOUT.as_millis() as u64,
            max_concurrent: DEFAULT_MAX_CONCURRENT_DETECTIONS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            bots_file: PathBuf::from("bots.yaml"),
            bluebot: BlueBotConfig::default(),
            detection: DetectionConfig::default(),
            llm: LLMConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config {}: {}", path.display(), e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Defaults overridden by environment variables
    pub fn load_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Log level used when `RUST_LOG` is unset
    pub fn default_log_level(&self) -> &'static str {
        if self.filter.debug_mode {
            "debug"
        } else {
            "info"
        }
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(id) = env_value("BOT_USER_ID") {
            self.filter.current_bot_user_id = Some(id);
        }
        if let Some(ids) = env_value("BOT_WHITELIST_IDS") {
            self.filter.whitelisted_bot_ids = parse_list(&ids).collect();
        }
        if let Some(names) = env_value("INVERSE_BEHAVIOR_BOTS") {
            self.filter.inverse_behavior_bots = parse_list(&names).collect();
        }
        if let Some(debug) = env_value("DEBUG_MODE") {
            self.filter.debug_mode = parse_bool("DEBUG_MODE", &debug)?;
        }
        if let Some(path) = env_value("BOTS_FILE") {
            self.bots_file = PathBuf::from(path);
        }
        if let Some(target) = env_value("BLUEBOT_TARGET_USER_ID") {
            self.bluebot.target_user_id = Some(target);
        }
        if let Some(ms) = env_value("DETECTION_TIMEOUT_MS") {
            self.detection.timeout_ms = parse_number("DETECTION_TIMEOUT_MS", &ms)?;
        }
        if let Some(n) = env_value("DETECTION_MAX_CONCURRENT") {
            self.detection.max_concurrent = parse_number("DETECTION_MAX_CONCURRENT", &n)?;
        }
        self.llm.apply_env();
        Ok(())
    }
}

/// Comma-separated list, trimmed, empty entries dropped
pub fn parse_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue(format!("{}={}", name, other))),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("{}={}", name, value)))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
