//! Application layer errors

use std::time::Duration;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Application configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Whole-document failures while loading bot definitions
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid document: {0}")]
    Document(String),
}

/// A single bot definition rejected at load time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("bot '{bot}': {reason}")]
pub struct ConfigValidationError {
    /// Bot name, or its position when the name itself is missing
    pub bot: String,
    pub reason: String,
}

impl ConfigValidationError {
    pub fn new(bot: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            bot: bot.into(),
            reason: reason.into(),
        }
    }
}

/// Failure evaluating one condition tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
}

/// Identity lookup failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("no eligible member to impersonate")]
    NoEligibleMember,
}

/// Detection capability failures; all of them mean "no match"
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("detection timed out after {0:?}")]
    Timeout(Duration),

    #[error("too many detections in flight")]
    Saturated,

    #[error("unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("backend error: {0}")]
    Backend(String),
}
