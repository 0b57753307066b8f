//! LLM Configuration

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Settings for the OpenAI-compatible chat endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LLMConfig {
    /// Detection is disabled without a key
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.0,
            max_tokens: Some(5),
        }
    }
}

impl LLMConfig {
    /// Override fields from `LLM_*` variables; `GROQ_API_KEY` is a fallback key
    pub fn apply_env(&mut self) {
        if let Some(key) = env_value("LLM_API_KEY").or_else(|| env_value("GROQ_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = env_value("LLM_MODEL") {
            self.model = model;
        }
        if let Some(url) = env_value("LLM_BASE_URL") {
            self.base_url = url;
        }
        if let Some(temp) = env_value("LLM_TEMPERATURE").and_then(|t| t.parse().ok()) {
            self.temperature = temp;
        }
        if let Some(tokens) = env_value("LLM_MAX_TOKENS").and_then(|t| t.parse().ok()) {
            self.max_tokens = Some(tokens);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
