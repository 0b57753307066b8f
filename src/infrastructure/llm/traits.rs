//! LLM traits - chat completion interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat message for LLM conversations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LLMMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    pub content: String,
}

impl LLMMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// First completion choice; empty when the provider sent no text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LLMResponse {
    pub content: String,
}

/// LLM errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LLMError {
    /// API key missing
    MissingApiKey,
    /// Provider returned nothing usable
    InvalidResponse(String),
    /// API error from provider
    ApiError(String),
    /// Network error
    NetworkError(String),
    /// Rate limited
    RateLimited,
    /// Parse error
    ParseError(String),
}

impl std::fmt::Display for LLMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMError::MissingApiKey => write!(f, "Missing API key"),
            LLMError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            LLMError::ApiError(msg) => write!(f, "API error: {}", msg),
            LLMError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            LLMError::RateLimited => write!(f, "Rate limited"),
            LLMError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for LLMError {}

/// Result type for LLM operations
pub type LLMResult<T> = Result<T, LLMError>;

/// LLM Provider trait
#[async_trait]
pub trait LLM: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Chat completion
    async fn chat(
        &self,
        messages: Vec<LLMMessage>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> LLMResult<LLMResponse>;
}
