//! OpenAI-compatible chat completions provider (Groq, OpenAI, local gateways)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::infrastructure::llm::{LLMConfig, LLMMessage, LLMResponse, LLMError, LLMResult, LLM};

/// Provider for any `/chat/completions` endpoint
pub struct OpenAiCompatibleProvider {
    api_key: String,
    client: Client,
    model: String,
    base_url: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &LLMConfig) -> LLMResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(LLMError::MissingApiKey)?;
        Ok(Self::new(api_key, config.model.clone(), config.base_url.clone()))
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<LLMMessage>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    stream: bool,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LLM for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn chat(
        &self,
        messages: Vec<LLMMessage>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> LLMResult<LLMResponse> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
            stream: false,
        };

        let response = self.client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LLMError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::ApiError(format!("status: {}, body: {}", status, body)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let choice = chat_response.choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::InvalidResponse("No choices in response".to_string()))?;

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
        })
    }
}
