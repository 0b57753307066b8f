//! LLM-backed yes/no detector

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{LLMMessage, LLM};
use crate::application::errors::DetectionError;
use crate::domain::traits::Detector;
use crate::plugins::blue_bot::DECEPTIVE_CHECK_PROMPT;

const BLUE_DECEPTIVE_CHECK: &str = "You decide whether a chat message is secretly talking about \
the colour blue. This includes misspellings, other languages, wordplay, or references to \
things that are famously blue (the sky, the ocean, sapphires, Smurfs, the Blue Mage job). \
Answer with exactly one word: yes or no.";

/// Asks a chat model a registered yes/no question about a message
pub struct LlmDetector {
    llm: Arc<dyn LLM>,
    prompts: HashMap<String, String>,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl LlmDetector {
    /// Detector with the built-in prompts registered
    pub fn new(llm: Arc<dyn LLM>) -> Self {
        Self {
            llm,
            prompts: HashMap::new(),
            temperature: 0.0,
            max_tokens: Some(5),
        }
        .with_prompt(DECEPTIVE_CHECK_PROMPT, BLUE_DECEPTIVE_CHECK)
    }

    /// Register or replace a system prompt under `prompt_id`
    pub fn with_prompt(mut self, prompt_id: impl Into<String>, system: impl Into<String>) -> Self {
        self.prompts.insert(prompt_id.into(), system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// `None` leaves the completion length to the provider
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl Detector for LlmDetector {
    async fn detect(&self, text: &str, prompt_id: &str) -> Result<bool, DetectionError> {
        let system = self
            .prompts
            .get(prompt_id)
            .ok_or_else(|| DetectionError::UnknownPrompt(prompt_id.to_string()))?;

        let messages = vec![LLMMessage::system(system.clone()), LLMMessage::user(text)];
        let response = self
            .llm
            .chat(messages, Some(self.temperature), self.max_tokens)
            .await
            .map_err(|e| DetectionError::Backend(e.to_string()))?;

        let answer = response.content.trim().trim_end_matches('.').to_lowercase();
        debug!(provider = self.llm.name(), prompt = prompt_id, answer = %answer, "Detection answered");
        Ok(answer == "yes")
    }
}
