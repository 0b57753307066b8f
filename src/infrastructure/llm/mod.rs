//! LLM integration - chat completion backend for natural-language detection

pub mod config;
pub mod detector;
pub mod providers;
pub mod traits;

pub use config::LLMConfig;
pub use detector::LlmDetector;
pub use providers::OpenAiCompatibleProvider;
pub use traits::{LLM, LLMMessage, LLMResponse, LLMError, LLMResult};
