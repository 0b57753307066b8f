use async_trait::async_trait;
use crate::application::errors::DetectionError;

/// Natural-language classifier behind LLM-based triggers
///
/// Only the boolean outcome is consumed; callers treat any error as `false`.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, text: &str, prompt_id: &str) -> Result<bool, DetectionError>;
}
