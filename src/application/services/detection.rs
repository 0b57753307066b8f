//! Guarded detection - bounded, fail-open wrapper around a detector

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::application::errors::DetectionError;
use crate::domain::traits::Detector;

pub const DEFAULT_DETECTION_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_CONCURRENT_DETECTIONS: usize = 4;

/// Adds a timeout and a cap on in-flight calls to any detector
pub struct GuardedDetector {
    inner: Arc<dyn Detector>,
    timeout: Duration,
    permits: Semaphore,
}

impl GuardedDetector {
    pub fn new(inner: Arc<dyn Detector>) -> Self {
        Self::with_limits(inner, DEFAULT_DETECTION_TIMEOUT, DEFAULT_MAX_CONCURRENT_DETECTIONS)
    }

    pub fn with_limits(inner: Arc<dyn Detector>, timeout: Duration, max_concurrent: usize) -> Self {
        Self {
            inner,
            timeout,
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }

    /// Outcome of the detection, with every failure mapped to `false`
    pub async fn detect_or_false(&self, text: &str, prompt_id: &str) -> bool {
        match self.detect(text, prompt_id).await {
            Ok(detected) => detected,
            Err(e) => {
                warn!(prompt = prompt_id, error = %e, "Detection failed, treating as no match");
                false
            }
        }
    }
}

#[async_trait]
impl Detector for GuardedDetector {
    async fn detect(&self, text: &str, prompt_id: &str) -> Result<bool, DetectionError> {
        let _permit = self.permits.try_acquire().map_err(|_| DetectionError::Saturated)?;

        match tokio::time::timeout(self.timeout, self.inner.detect(text, prompt_id)).await {
            Ok(result) => result,
            Err(_) => Err(DetectionError::Timeout(self.timeout)),
        }
    }
}
