//! Application services - shared state and guarded capabilities

pub mod detection;
pub mod registry;

pub use detection::{GuardedDetector, DEFAULT_DETECTION_TIMEOUT, DEFAULT_MAX_CONCURRENT_DETECTIONS};
pub use registry::{BotRegistry, BotSet};
