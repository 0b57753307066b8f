//! Plugin trait definitions

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::entities::{MessageContext, TriggerResult};

/// Reply bot with behavior beyond a declarative trigger list
///
/// Plugins own whatever state they need; the dispatcher only asks them to
/// evaluate messages the centralized filter admitted for them.
#[async_trait]
pub trait ReplyPlugin: Send + Sync {
    /// Unique name, also used as the filter's requesting-bot name
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Decide whether and how to reply to `ctx`
    async fn evaluate(&self, ctx: &MessageContext) -> Option<TriggerResult>;

    /// Optional: forget any conversational state
    fn reset(&self) {}

    /// Optional: Get plugin metadata
    fn metadata(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}
