use async_trait::async_trait;
use crate::application::errors::BotError;
use crate::domain::entities::BotIdentity;

/// Outgoing reply handed to the chat surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingReply {
    pub content: String,
    pub username: String,
    pub avatar_url: String,
}

impl OutgoingReply {
    pub fn new(content: impl Into<String>, identity: BotIdentity) -> Self {
        Self {
            content: content.into(),
            username: identity.bot_name,
            avatar_url: identity.avatar_url,
        }
    }
}

/// ResponseDispatcher trait - abstraction for posting replies to a channel
///
/// Implementations deliver exactly once per call; the engine never retries.
#[async_trait]
pub trait ResponseDispatcher: Send + Sync {
    /// Post a reply, returning the platform message id
    async fn send(&self, channel_id: &str, reply: &OutgoingReply) -> Result<String, BotError>;

    /// Adapter name for logs
    fn name(&self) -> &str;
}
