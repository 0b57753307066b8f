use super::Author;
use chrono::{DateTime, Utc};

/// The message another message replies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencedMessage {
    pub id: String,
    pub author_id: String,
    pub content: String,
}

/// Immutable snapshot of one inbound chat event
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub id: String,
    pub author: Author,
    pub content: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub referenced: Option<ReferencedMessage>,
}

impl MessageContext {
    pub fn new(author: Author, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author,
            content: content.into(),
            channel_id: "default".to_string(),
            guild_id: None,
            created_at: Utc::now(),
            referenced: None,
        }
    }

    pub fn author_id(&self) -> &str {
        &self.author.id
    }

    pub fn author_is_bot(&self) -> bool {
        self.author.is_bot
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn with_guild(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_reference(mut self, referenced: ReferencedMessage) -> Self {
        self.referenced = Some(referenced);
        self
    }

    /// Content cut to `max` characters for log lines
    pub fn preview(&self, max: usize) -> String {
        if self.content.chars().count() > max {
            let cut: String = self.content.chars().take(max).collect();
            format!("{}...", cut)
        } else {
            self.content.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_content() {
        let msg = MessageContext::new(Author::new("1"), "a".repeat(150));
        let preview = msg.preview(100);
        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));

        let short = MessageContext::new(Author::new("1"), "hello");
        assert_eq!(short.preview(100), "hello");
    }

    #[test]
    fn builder_sets_channel_and_guild() {
        let msg = MessageContext::new(Author::new("1"), "hi")
            .with_channel("c1")
            .with_guild("g1");
        assert_eq!(msg.channel_id, "c1");
        assert_eq!(msg.guild_id.as_deref(), Some("g1"));
        assert_eq!(msg.author_id(), "1");
        assert!(!msg.author_is_bot());
    }
}
