//! Console adapter for development/testing

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{Author, MessageContext};
use crate::domain::traits::{OutgoingReply, ResponseDispatcher};

/// Prints replies to stdout as `[BotName] text`
#[derive(Debug, Default)]
pub struct ConsoleDispatcher {
    sent: AtomicU64,
}

impl ConsoleDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(reply: &OutgoingReply) -> String {
        format!("[{}] {}", reply.username, reply.content)
    }
}

#[async_trait]
impl ResponseDispatcher for ConsoleDispatcher {
    async fn send(&self, _channel_id: &str, reply: &OutgoingReply) -> Result<String, BotError> {
        println!("{}", Self::format(reply));
        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(format!("console_msg_{}", n))
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Parse an `author: text` line; a trailing `*` on the author marks a bot.
///
/// Lines without a colon are attributed to `console`.
pub fn parse_line(line: &str, channel_id: &str) -> Option<MessageContext> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (author, content) = match line.split_once(':') {
        Some((author, content)) if !author.trim().is_empty() && !author.contains(' ') => {
            (author.trim(), content.trim())
        }
        _ => ("console", line),
    };

    let author = match author.strip_suffix('*') {
        Some(id) => Author::bot(id).with_username(id),
        None => Author::new(author).with_username(author),
    };
    Some(MessageContext::new(author, content).with_channel(channel_id))
}
