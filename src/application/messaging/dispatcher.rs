//! Message dispatcher - routes one inbound message through every bot

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::filter::CentralizedMessageFilter;
use crate::application::rules::TriggerSelector;
use crate::application::services::BotRegistry;
use crate::domain::entities::{BotDefinition, MessageContext, TriggerResult};
use crate::domain::traits::{IdentityProvider, OutgoingReply, ResponseDispatcher};
use crate::plugins::PluginManager;

/// A reply produced for one bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub bot: String,
    pub result: TriggerResult,
}

/// Filter, select and send replies for declarative bots and plugins
pub struct MessageDispatcher {
    filter: Arc<CentralizedMessageFilter>,
    registry: Arc<BotRegistry>,
    selector: TriggerSelector,
    plugins: PluginManager,
    identities: Arc<dyn IdentityProvider>,
    output: Arc<dyn ResponseDispatcher>,
}

impl MessageDispatcher {
    pub fn new(
        filter: Arc<CentralizedMessageFilter>,
        registry: Arc<BotRegistry>,
        identities: Arc<dyn IdentityProvider>,
        output: Arc<dyn ResponseDispatcher>,
    ) -> Self {
        Self {
            filter,
            registry,
            selector: TriggerSelector::default(),
            plugins: PluginManager::new(),
            identities,
            output,
        }
    }

    pub fn with_selector(mut self, selector: TriggerSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_plugins(mut self, plugins: PluginManager) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn filter(&self) -> &CentralizedMessageFilter {
        &self.filter
    }

    pub fn registry(&self) -> &BotRegistry {
        &self.registry
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    /// Decide every bot's reply without sending anything.
    ///
    /// Declarative bots run in load order, then plugins in registration order.
    pub async fn evaluate(&self, ctx: &MessageContext) -> Vec<Dispatched> {
        let mut replies = Vec::new();

        for bot in self.registry.snapshot().iter() {
            if !self.admits(bot, ctx) {
                continue;
            }

            match self.selector.select_with_identity(bot, ctx, self.identities.as_ref()).await {
                Ok(Some(result)) => replies.push(Dispatched {
                    bot: bot.name.clone(),
                    result,
                }),
                Ok(None) => {}
                Err(e) => {
                    warn!(bot = %bot.name, error = %e, "Identity resolution failed, skipping reply");
                }
            }
        }

        for plugin in self.plugins.plugins() {
            if !self.filter.decide(ctx, Some(plugin.name())).should_process {
                continue;
            }

            if let Some(result) = plugin.evaluate(ctx).await {
                replies.push(Dispatched {
                    bot: plugin.name().to_string(),
                    result,
                });
            }
        }

        replies
    }

    /// Evaluate and post replies; returns the replies that were delivered
    pub async fn handle(&self, ctx: &MessageContext) -> Vec<Dispatched> {
        let mut sent = Vec::new();

        for dispatched in self.evaluate(ctx).await {
            let reply = OutgoingReply::new(dispatched.result.response.clone(), dispatched.result.identity());
            match self.output.send(&ctx.channel_id, &reply).await {
                Ok(message_id) => {
                    info!(
                        bot = %dispatched.bot,
                        channel = %ctx.channel_id,
                        message_id = %message_id,
                        "Reply sent"
                    );
                    sent.push(dispatched);
                }
                Err(e) => {
                    warn!(
                        bot = %dispatched.bot,
                        adapter = self.output.name(),
                        error = %e,
                        "Failed to send reply"
                    );
                }
            }
        }

        sent
    }

    /// Centralized filter plus the bot's own author gates
    fn admits(&self, bot: &BotDefinition, ctx: &MessageContext) -> bool {
        if !self.filter.decide(ctx, Some(&bot.name)).should_process {
            return false;
        }

        let author = &ctx.author;
        if author.is_bot {
            let allowed = self.filter.is_whitelisted(&author.id) || self.filter.is_inverse_behavior(&bot.name);
            if bot.ignore_bots && !allowed {
                debug!(bot = %bot.name, author = %author, "Bot ignores bot authors");
                return false;
            }
        } else if bot.ignore_humans {
            debug!(bot = %bot.name, author = %author, "Bot ignores human authors");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::{BotError, CapabilityError};
    use crate::application::messaging::FilterConfig;
    use crate::domain::entities::{
        Author, BotIdentity, ConditionNode, IdentitySpec, ResponseSet, TriggerSpec,
    };
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct NoMembers;

    #[async_trait]
    impl IdentityProvider for NoMembers {
        async fn member(&self, id: &str, _ctx: &MessageContext) -> Result<BotIdentity, CapabilityError> {
            Err(CapabilityError::MemberNotFound(id.to_string()))
        }

        async fn random_member(&self, _ctx: &MessageContext) -> Result<BotIdentity, CapabilityError> {
            Err(CapabilityError::NoEligibleMember)
        }
    }

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(String, OutgoingReply)>>,
        attempts: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ResponseDispatcher for Recorder {
        async fn send(&self, channel_id: &str, reply: &OutgoingReply) -> Result<String, BotError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BotError::Dispatch("channel gone".into()));
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push((channel_id.to_string(), reply.clone()));
            Ok(format!("msg-{}", sent.len()))
        }

        fn name(&self) -> &str {
            "recorder"
        }
    }

    fn hello_bot() -> BotDefinition {
        BotDefinition::new(
            "hello",
            IdentitySpec::Static {
                bot_name: "HelloBot".into(),
                avatar_url: "https://example.com/h.png".into(),
            },
        )
        .with_responses(ResponseSet::single("Hi!"))
        .with_trigger(TriggerSpec::new(ConditionNode::contains_word("hello")))
    }

    fn dispatcher(bots: Vec<BotDefinition>, output: Arc<Recorder>) -> MessageDispatcher {
        let filter = FilterConfig {
            current_bot_user_id: Some("self".into()),
            whitelisted_bot_ids: HashSet::from(["friend".to_string()]),
            ..FilterConfig::default()
        };
        MessageDispatcher::new(
            Arc::new(CentralizedMessageFilter::new(filter)),
            Arc::new(BotRegistry::with_bots(bots)),
            Arc::new(NoMembers),
            output,
        )
    }

    #[tokio::test]
    async fn sends_reply_to_message_channel() {
        let output = Arc::new(Recorder::default());
        let dispatcher = dispatcher(vec![hello_bot()], output.clone());

        let msg = MessageContext::new(Author::new("u1"), "hello world").with_channel("general");
        let sent = dispatcher.handle(&msg).await;

        assert_eq!(sent.len(), 1);
        let recorded = output.sent.lock().unwrap();
        assert_eq!(recorded[0].0, "general");
        assert_eq!(recorded[0].1.content, "Hi!");
        assert_eq!(recorded[0].1.username, "HelloBot");
    }

    #[tokio::test]
    async fn gates_bot_and_human_authors() {
        let output = Arc::new(Recorder::default());
        let bots_only = hello_bot().ignore_bots(false).ignore_humans(true);
        let dispatcher = dispatcher(vec![bots_only], output);

        let human = MessageContext::new(Author::new("u1"), "hello");
        assert!(dispatcher.evaluate(&human).await.is_empty());

        // Centralized filter still blocks unlisted bots
        let stranger = MessageContext::new(Author::bot("b1"), "hello");
        assert!(dispatcher.evaluate(&stranger).await.is_empty());

        let friend = MessageContext::new(Author::bot("friend"), "hello");
        assert_eq!(dispatcher.evaluate(&friend).await.len(), 1);
    }

    #[tokio::test]
    async fn self_messages_never_reply() {
        let output = Arc::new(Recorder::default());
        let dispatcher = dispatcher(vec![hello_bot()], output);

        let own = MessageContext::new(Author::bot("self"), "hello");
        assert!(dispatcher.evaluate(&own).await.is_empty());
    }

    #[tokio::test]
    async fn identity_failure_skips_only_that_bot() {
        let output = Arc::new(Recorder::default());
        let mimic = BotDefinition::new("mimic", IdentitySpec::Mimic { as_member: "404".into() })
            .with_responses(ResponseSet::single("copy"))
            .with_trigger(TriggerSpec::new(ConditionNode::always()));
        let dispatcher = dispatcher(vec![mimic, hello_bot()], output);

        let replies = dispatcher.evaluate(&MessageContext::new(Author::new("u1"), "hello")).await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].bot, "hello");
    }

    #[tokio::test]
    async fn dispatch_failure_is_not_retried() {
        let output = Arc::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        let dispatcher = dispatcher(vec![hello_bot()], output.clone());

        let sent = dispatcher.handle(&MessageContext::new(Author::new("u1"), "hello")).await;
        assert!(sent.is_empty());
        assert!(output.sent.lock().unwrap().is_empty());
        assert_eq!(output.attempts.load(Ordering::SeqCst), 1);
    }
}
