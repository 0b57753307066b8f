//! BlueBot - a reply bot with short-lived conversational memory
//!
//! Checks run in priority order and the first match wins. Some checks read
//! or write the two timestamps in [`ConversationState`].

pub mod patterns;
pub mod state;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::errors::{BotError, ConfigError};
use crate::application::services::GuardedDetector;
use crate::domain::entities::{BotIdentity, MessageContext, TriggerResult};
use crate::domain::traits::Clock;
use crate::plugins::trait_def::ReplyPlugin;

pub use patterns::BluePatterns;
pub use state::ConversationState;

pub const BOT_NAME: &str = "BlueBot";
pub const DECEPTIVE_CHECK_PROMPT: &str = "blue_deceptive_check";

const MENTION_RESPONSE: &str = "Did somebody say Blu?";
const ACKNOWLEDGE_RESPONSE: &str = "Oh, somebody definitely said blue...";
const MURDER_RESPONSE: &str = "What the fuck did you just fucking say about me, you little bitch? \
I'll have you know I graduated top of my class in the Navy Seals, and I've been involved in \
numerous secret raids on Al-Quaeda, and I have over 300 confirmed kills. I am trained in gorilla \
warfare and I'm the top sniper in the entire US armed forces. You are nothing to me but just \
another target. I will wipe you the fuck out with precision the likes of which has never been \
seen before on this Earth, mark my fucking words. You're fucking dead, kiddo.";
const CHEEKY_RESPONSES: &[&str] = &[
    "Lol, Somebody definitely said Blu! :smile:",
    "I'm pretty sure somebody said Blu :smirk:",
    "Blu? Did I hear Blu? :eyes:",
    "You can't fool me, somebody said Blu :smiling_imp:",
    "Oh, you didn't say Blu? Sure, sure :wink:",
];

fn mention_window() -> Duration {
    Duration::minutes(2)
}

fn escalation_window() -> Duration {
    Duration::minutes(1)
}

/// Avatar per mood
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BlueAvatars {
    pub default: String,
    pub cheeky: String,
    pub murder: String,
    pub contempt: String,
}

impl Default for BlueAvatars {
    fn default() -> Self {
        Self {
            default: "https://cdn.example.com/bluebot/default.png".to_string(),
            cheeky: "https://cdn.example.com/bluebot/cheeky.png".to_string(),
            murder: "https://cdn.example.com/bluebot/murder.png".to_string(),
            contempt: "https://cdn.example.com/bluebot/contempt.png".to_string(),
        }
    }
}

/// BlueBot configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BlueBotConfig {
    /// User whose confirmations escalate; unset disables the target checks
    pub target_user_id: Option<String>,
    /// How the target is called in contemptuous replies
    pub target_name: String,
    pub avatars: BlueAvatars,
}

impl Default for BlueBotConfig {
    fn default() -> Self {
        Self {
            target_user_id: None,
            target_name: "Venn".to_string(),
            avatars: BlueAvatars::default(),
        }
    }
}

pub struct BlueBot {
    config: BlueBotConfig,
    patterns: &'static BluePatterns,
    clock: Arc<dyn Clock>,
    detector: Option<Arc<GuardedDetector>>,
    state: Mutex<ConversationState>,
}

impl BlueBot {
    pub fn new(config: BlueBotConfig, clock: Arc<dyn Clock>) -> Result<Self, BotError> {
        let patterns = BluePatterns::shared()
            .map_err(|e| ConfigError::InvalidValue(format!("BlueBot pattern: {}", e)))?;

        Ok(Self {
            config,
            patterns,
            clock,
            detector: None,
            state: Mutex::new(ConversationState::default()),
        })
    }

    /// Enable the LLM fallback check
    pub fn with_detector(mut self, detector: Arc<GuardedDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Copy of the current conversational memory
    pub fn state(&self) -> ConversationState {
        *self.lock_state()
    }

    /// Run every check in priority order
    pub async fn check_all(&self, ctx: &MessageContext) -> Option<TriggerResult> {
        let deterministic = self
            .check_nice_target(ctx)
            .or_else(|| self.check_nice(ctx))
            .or_else(|| self.check_acknowledge(ctx))
            .or_else(|| self.check_acknowledge_other(ctx))
            .or_else(|| self.check_mention(ctx));

        if deterministic.is_some() {
            return deterministic;
        }
        self.check_detection(ctx).await
    }

    fn check_nice_target(&self, ctx: &MessageContext) -> Option<TriggerResult> {
        self.patterns.nice_target(&ctx.content)?;
        if !self.is_target(ctx) {
            return None;
        }

        Some(self.reply(
            format!("No way, {} can suck my blu cane. :unamused:", self.config.target_name),
            &self.config.avatars.contempt,
        ))
    }

    fn check_nice(&self, ctx: &MessageContext) -> Option<TriggerResult> {
        let name = self.patterns.nice_target(&ctx.content)?;
        let name = if name.eq_ignore_ascii_case("me") {
            ctx.author.name()
        } else {
            name
        };

        Some(self.reply(
            format!("{}, I think you're pretty blu :wink:", name),
            &self.config.avatars.cheeky,
        ))
    }

    fn check_acknowledge(&self, ctx: &MessageContext) -> Option<TriggerResult> {
        if !self.patterns.is_confirm_or_mean(&ctx.content) || !self.is_target(ctx) {
            return None;
        }

        let now = self.clock.now();
        let mut state = self.lock_state();
        if !state.mentioned_within(now, mention_window()) {
            return None;
        }

        if state.escalated_within(now, escalation_window()) {
            state.record_escalation(now);
            debug!(author = %ctx.author, "BlueBot escalating");
            return Some(self.reply(MURDER_RESPONSE, &self.config.avatars.murder));
        }

        Some(self.reply(ACKNOWLEDGE_RESPONSE, &self.config.avatars.default))
    }

    fn check_acknowledge_other(&self, ctx: &MessageContext) -> Option<TriggerResult> {
        if self.is_target(ctx) {
            return None;
        }

        let content = &ctx.content;
        if !self.patterns.is_confirm_or_mean(content) && !self.patterns.default.is_match(content) {
            return None;
        }

        let now = self.clock.now();
        let mut state = self.lock_state();
        if !state.mentioned_within(now, mention_window()) {
            return None;
        }
        state.record_escalation(now);
        drop(state);

        let response = CHEEKY_RESPONSES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(MENTION_RESPONSE);
        Some(self.reply(response, &self.config.avatars.default))
    }

    fn check_mention(&self, ctx: &MessageContext) -> Option<TriggerResult> {
        if !self.patterns.default.is_match(&ctx.content) {
            return None;
        }

        self.lock_state().record_mention(self.clock.now());
        Some(self.reply(MENTION_RESPONSE, &self.config.avatars.default))
    }

    /// Fails open: any detector error means no reply
    async fn check_detection(&self, ctx: &MessageContext) -> Option<TriggerResult> {
        let detector = self.detector.as_ref()?;
        let content = ctx.content.trim();
        if content.is_empty() {
            return None;
        }

        if !detector.detect_or_false(content, DECEPTIVE_CHECK_PROMPT).await {
            return None;
        }

        self.lock_state().record_mention(self.clock.now());
        Some(self.reply(MENTION_RESPONSE, &self.config.avatars.default))
    }

    fn is_target(&self, ctx: &MessageContext) -> bool {
        self.config.target_user_id.as_deref() == Some(ctx.author.id.as_str())
    }

    fn reply(&self, response: impl Into<String>, avatar_url: &str) -> TriggerResult {
        TriggerResult::respond(response, BotIdentity::new(BOT_NAME, avatar_url))
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ReplyPlugin for BlueBot {
    fn name(&self) -> &str {
        BOT_NAME
    }

    fn description(&self) -> &str {
        "Listens for blue and remembers who said it"
    }

    async fn evaluate(&self, ctx: &MessageContext) -> Option<TriggerResult> {
        self.check_all(ctx).await
    }

    fn reset(&self) {
        *self.lock_state() = ConversationState::default();
    }
}
