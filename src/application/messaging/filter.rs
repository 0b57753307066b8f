//! Centralized message filter - decides whether a message reaches bot evaluation

use std::collections::HashSet;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::entities::{FilterDecision, MessageContext};

/// Bots whose messages inverse-behavior bots must never react to
const EXCLUDED_BOT_PATTERNS: &[&str] = &["covabot", "cova-bot", "cova_bot"];

/// Filter configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FilterConfig {
    /// Our own user id; unset until the connection is ready
    pub current_bot_user_id: Option<String>,
    /// Bot authors allowed through default bot filtering
    pub whitelisted_bot_ids: HashSet<String>,
    /// Bot names that only react to other bots
    pub inverse_behavior_bots: HashSet<String>,
    /// Log every decision; never changes the outcome
    pub debug_mode: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            current_bot_user_id: None,
            whitelisted_bot_ids: HashSet::new(),
            inverse_behavior_bots: HashSet::from(["BotBot".to_string()]),
            debug_mode: false,
        }
    }
}

/// Admission gate in front of per-bot evaluation
pub struct CentralizedMessageFilter {
    config: RwLock<FilterConfig>,
}

impl CentralizedMessageFilter {
    pub fn new(config: FilterConfig) -> Self {
        log_configuration(&config);
        Self {
            config: RwLock::new(config),
        }
    }

    /// Decide whether `msg` should be offered to `requesting_bot` (or to all
    /// bots when `None`).
    ///
    /// Checks run in a fixed order: self-trigger prevention, inverse-behavior
    /// bots, bot-authored messages, then ordinary human messages.
    pub fn decide(&self, msg: &MessageContext, requesting_bot: Option<&str>) -> FilterDecision {
        let config = self.config.read().unwrap_or_else(|e| e.into_inner());
        let decision = evaluate(&config, msg, requesting_bot).for_bot(requesting_bot);

        if config.debug_mode {
            log_decision(msg, &decision, requesting_bot);
        }
        decision
    }

    /// Apply a partial update, e.g. once our own user id is known
    pub fn update_config(&self, update: impl FnOnce(&mut FilterConfig)) {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        update(&mut config);
        log_configuration(&config);
    }

    pub fn set_current_bot_user_id(&self, id: impl Into<String>) {
        let id = id.into();
        self.update_config(|config| config.current_bot_user_id = Some(id));
    }

    pub fn is_whitelisted(&self, author_id: &str) -> bool {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .whitelisted_bot_ids
            .contains(author_id)
    }

    pub fn is_inverse_behavior(&self, bot_name: &str) -> bool {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .inverse_behavior_bots
            .contains(bot_name)
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> FilterConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for CentralizedMessageFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

fn evaluate(config: &FilterConfig, msg: &MessageContext, requesting_bot: Option<&str>) -> FilterDecision {
    let author = &msg.author;

    if config.current_bot_user_id.as_deref() == Some(author.id.as_str()) {
        return FilterDecision::block("Self-trigger prevention: Message from current bot", author.is_bot);
    }

    let inverse = requesting_bot.is_some_and(|name| config.inverse_behavior_bots.contains(name));
    if inverse && !author.is_bot {
        return FilterDecision::block(
            format!(
                "Inverse behavior bot '{}' ignores user messages",
                requesting_bot.unwrap_or_default()
            ),
            false,
        );
    }

    if author.is_bot {
        if config.whitelisted_bot_ids.contains(&author.id) {
            return FilterDecision::allow(
                format!("Bot {} is whitelisted", author),
                true,
            );
        }

        if inverse {
            if is_excluded_bot(msg) {
                return FilterDecision::block(
                    format!("Bot {} is excluded from processing", author.name()),
                    true,
                );
            }
            return FilterDecision::allow(
                format!("Inverse behavior bot processing bot message from {}", author.name()),
                true,
            );
        }

        return FilterDecision::block(
            format!("Default bot filtering: ignoring message from bot {}", author.name()),
            true,
        );
    }

    FilterDecision::allow("Regular user message", false)
}

/// Case-insensitive substring match on username or display name
fn is_excluded_bot(msg: &MessageContext) -> bool {
    let names = [msg.author.username.as_deref(), msg.author.display_name.as_deref()];
    names.into_iter().flatten().any(|name| {
        let name = name.to_lowercase();
        EXCLUDED_BOT_PATTERNS.iter().any(|pattern| name.contains(pattern))
    })
}

fn log_decision(msg: &MessageContext, decision: &FilterDecision, requesting_bot: Option<&str>) {
    let action = if decision.should_process { "ALLOWED" } else { "BLOCKED" };
    debug!(
        bot = requesting_bot.unwrap_or("GLOBAL"),
        author = %msg.author,
        is_bot = msg.author.is_bot,
        reason = %decision.reason,
        content = %msg.preview(100),
        "{} message",
        action
    );
}

fn log_configuration(config: &FilterConfig) {
    if !config.debug_mode {
        return;
    }

    let join = |set: &HashSet<String>| {
        if set.is_empty() {
            "None".to_string()
        } else {
            let mut items: Vec<_> = set.iter().cloned().collect();
            items.sort();
            items.join(", ")
        }
    };

    info!("Centralized message filter configuration:");
    info!("  Current bot id: {}", config.current_bot_user_id.as_deref().unwrap_or("Not set"));
    info!("  Whitelisted bot ids: {}", join(&config.whitelisted_bot_ids));
    info!("  Inverse behavior bots: {}", join(&config.inverse_behavior_bots));
}
