/// Display name and avatar a reply is posted under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub bot_name: String,
    pub avatar_url: String,
}

impl BotIdentity {
    pub fn new(bot_name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            avatar_url: avatar_url.into(),
        }
    }
}

/// Allow/block verdict of the admission filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDecision {
    pub should_process: bool,
    pub reason: String,
    pub was_bot_message: bool,
    pub target_bot: Option<String>,
}

impl FilterDecision {
    pub fn allow(reason: impl Into<String>, was_bot_message: bool) -> Self {
        Self {
            should_process: true,
            reason: reason.into(),
            was_bot_message,
            target_bot: None,
        }
    }

    pub fn block(reason: impl Into<String>, was_bot_message: bool) -> Self {
        Self {
            should_process: false,
            reason: reason.into(),
            was_bot_message,
            target_bot: None,
        }
    }

    pub fn for_bot(mut self, bot: Option<&str>) -> Self {
        self.target_bot = bot.map(str::to_string);
        self
    }
}

/// A reply a bot decided to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerResult {
    pub should_respond: bool,
    pub response: String,
    pub avatar_url: String,
    pub bot_name: String,
}

impl TriggerResult {
    pub fn respond(response: impl Into<String>, identity: BotIdentity) -> Self {
        Self {
            should_respond: true,
            response: response.into(),
            avatar_url: identity.avatar_url,
            bot_name: identity.bot_name,
        }
    }

    pub fn identity(&self) -> BotIdentity {
        BotIdentity::new(self.bot_name.clone(), self.avatar_url.clone())
    }
}
