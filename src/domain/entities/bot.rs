use super::ConditionNode;

/// How a reply's display name and avatar are derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySpec {
    /// Fixed name and avatar
    Static { bot_name: String, avatar_url: String },
    /// Impersonate the member with the given id
    Mimic { as_member: String },
    /// Impersonate an arbitrary eligible member
    Random,
}

impl IdentitySpec {
    pub fn kind(&self) -> &'static str {
        match self {
            IdentitySpec::Static { .. } => "static",
            IdentitySpec::Mimic { .. } => "mimic",
            IdentitySpec::Random => "random",
        }
    }
}

/// One or more candidate reply texts
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSet(Vec<String>);

impl ResponseSet {
    pub fn single(text: impl Into<String>) -> Self {
        Self(vec![text.into()])
    }

    pub fn many<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(texts.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// A rule pairing a condition tree with optional responses
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerSpec {
    pub name: Option<String>,
    pub conditions: ConditionNode,
    pub responses: Option<ResponseSet>,
}

impl TriggerSpec {
    pub fn new(conditions: ConditionNode) -> Self {
        Self {
            name: None,
            conditions,
            responses: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_responses(mut self, responses: ResponseSet) -> Self {
        self.responses = Some(responses);
        self
    }

    /// Name for logs; anonymous triggers are reported by position
    pub fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("trigger#{}", index))
    }
}

/// A validated, declarative reply bot
#[derive(Debug, Clone, PartialEq)]
pub struct BotDefinition {
    pub name: String,
    pub identity: IdentitySpec,
    pub responses: ResponseSet,
    pub triggers: Vec<TriggerSpec>,
    pub ignore_bots: bool,
    pub ignore_humans: bool,
}

impl BotDefinition {
    pub fn new(name: impl Into<String>, identity: IdentitySpec) -> Self {
        Self {
            name: name.into(),
            identity,
            responses: ResponseSet::default(),
            triggers: Vec::new(),
            ignore_bots: true,
            ignore_humans: false,
        }
    }

    pub fn with_responses(mut self, responses: ResponseSet) -> Self {
        self.responses = responses;
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerSpec) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn ignore_bots(mut self, ignore: bool) -> Self {
        self.ignore_bots = ignore;
        self
    }

    pub fn ignore_humans(mut self, ignore: bool) -> Self {
        self.ignore_humans = ignore;
        self
    }
}
