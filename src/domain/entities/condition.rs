//! Condition tree - the predicate language triggers are written in

use std::fmt;

/// Leaf predicates over a single message
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Constant outcome; `always: false` disables a trigger
    Always(bool),
    /// Case-insensitive whole-word match
    ContainsWord(String),
    /// Case-insensitive substring match
    ContainsPhrase(String),
    /// Case-insensitive regular expression, compiled on evaluation
    MatchesRegex(String),
    /// Exact author id
    FromUser(String),
    /// Exact channel id
    InChannel(String),
}

/// Boolean composition operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    AllOf,
    AnyOf,
}

/// One node of a condition tree
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    Literal(Literal),
    Combinator(Combinator, Vec<ConditionNode>),
    Not(Box<ConditionNode>),
    /// Percentage in `[0, 100]`, sampled fresh on every evaluation
    Chance(f64),
}

impl ConditionNode {
    pub fn always() -> Self {
        Self::Literal(Literal::Always(true))
    }

    pub fn never() -> Self {
        Self::Literal(Literal::Always(false))
    }

    pub fn contains_word(word: impl Into<String>) -> Self {
        Self::Literal(Literal::ContainsWord(word.into()))
    }

    pub fn contains_phrase(phrase: impl Into<String>) -> Self {
        Self::Literal(Literal::ContainsPhrase(phrase.into()))
    }

    pub fn matches_regex(pattern: impl Into<String>) -> Self {
        Self::Literal(Literal::MatchesRegex(pattern.into()))
    }

    pub fn from_user(id: impl Into<String>) -> Self {
        Self::Literal(Literal::FromUser(id.into()))
    }

    pub fn in_channel(id: impl Into<String>) -> Self {
        Self::Literal(Literal::InChannel(id.into()))
    }

    pub fn all_of(children: Vec<ConditionNode>) -> Self {
        Self::Combinator(Combinator::AllOf, children)
    }

    pub fn any_of(children: Vec<ConditionNode>) -> Self {
        Self::Combinator(Combinator::AnyOf, children)
    }

    pub fn not(child: ConditionNode) -> Self {
        Self::Not(Box::new(child))
    }

    pub fn with_chance(percent: f64) -> Self {
        Self::Chance(percent)
    }

    /// Number of nodes in the tree, including this one
    pub fn size(&self) -> usize {
        match self {
            Self::Literal(_) | Self::Chance(_) => 1,
            Self::Not(child) => 1 + child.size(),
            Self::Combinator(_, children) => 1 + children.iter().map(Self::size).sum::<usize>(),
        }
    }
}

impl fmt::Display for ConditionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(Literal::Always(v)) => write!(f, "always({})", v),
            Self::Literal(Literal::ContainsWord(w)) => write!(f, "contains_word({:?})", w),
            Self::Literal(Literal::ContainsPhrase(p)) => write!(f, "contains_phrase({:?})", p),
            Self::Literal(Literal::MatchesRegex(r)) => write!(f, "matches_regex({:?})", r),
            Self::Literal(Literal::FromUser(id)) => write!(f, "from_user({})", id),
            Self::Literal(Literal::InChannel(id)) => write!(f, "in_channel({})", id),
            Self::Combinator(kind, children) => {
                let name = match kind {
                    Combinator::AllOf => "all_of",
                    Combinator::AnyOf => "any_of",
                };
                write!(f, "{}[", name)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, "]")
            }
            Self::Not(child) => write!(f, "not({})", child),
            Self::Chance(p) => write!(f, "with_chance({})", p),
        }
    }
}
