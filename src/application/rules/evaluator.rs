//! Condition evaluator - interprets a condition tree against one message

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::Rng;
use regex_lite::{Regex, RegexBuilder};

use crate::application::errors::ConditionError;
use crate::domain::entities::{Combinator, ConditionNode, Literal, MessageContext};

/// Uniform random source for `with_chance` nodes
pub trait Dice: Send + Sync {
    /// A sample in `[0, 100)`
    fn roll(&self) -> f64;
}

/// Thread-local RNG backed dice
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDice;

impl Dice for ThreadDice {
    fn roll(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..100.0)
    }
}

/// Evaluates condition trees; compile results, failures included, are cached per instance
pub struct ConditionEvaluator {
    dice: Arc<dyn Dice>,
    patterns: Mutex<HashMap<String, Result<Regex, ConditionError>>>,
}

impl ConditionEvaluator {
    pub fn new() -> Self {
        Self::with_dice(Arc::new(ThreadDice))
    }

    pub fn with_dice(dice: Arc<dyn Dice>) -> Self {
        Self {
            dice,
            patterns: Mutex::new(HashMap::new()),
        }
    }

    /// Evaluate `node` against `ctx`.
    ///
    /// Combinators short-circuit; an error anywhere in the tree fails the
    /// whole evaluation, which callers treat as "no match".
    pub fn evaluate(&self, node: &ConditionNode, ctx: &MessageContext) -> Result<bool, ConditionError> {
        match node {
            ConditionNode::Literal(literal) => self.evaluate_literal(literal, ctx),
            ConditionNode::Combinator(Combinator::AllOf, children) => {
                for child in children {
                    if !self.evaluate(child, ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ConditionNode::Combinator(Combinator::AnyOf, children) => {
                for child in children {
                    if self.evaluate(child, ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ConditionNode::Not(child) => Ok(!self.evaluate(child, ctx)?),
            ConditionNode::Chance(percent) => {
                let sample = self.dice.roll();
                tracing::trace!(percent, sample, "with_chance sampled");
                Ok(sample < *percent)
            }
        }
    }

    fn evaluate_literal(&self, literal: &Literal, ctx: &MessageContext) -> Result<bool, ConditionError> {
        match literal {
            Literal::Always(value) => Ok(*value),
            Literal::ContainsWord(word) => {
                let pattern = format!(r"\b{}\b", regex_lite::escape(word));
                Ok(self.compiled(&pattern)?.is_match(&ctx.content))
            }
            Literal::ContainsPhrase(phrase) => {
                Ok(ctx.content.to_lowercase().contains(&phrase.to_lowercase()))
            }
            Literal::MatchesRegex(pattern) => Ok(self.compiled(pattern)?.is_match(&ctx.content)),
            Literal::FromUser(id) => Ok(ctx.author.id == *id),
            Literal::InChannel(id) => Ok(ctx.channel_id == *id),
        }
    }

    fn compiled(&self, pattern: &str) -> Result<Regex, ConditionError> {
        let mut cache = self.patterns.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(compiled) = cache.get(pattern) {
            return compiled.clone();
        }

        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConditionError::InvalidRegex {
                pattern: pattern.to_string(),
                message: e.to_string(),
            });
        if let Err(e) = &compiled {
            tracing::warn!(error = %e, "Regex failed to compile; its triggers will never match");
        }
        cache.insert(pattern.to_string(), compiled.clone());
        compiled
    }
}

impl Default for ConditionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
