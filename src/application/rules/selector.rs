//! Trigger selector - first matching trigger wins

use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::evaluator::ConditionEvaluator;
use crate::application::errors::CapabilityError;
use crate::domain::entities::{BotDefinition, MessageContext, ResponseSet, TriggerResult};
use crate::domain::traits::{resolve_identity, IdentityProvider};

/// The winning trigger and the reply text chosen for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub trigger: String,
    pub response: String,
}

/// Walks a bot's triggers in declaration order
pub struct TriggerSelector {
    evaluator: ConditionEvaluator,
}

impl TriggerSelector {
    pub fn new(evaluator: ConditionEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &ConditionEvaluator {
        &self.evaluator
    }

    /// Pick the reply text for `ctx`, if any trigger matches.
    ///
    /// A trigger whose conditions fail to evaluate counts as non-matching.
    /// Nothing after the first match is evaluated.
    pub fn select(&self, bot: &BotDefinition, ctx: &MessageContext) -> Option<Selection> {
        for (index, trigger) in bot.triggers.iter().enumerate() {
            let label = trigger.label(index);
            match self.evaluator.evaluate(&trigger.conditions, ctx) {
                Ok(true) => {
                    let responses = trigger
                        .responses
                        .as_ref()
                        .filter(|r| !r.is_empty())
                        .unwrap_or(&bot.responses);

                    let Some(response) = pick(responses) else {
                        warn!(bot = %bot.name, trigger = %label, "Trigger matched but no responses are defined");
                        return None;
                    };

                    debug!(bot = %bot.name, trigger = %label, message = %ctx.id, "Trigger fired");
                    return Some(Selection {
                        trigger: label,
                        response,
                    });
                }
                Ok(false) => continue,
                Err(e) => {
                    debug!(bot = %bot.name, trigger = %label, error = %e, "Condition evaluation failed, treating as no match");
                    continue;
                }
            }
        }
        None
    }

    /// Select a reply and resolve the identity it is posted under
    pub async fn select_with_identity(
        &self,
        bot: &BotDefinition,
        ctx: &MessageContext,
        identities: &dyn IdentityProvider,
    ) -> Result<Option<TriggerResult>, CapabilityError> {
        let Some(selection) = self.select(bot, ctx) else {
            return Ok(None);
        };

        let identity = resolve_identity(identities, &bot.identity, ctx).await?;
        Ok(Some(TriggerResult::respond(selection.response, identity)))
    }
}

impl Default for TriggerSelector {
    fn default() -> Self {
        Self::new(ConditionEvaluator::new())
    }
}

/// Uniform choice among several responses; a single entry is returned as is
fn pick(responses: &ResponseSet) -> Option<String> {
    match responses.as_slice() {
        [] => None,
        [only] => Some(only.clone()),
        many => many.choose(&mut rand::thread_rng()).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Author, BotIdentity, ConditionNode, IdentitySpec, TriggerSpec};
    use async_trait::async_trait;

    struct NoMembers;

    #[async_trait]
    impl IdentityProvider for NoMembers {
        async fn member(&self, member_id: &str, _ctx: &MessageContext) -> Result<BotIdentity, CapabilityError> {
            Err(CapabilityError::MemberNotFound(member_id.to_string()))
        }

        async fn random_member(&self, _ctx: &MessageContext) -> Result<BotIdentity, CapabilityError> {
            Err(CapabilityError::NoEligibleMember)
        }
    }

    fn static_identity() -> IdentitySpec {
        IdentitySpec::Static {
            bot_name: "TestBot".into(),
            avatar_url: "https://example.com/a.png".into(),
        }
    }

    fn msg(content: &str) -> MessageContext {
        MessageContext::new(Author::new("user-1"), content)
    }

    #[test]
    fn first_matching_trigger_wins() {
        let bot = BotDefinition::new("ordered", static_identity())
            .with_trigger(TriggerSpec::new(ConditionNode::never()).with_responses(ResponseSet::single("never")))
            .with_trigger(TriggerSpec::new(ConditionNode::always()).with_responses(ResponseSet::single("A")))
            .with_trigger(TriggerSpec::new(ConditionNode::always()).with_responses(ResponseSet::single("B")));

        let selection = TriggerSelector::default().select(&bot, &msg("hi")).unwrap();
        assert_eq!(selection.response, "A");
        assert_eq!(selection.trigger, "trigger#1");
    }

    #[test]
    fn falls_back_to_bot_responses() {
        let bot = BotDefinition::new("fallback", static_identity())
            .with_responses(ResponseSet::single("default reply"))
            .with_trigger(TriggerSpec::new(ConditionNode::contains_word("hello")).named("greeting"));

        let selection = TriggerSelector::default().select(&bot, &msg("hello world")).unwrap();
        assert_eq!(selection.response, "default reply");
        assert_eq!(selection.trigger, "greeting");
        assert!(TriggerSelector::default().select(&bot, &msg("goodbye")).is_none());
    }

    #[test]
    fn invalid_regex_only_disables_its_trigger() {
        let bot = BotDefinition::new("regex", static_identity())
            .with_trigger(
                TriggerSpec::new(ConditionNode::matches_regex("([bad"))
                    .with_responses(ResponseSet::single("broken")),
            )
            .with_trigger(
                TriggerSpec::new(ConditionNode::contains_word("ok"))
                    .with_responses(ResponseSet::single("fine")),
            );

        let selection = TriggerSelector::default().select(&bot, &msg("ok then")).unwrap();
        assert_eq!(selection.response, "fine");
    }

    #[test]
    fn picks_among_multiple_responses() {
        let options = ["one", "two", "three"];
        let bot = BotDefinition::new("multi", static_identity())
            .with_responses(ResponseSet::many(options))
            .with_trigger(TriggerSpec::new(ConditionNode::always()));

        let selector = TriggerSelector::default();
        for _ in 0..50 {
            let selection = selector.select(&bot, &msg("x")).unwrap();
            assert!(options.contains(&selection.response.as_str()));
        }
    }

    #[tokio::test]
    async fn static_identity_needs_no_provider_lookup() {
        let bot = BotDefinition::new("static", static_identity())
            .with_responses(ResponseSet::single("Hi!"))
            .with_trigger(TriggerSpec::new(ConditionNode::always()));

        let result = TriggerSelector::default()
            .select_with_identity(&bot, &msg("x"), &NoMembers)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.response, "Hi!");
        assert_eq!(result.bot_name, "TestBot");
        assert!(result.should_respond);
    }

    #[tokio::test]
    async fn mimic_lookup_failure_is_a_capability_error() {
        let bot = BotDefinition::new("mimic", IdentitySpec::Mimic { as_member: "404".into() })
            .with_responses(ResponseSet::single("copy"))
            .with_trigger(TriggerSpec::new(ConditionNode::always()));

        let err = TriggerSelector::default()
            .select_with_identity(&bot, &msg("x"), &NoMembers)
            .await
            .unwrap_err();
        assert_eq!(err, CapabilityError::MemberNotFound("404".into()));
    }
}
