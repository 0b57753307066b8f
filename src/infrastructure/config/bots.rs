//! Bot-definition document loader
//!
//! The document is a non-empty `reply-bots:` list. Each entry is decoded and
//! validated on its own; a bad entry is rejected and reported without
//! affecting the others.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::{info, warn};

use crate::application::errors::{ConfigValidationError, LoadError};
use crate::domain::entities::{BotDefinition, ConditionNode, IdentitySpec, ResponseSet, TriggerSpec};

const ROOT_KEY: &str = "reply-bots";

/// Accepted definitions in document order, plus every rejection
#[derive(Debug, Default)]
pub struct LoadReport {
    pub bots: Vec<BotDefinition>,
    pub rejected: Vec<ConfigValidationError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "reply-bots")]
    reply_bots: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawBot {
    name: Option<String>,
    identity: Option<RawIdentity>,
    responses: Option<RawResponses>,
    #[serde(default)]
    triggers: Vec<RawTrigger>,
    ignore_bots: Option<bool>,
    ignore_humans: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawIdentity {
    Static {
        #[serde(rename = "botName")]
        bot_name: Option<String>,
        #[serde(rename = "avatarUrl")]
        avatar_url: Option<String>,
    },
    Mimic {
        as_member: Option<Scalar>,
    },
    Random {},
}

/// A single response or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawResponses {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawTrigger {
    name: Option<String>,
    conditions: Option<Value>,
    responses: Option<RawResponses>,
}

/// One condition node; exactly one key may be set
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCondition {
    contains_word: Option<String>,
    contains_phrase: Option<String>,
    #[serde(alias = "matches_pattern")]
    matches_regex: Option<String>,
    from_user: Option<Scalar>,
    in_channel: Option<Scalar>,
    always: Option<bool>,
    with_chance: Option<f64>,
    all_of: Option<Vec<Value>>,
    any_of: Option<Vec<Value>>,
    none_of: Option<Vec<Value>>,
    not: Option<Value>,
}

/// Ids may be written as numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_yaml::Number),
}

impl Scalar {
    fn into_id(self) -> Option<String> {
        let id = match self {
            Scalar::Text(text) => text.trim().to_string(),
            Scalar::Number(n) => n.to_string(),
        };
        (!id.is_empty()).then_some(id)
    }
}

pub fn load_bots(path: impl AsRef<Path>) -> Result<LoadReport, LoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let report = load_bots_str(&content)?;
    info!(
        "Loaded {} bot definitions from {} ({} rejected)",
        report.bots.len(),
        path.display(),
        report.rejected.len()
    );
    Ok(report)
}

/// Parse a document; only YAML syntax and document shape fail the whole load
pub fn load_bots_str(content: &str) -> Result<LoadReport, LoadError> {
    let document: RawDocument = serde_yaml::from_str(content)?;
    let entries = match document.reply_bots {
        Some(entries) if !entries.is_empty() => entries,
        Some(_) => return Err(LoadError::Document(format!("'{}' is empty", ROOT_KEY))),
        None => return Err(LoadError::Document(format!("missing '{}' list", ROOT_KEY))),
    };

    let mut report = LoadReport::default();
    let mut names = HashSet::new();

    for (index, entry) in entries.into_iter().enumerate() {
        match parse_bot(entry, index, &names) {
            Ok(bot) => {
                names.insert(bot.name.clone());
                report.bots.push(bot);
            }
            Err(e) => {
                warn!("Rejected bot definition {}", e);
                report.rejected.push(e);
            }
        }
    }

    Ok(report)
}

fn parse_bot(entry: Value, index: usize, taken: &HashSet<String>) -> Result<BotDefinition, ConfigValidationError> {
    let position = format!("#{}", index);
    let label = entry
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| position.clone(), str::to_string);

    let raw: RawBot = serde_yaml::from_value(entry)
        .map_err(|e| ConfigValidationError::new(&label, e.to_string()))?;

    let name = match raw.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(ConfigValidationError::new(&position, "missing or empty name")),
    };
    let fail = |reason: String| ConfigValidationError::new(&name, reason);

    if taken.contains(&name) {
        return Err(fail("duplicate bot name".into()));
    }

    let identity = validate_identity(raw.identity).map_err(fail)?;
    let responses = match raw.responses {
        Some(responses) => validate_responses(responses, "responses").map_err(fail)?,
        None => ResponseSet::default(),
    };
    if raw.triggers.is_empty() {
        return Err(fail("missing or empty triggers".into()));
    }

    let mut bot = BotDefinition::new(&name, identity)
        .with_responses(responses)
        .ignore_bots(raw.ignore_bots.unwrap_or(true))
        .ignore_humans(raw.ignore_humans.unwrap_or(false));

    for (i, raw_trigger) in raw.triggers.into_iter().enumerate() {
        let trigger = validate_trigger(raw_trigger, i).map_err(fail)?;
        let has_own = trigger.responses.as_ref().is_some_and(|r| !r.is_empty());
        if !has_own && bot.responses.is_empty() {
            return Err(fail(format!("{} has no responses available", trigger.label(i))));
        }
        bot = bot.with_trigger(trigger);
    }

    Ok(bot)
}

fn validate_identity(identity: Option<RawIdentity>) -> Result<IdentitySpec, String> {
    match identity.ok_or("missing identity")? {
        RawIdentity::Static { bot_name, avatar_url } => {
            let bot_name = bot_name
                .filter(|s| !s.trim().is_empty())
                .ok_or("static identity requires botName")?;
            let avatar_url = avatar_url
                .filter(|s| !s.trim().is_empty())
                .ok_or("static identity requires avatarUrl")?;
            if !(avatar_url.starts_with("http://") || avatar_url.starts_with("https://")) {
                return Err(format!("avatarUrl '{}' is not an http(s) URL", avatar_url));
            }
            Ok(IdentitySpec::Static { bot_name, avatar_url })
        }
        RawIdentity::Mimic { as_member } => {
            let member = as_member
                .and_then(Scalar::into_id)
                .ok_or("mimic identity requires as_member")?;
            Ok(IdentitySpec::Mimic { as_member: member })
        }
        RawIdentity::Random {} => Ok(IdentitySpec::Random),
    }
}

fn validate_trigger(raw: RawTrigger, index: usize) -> Result<TriggerSpec, String> {
    let label = raw.name.clone().unwrap_or_else(|| format!("trigger#{}", index));

    let conditions = raw
        .conditions
        .ok_or_else(|| format!("{} has no conditions", label))?;
    let conditions = parse_condition(&conditions).map_err(|e| format!("{}: {}", label, e))?;

    let mut trigger = TriggerSpec::new(conditions);
    if let Some(name) = raw.name {
        trigger = trigger.named(name);
    }
    if let Some(responses) = raw.responses {
        trigger = trigger.with_responses(validate_responses(responses, &format!("{} responses", label))?);
    }
    Ok(trigger)
}

/// One condition node, or a list meaning `all_of` that list
pub fn parse_condition(value: &Value) -> Result<ConditionNode, String> {
    if let Value::Sequence(items) = value {
        return Ok(ConditionNode::all_of(parse_children(items)?));
    }
    if !value.is_mapping() {
        return Err("condition must be a mapping".into());
    }

    let raw: RawCondition = serde_yaml::from_value(value.clone()).map_err(|e| e.to_string())?;
    let set = [
        raw.contains_word.is_some(),
        raw.contains_phrase.is_some(),
        raw.matches_regex.is_some(),
        raw.from_user.is_some(),
        raw.in_channel.is_some(),
        raw.always.is_some(),
        raw.with_chance.is_some(),
        raw.all_of.is_some(),
        raw.any_of.is_some(),
        raw.none_of.is_some(),
        raw.not.is_some(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count();
    if set != 1 {
        return Err(format!("condition must have exactly one key, found {}", set));
    }

    let text = |what: &str, value: String| -> Result<String, String> {
        if value.is_empty() {
            Err(format!("{} requires a non-empty string", what))
        } else {
            Ok(value)
        }
    };
    let id = |what: &str, value: Scalar| -> Result<String, String> {
        value.into_id().ok_or_else(|| format!("{} requires an id", what))
    };

    if let Some(word) = raw.contains_word {
        return Ok(ConditionNode::contains_word(text("contains_word", word)?));
    }
    if let Some(phrase) = raw.contains_phrase {
        return Ok(ConditionNode::contains_phrase(text("contains_phrase", phrase)?));
    }
    if let Some(pattern) = raw.matches_regex {
        return Ok(ConditionNode::matches_regex(text("matches_regex", pattern)?));
    }
    if let Some(user) = raw.from_user {
        return Ok(ConditionNode::from_user(id("from_user", user)?));
    }
    if let Some(channel) = raw.in_channel {
        return Ok(ConditionNode::in_channel(id("in_channel", channel)?));
    }
    if let Some(always) = raw.always {
        return Ok(if always { ConditionNode::always() } else { ConditionNode::never() });
    }
    if let Some(percent) = raw.with_chance {
        if !(0.0..=100.0).contains(&percent) {
            return Err(format!("with_chance {} is outside [0, 100]", percent));
        }
        return Ok(ConditionNode::with_chance(percent));
    }
    if let Some(items) = raw.all_of {
        return Ok(ConditionNode::all_of(parse_children(&items)?));
    }
    if let Some(items) = raw.any_of {
        return Ok(ConditionNode::any_of(parse_children(&items)?));
    }
    if let Some(items) = raw.none_of {
        return Ok(ConditionNode::not(ConditionNode::any_of(parse_children(&items)?)));
    }
    match raw.not {
        Some(child) => Ok(ConditionNode::not(parse_condition(&child)?)),
        None => Err("condition must have exactly one key, found 0".into()),
    }
}

fn parse_children(items: &[Value]) -> Result<Vec<ConditionNode>, String> {
    items.iter().map(parse_condition).collect()
}

fn validate_responses(raw: RawResponses, what: &str) -> Result<ResponseSet, String> {
    let texts = match raw {
        RawResponses::One(text) => vec![text],
        RawResponses::Many(texts) => texts,
    };
    if texts.iter().any(|t| t.trim().is_empty()) {
        return Err(format!("{} contain an empty string", what));
    }
    Ok(ResponseSet::many(texts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reasons(report: &LoadReport) -> Vec<String> {
        report.rejected.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn loads_simple_bot() {
        let report = load_bots_str(
            r#"
reply-bots:
  - name: hello
    identity:
      type: static
      botName: HelloBot
      avatarUrl: https://example.com/hello.png
    responses: "Hi!"
    triggers:
      - name: greeting
        conditions:
          contains_word: hello
"#,
        )
        .unwrap();

        assert!(report.is_clean());
        let bot = &report.bots[0];
        assert_eq!(bot.name, "hello");
        assert_eq!(bot.responses, ResponseSet::single("Hi!"));
        assert_eq!(bot.triggers[0].conditions, ConditionNode::contains_word("hello"));
        assert!(bot.ignore_bots);
        assert!(!bot.ignore_humans);
    }

    #[test]
    fn parses_nested_conditions() {
        let value: Value = serde_yaml::from_str(
            r#"
all_of:
  - any_of:
      - contains_phrase: good morning
      - matches_regex: "\\bgm\\b"
  - not:
      from_user: 12345
  - with_chance: 25
  - always: false
"#,
        )
        .unwrap();

        let node = parse_condition(&value).unwrap();
        assert_eq!(
            node,
            ConditionNode::all_of(vec![
                ConditionNode::any_of(vec![
                    ConditionNode::contains_phrase("good morning"),
                    ConditionNode::matches_regex(r"\bgm\b"),
                ]),
                ConditionNode::not(ConditionNode::from_user("12345")),
                ConditionNode::with_chance(25.0),
                ConditionNode::never(),
            ])
        );
    }

    #[test]
    fn rejects_malformed_condition_nodes() {
        for (yaml, expected) in [
            ("{}", "exactly one key"),
            ("{contains_word: a, from_user: b}", "exactly one key"),
            ("{sounds_like: blue}", "unknown field `sounds_like`"),
            ("{with_chance: 150}", "outside"),
            ("{with_chance: -1}", "outside"),
            ("{all_of: nope}", "expected a sequence"),
            ("contains_word", "must be a mapping"),
            ("{contains_word: ''}", "non-empty string"),
        ] {
            let value: Value = serde_yaml::from_str(yaml).unwrap();
            let err = parse_condition(&value).unwrap_err();
            assert!(err.contains(expected), "{} -> {}", yaml, err);
        }
    }

    #[test]
    fn rejects_bad_bots_individually() {
        let report = load_bots_str(
            r#"
reply-bots:
  - name: good
    identity: { type: random }
    responses: [a, b]
    triggers:
      - conditions: { always: true }
  - name: no-identity
    responses: x
    triggers:
      - conditions: { always: true }
  - name: bad-avatar
    identity: { type: static, botName: B, avatarUrl: "ftp://x" }
    responses: x
    triggers:
      - conditions: { always: true }
  - name: mimic-nobody
    identity: { type: mimic }
    responses: x
    triggers:
      - conditions: { always: true }
  - name: no-triggers
    identity: { type: random }
    responses: x
    triggers: []
  - name: no-responses
    identity: { type: random }
    triggers:
      - name: lonely
        conditions: { always: true }
  - name: empty-response
    identity: { type: random }
    responses: ["ok", "  "]
    triggers:
      - conditions: { always: true }
  - name: good
    identity: { type: random }
    responses: dup
    triggers:
      - conditions: { always: true }
  - identity: { type: random }
    responses: x
    triggers:
      - conditions: { always: true }
  - name: no-conditions
    identity: { type: random }
    responses: x
    triggers:
      - name: t
"#,
        )
        .unwrap();

        assert_eq!(report.bots.len(), 1);
        assert_eq!(report.bots[0].name, "good");
        assert_eq!(report.bots[0].responses.len(), 2);

        let reasons = reasons(&report);
        assert_eq!(reasons.len(), 9);
        assert!(reasons[0].contains("missing identity"));
        assert!(reasons[1].contains("not an http(s) URL"));
        assert!(reasons[2].contains("as_member"));
        assert!(reasons[3].contains("triggers"));
        assert!(reasons[4].contains("lonely has no responses"));
        assert!(reasons[5].contains("empty string"));
        assert!(reasons[6].contains("duplicate"));
        assert!(reasons[7].starts_with("bot '#8'"));
        assert!(reasons[8].contains("no conditions"));
    }

    #[test]
    fn invalid_regex_is_accepted_at_load_time() {
        let report = load_bots_str(
            r#"
reply-bots:
  - name: regex
    identity: { type: random }
    responses: x
    triggers:
      - conditions: { matches_regex: "([unclosed" }
"#,
        )
        .unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn numeric_mimic_member_is_stringified() {
        let report = load_bots_str(
            r#"
reply-bots:
  - name: copycat
    identity: { type: mimic, as_member: 139592376443338752 }
    responses: x
    triggers:
      - conditions: { in_channel: 42 }
"#,
        )
        .unwrap();

        let bot = &report.bots[0];
        assert_eq!(
            bot.identity,
            IdentitySpec::Mimic { as_member: "139592376443338752".into() }
        );
        assert_eq!(bot.triggers[0].conditions, ConditionNode::in_channel("42"));
    }

    #[test]
    fn syntax_errors_fail_the_whole_document() {
        assert!(matches!(load_bots_str("reply-bots: [\n  - name"), Err(LoadError::Yaml(_))));
        assert!(matches!(load_bots_str("reply-bots: 3"), Err(LoadError::Yaml(_))));
    }

    #[test]
    fn missing_or_empty_root_list_fails_the_document() {
        for yaml in ["some-other-key:\n  - name: test\n", "reply-bots: []\n", "reply-bots:\n"] {
            assert!(matches!(load_bots_str(yaml), Err(LoadError::Document(_))), "{}", yaml);
        }
        assert!(load_bots_str("").is_err());
    }

    #[test]
    fn none_of_and_pattern_alias_are_accepted() {
        let report = load_bots_str(
            r#"
reply-bots:
  - name: nonebot
    identity: { type: random }
    responses: x
    triggers:
      - conditions:
          none_of:
            - contains_word: banana
            - contains_word: apple
  - name: patbot
    identity: { type: random }
    responses: x
    triggers:
      - conditions:
          matches_pattern: "test\\d+"
"#,
        )
        .unwrap();

        assert!(report.is_clean(), "{:?}", reasons(&report));
        assert_eq!(
            report.bots[0].triggers[0].conditions,
            ConditionNode::not(ConditionNode::any_of(vec![
                ConditionNode::contains_word("banana"),
                ConditionNode::contains_word("apple"),
            ]))
        );
        assert_eq!(report.bots[1].triggers[0].conditions, ConditionNode::matches_regex(r"test\d+"));
    }

    #[test]
    fn none_of_matches_only_when_no_child_does() {
        use crate::application::rules::ConditionEvaluator;
        use crate::domain::entities::{Author, MessageContext};

        let value: Value = serde_yaml::from_str("none_of: [{contains_word: banana}, {contains_word: apple}]").unwrap();
        let node = parse_condition(&value).unwrap();
        let evaluator = ConditionEvaluator::new();

        let msg = |text: &str| MessageContext::new(Author::new("u"), text);
        assert!(evaluator.evaluate(&node, &msg("I love orange")).unwrap());
        assert!(!evaluator.evaluate(&node, &msg("I love banana")).unwrap());
        assert!(evaluator.evaluate(&ConditionNode::not(ConditionNode::any_of(vec![])), &msg("x")).unwrap());
    }

    #[test]
    fn undecodable_entry_is_rejected_alone() {
        let report = load_bots_str(
            r#"
reply-bots:
  - name: odd-identity
    identity: { type: invalid_type }
    responses: x
    triggers:
      - conditions: { always: true }
  - name: odd-responses
    identity: { type: random }
    responses: { text: x }
    triggers:
      - conditions: { always: true }
  - name: fine
    identity: { type: random }
    responses: x
    triggers:
      - conditions: { always: true }
"#,
        )
        .unwrap();

        assert_eq!(report.bots.len(), 1);
        assert_eq!(report.bots[0].name, "fine");
        let reasons = reasons(&report);
        assert!(reasons[0].starts_with("bot 'odd-identity'") && reasons[0].contains("invalid_type"));
        assert!(reasons[1].starts_with("bot 'odd-responses'"));
    }
}
