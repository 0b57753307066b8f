//! Content patterns BlueBot listens for

use once_cell::sync::Lazy;
use regex_lite::{Regex, RegexBuilder};

const DEFAULT: &str = r"\b(blue?|bloo|blew|bleu|blau|azul|blou)\b";
const CONFIRM: &str = r"\b(yes|yep|yeah|yup|ya|i did|you got it|sure did|no|nope|nah|not really)\b";
const MEAN: &str = r"\b(hate|stupid|dumb|idiot|annoying|shut up|go away|screw you|fuck\w*)\b";
const NICE: &str = r"\bblue?bot,? say something nice about (?P<n>.+?)[.!?]*$";

/// Compiled BlueBot patterns, all case-insensitive
#[derive(Debug)]
pub struct BluePatterns {
    pub default: Regex,
    pub confirm: Regex,
    pub mean: Regex,
    pub nice: Regex,
}

static SHARED: Lazy<Result<BluePatterns, regex_lite::Error>> = Lazy::new(BluePatterns::compile);

impl BluePatterns {
    pub fn compile() -> Result<Self, regex_lite::Error> {
        Ok(Self {
            default: build(DEFAULT)?,
            confirm: build(CONFIRM)?,
            mean: build(MEAN)?,
            nice: build(NICE)?,
        })
    }

    /// Process-wide compiled set
    pub fn shared() -> Result<&'static Self, String> {
        SHARED.as_ref().map_err(|e| e.to_string())
    }

    /// Name captured from a "say something nice about ..." request
    pub fn nice_target<'a>(&self, content: &'a str) -> Option<&'a str> {
        self.nice
            .captures(content.trim())
            .and_then(|caps| caps.name("n"))
            .map(|m| m.as_str().trim())
            .filter(|name| !name.is_empty())
    }

    pub fn is_confirm_or_mean(&self, content: &str) -> bool {
        self.confirm.is_match(content) || self.mean.is_match(content)
    }
}

fn build(pattern: &str) -> Result<Regex, regex_lite::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spellings_as_words() {
        let patterns = BluePatterns::shared().unwrap();

        for text in ["blue", "BLU!", "so bleu", "azul?", "it was blau"] {
            assert!(patterns.default.is_match(text), "{}", text);
        }
        for text in ["blueberry", "bluetooth", "nothing here"] {
            assert!(!patterns.default.is_match(text), "{}", text);
        }
    }

    #[test]
    fn nice_request_captures_name() {
        let patterns = BluePatterns::shared().unwrap();

        assert_eq!(patterns.nice_target("bluebot say something nice about Alice!"), Some("Alice"));
        assert_eq!(patterns.nice_target("BluBot, say something nice about me"), Some("me"));
        assert_eq!(patterns.nice_target("say something nice about Bob"), None);
    }

    #[test]
    fn confirm_and_mean() {
        let patterns = BluePatterns::shared().unwrap();

        assert!(patterns.is_confirm_or_mean("yes"));
        assert!(patterns.is_confirm_or_mean("Shut up bot"));
        assert!(!patterns.is_confirm_or_mean("yesterday was fine"));
    }
}
