//! Keyword intent table.
//!
//! Turns are routed by an ordered list of rules; the first rule whose
//! predicate matches wins and anything unmatched goes to knowledge retrieval.
//! Matching is a case-insensitive substring test, so "hi" also fires inside
//! longer words.

use crate::types::TurnRoute;

/// Phrase that switches a turn into follow-up resolution.
pub const FOLLOW_UP_TRIGGER: &str = "tell me more about item";

const GREETINGS: &[&str] = &["hi", "hello", "hey", "good morning", "good evening"];
const THANKS: &[&str] = &["thank you", "thanks", "thx"];
const FAREWELLS: &[&str] = &["bye", "goodbye", "see you"];

// =============================================================================
// Rules
// =============================================================================

/// A set of trigger phrases that all map to one canned reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseRule {
    pub route: TurnRoute,
    pub triggers: Vec<String>,
    pub reply: String,
}

impl PhraseRule {
    pub fn new(route: TurnRoute, triggers: &[&str], reply: &str) -> Self {
        Self {
            route,
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
            reply: reply.to_string(),
        }
    }

    /// Whether any trigger occurs in the already lower-cased message.
    pub fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t.as_str()))
    }
}

#[derive(Debug, Clone)]
enum IntentRule {
    Phrase(PhraseRule),
    FollowUp(String),
}

/// Outcome of routing one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent<'a> {
    Phrase(&'a PhraseRule),
    FollowUp,
    Knowledge,
}

/// Ordered first-match-wins intent rules.
#[derive(Debug, Clone)]
pub struct IntentTable {
    rules: Vec<IntentRule>,
}

impl Default for IntentTable {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentTable {
    /// Greetings, then thanks, then farewells, then the follow-up trigger.
    pub fn new() -> Self {
        Self {
            rules: vec![
                IntentRule::Phrase(PhraseRule::new(
                    TurnRoute::Greeting,
                    GREETINGS,
                    "Hello! How can I help you today?",
                )),
                IntentRule::Phrase(PhraseRule::new(
                    TurnRoute::Thanks,
                    THANKS,
                    "You're welcome! Feel free to ask me anything.",
                )),
                IntentRule::Phrase(PhraseRule::new(
                    TurnRoute::Farewell,
                    FAREWELLS,
                    "Goodbye! Have a great day!",
                )),
                IntentRule::FollowUp(FOLLOW_UP_TRIGGER.to_string()),
            ],
        }
    }

    /// Route a raw user message.
    pub fn classify(&self, message: &str) -> Intent<'_> {
        let lowered = message.to_lowercase();
        for rule in &self.rules {
            match rule {
                IntentRule::Phrase(phrase) if phrase.matches(&lowered) => {
                    return Intent::Phrase(phrase);
                }
                IntentRule::FollowUp(trigger) if lowered.contains(trigger.as_str()) => {
                    return Intent::FollowUp;
                }
                _ => {}
            }
        }
        Intent::Knowledge
    }
}

/// An item number exactly as the user wrote it.
///
/// Kept as canonical decimal text rather than a machine integer so that
/// numbers of any size can be rejected with the value the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemNumber {
    text: String,
}

impl ItemNumber {
    /// Parse a `[+-]?digits` token. The sign `+` and leading zeros are dropped.
    pub fn parse(token: &str) -> Option<Self> {
        let (negative, digits) = match token.as_bytes().first()? {
            b'-' => (true, &token[1..]),
            b'+' => (false, &token[1..]),
            _ => (false, token),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let digits = digits.trim_start_matches('0');
        let text = if digits.is_empty() {
            "0".to_string()
        } else if negative {
            format!("-{}", digits)
        } else {
            digits.to_string()
        };
        Some(Self { text })
    }

    /// Zero-based list position. `None` below 1 or beyond `usize`.
    pub fn position(&self) -> Option<usize> {
        self.text.parse::<usize>().ok()?.checked_sub(1)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for ItemNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Extract the item number from a follow-up request.
///
/// Returns the first integer token that directly follows a standalone
/// `item` token; punctuation attached to the number disqualifies it.
pub fn extract_item_index(message: &str) -> Option<ItemNumber> {
    let lowered = message.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    words
        .windows(2)
        .filter(|pair| pair[0] == "item")
        .find_map(|pair| ItemNumber::parse(pair[1]))
}

// =============================================================================
// Tests
// =============================================================================
