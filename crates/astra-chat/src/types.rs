//! Shared value types for the conversational engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered topic snippets from one web lookup, referenced 1-based by users.
pub type TopicList = Vec<String>;

/// Normalize user text into a cache key.
pub fn normalize_query(query: &str) -> String {
    query.to_lowercase()
}

// =============================================================================
// Sentiment
// =============================================================================

/// Coarse polarity of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

// =============================================================================
// DeliveryRate
// =============================================================================

/// Signed speech-rate offset, independent of the reply text.
///
/// Always within `[DeliveryRate::MIN, DeliveryRate::MAX]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DeliveryRate(i8);

impl DeliveryRate {
    pub const MIN: i8 = -10;
    pub const MAX: i8 = 10;
    pub const NEUTRAL: DeliveryRate = DeliveryRate(0);

    /// Create a rate, clamping into the supported range.
    pub fn new(value: i8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> i8 {
        self.0
    }

    pub fn is_neutral(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DeliveryRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

// =============================================================================
// Turn output
// =============================================================================

/// Which dispatch rule produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRoute {
    Greeting,
    Thanks,
    Farewell,
    FollowUp,
    Knowledge,
}

impl fmt::Display for TurnRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnRoute::Greeting => "greeting",
            TurnRoute::Thanks => "thanks",
            TurnRoute::Farewell => "farewell",
            TurnRoute::FollowUp => "follow_up",
            TurnRoute::Knowledge => "knowledge",
        };
        f.write_str(name)
    }
}

/// Result of one dialogue turn.
///
/// `text` is `None` only when a follow-up request named no item number;
/// callers must treat that as "nothing to say", not as an empty reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReply {
    pub text: Option<String>,
    pub rate: DeliveryRate,
    pub route: TurnRoute,
}

impl TurnReply {
    /// Reply delivered at neutral rate.
    pub fn neutral(text: Option<String>, route: TurnRoute) -> Self {
        Self {
            text,
            rate: DeliveryRate::NEUTRAL,
            route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query_lowercases() {
        assert_eq!(normalize_query("Paris"), "paris");
        assert_eq!(normalize_query("EIFFEL Tower?"), "eiffel tower?");
        assert_eq!(normalize_query(""), "");
    }

    #[test]
    fn test_normalize_query_keeps_whitespace() {
        assert_eq!(normalize_query("  Paris "), "  paris ");
    }

    #[test]
    fn test_delivery_rate_clamps() {
        assert_eq!(DeliveryRate::new(2).value(), 2);
        assert_eq!(DeliveryRate::new(-2).value(), -2);
        assert_eq!(DeliveryRate::new(42).value(), DeliveryRate::MAX);
        assert_eq!(DeliveryRate::new(i8::MIN).value(), DeliveryRate::MIN);
    }

    #[test]
    fn test_delivery_rate_display_is_signed() {
        assert_eq!(DeliveryRate::new(2).to_string(), "+2");
        assert_eq!(DeliveryRate::new(-2).to_string(), "-2");
        assert_eq!(DeliveryRate::NEUTRAL.to_string(), "+0");
    }

    #[test]
    fn test_delivery_rate_default_is_neutral() {
        assert!(DeliveryRate::default().is_neutral());
        assert!(!DeliveryRate::new(1).is_neutral());
    }

    #[test]
    fn test_sentiment_display() {
        assert_eq!(Sentiment::Positive.to_string(), "positive");
        assert_eq!(Sentiment::Neutral.to_string(), "neutral");
        assert_eq!(Sentiment::Negative.to_string(), "negative");
    }

    #[test]
    fn test_turn_reply_serializes_flat_rate() {
        let reply = TurnReply {
            text: Some("Hello!".to_string()),
            rate: DeliveryRate::new(-2),
            route: TurnRoute::Knowledge,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["text"], "Hello!");
        assert_eq!(json["rate"], -2);
        assert_eq!(json["route"], "knowledge");
    }

    #[test]
    fn test_turn_reply_none_text_serializes_null() {
        let reply = TurnReply::neutral(None, TurnRoute::FollowUp);
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json["text"].is_null());
        assert_eq!(json["route"], "follow_up");
    }
}
