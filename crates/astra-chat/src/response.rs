//! Reply text composition.
//!
//! Every user-facing sentence the engine produces is built here, including
//! the text that stands in for absorbed errors.

use crate::error::ChatError;
use crate::types::Sentiment;

const TOPIC_LIST_HEADER: &str =
    "I couldn't find a Wikipedia summary, but here are some related topics:\n";
const TOPIC_LIST_FOOTER: &str =
    "\nYou can ask me to 'Tell me more about item X' to get details.";
const NOT_FOUND: &str = "Sorry, I couldn't find relevant information.";
const AMBIGUOUS: &str = "Your query may refer to multiple things, please be more specific.";
const NO_TOPIC_CONTEXT: &str = "Sorry, I don't have any topics to give more info about.";
const POSITIVE_DECORATION: &str = "😊 I'm glad you feel good! Let me help you.";
const NEGATIVE_DECORATION: &str = "🙏 I'm sorry to hear that. I'll do my best to assist you.";

/// Builds reply text for answers, fallbacks and follow-ups.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseComposer;

impl ResponseComposer {
    pub fn new() -> Self {
        Self
    }

    /// Numbered topic list with an invitation to follow up.
    pub fn topic_list(&self, topics: &[String]) -> String {
        let mut answer = String::from(TOPIC_LIST_HEADER);
        for (i, topic) in topics.iter().enumerate() {
            answer.push_str(&format!("{}. About {}\n", i + 1, topic));
        }
        answer.push_str(TOPIC_LIST_FOOTER);
        answer
    }

    pub fn not_found(&self) -> String {
        NOT_FOUND.to_string()
    }

    pub fn ambiguous(&self) -> String {
        AMBIGUOUS.to_string()
    }

    /// Reply for a follow-up whose topic lookup produced nothing.
    pub fn topic_details_missing(&self, topic: &str) -> String {
        format!("Sorry, I couldn't find detailed info for '{}'.", topic)
    }

    /// Reply text for a rejected follow-up.
    pub fn describe_error(&self, err: &ChatError) -> String {
        match err {
            ChatError::FollowUpNoContext => NO_TOPIC_CONTEXT.to_string(),
            ChatError::FollowUpIndexOutOfRange { index, len } => format!(
                "Invalid item number {}. Please choose between 1 and {}.",
                index, len
            ),
        }
    }

    /// Append the affect marker for the user's sentiment.
    pub fn decorate(&self, answer: String, sentiment: Sentiment) -> String {
        match sentiment {
            Sentiment::Positive => answer + POSITIVE_DECORATION,
            Sentiment::Negative => answer + NEGATIVE_DECORATION,
            Sentiment::Neutral => answer,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
