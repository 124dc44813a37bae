//! Conversational engine for Astra.
//!
//! Answers free-text questions by querying two knowledge sources in parallel,
//! caches the answers, resolves "tell me more about item N" follow-ups, and
//! tunes each reply to the sentiment of the user's message.

pub mod broker;
pub mod context;
pub mod error;
pub mod intent;
pub mod orchestrator;
pub mod response;
pub mod sentiment;
pub mod types;
pub mod voice;

#[cfg(test)]
pub(crate) mod testing;

pub use broker::KnowledgeBroker;
pub use context::{ConversationContext, FollowUpResolver};
pub use error::{ChatError, VoiceError};
pub use intent::{IntentTable, ItemNumber, PhraseRule};
pub use orchestrator::DialogueEngine;
pub use response::ResponseComposer;
pub use sentiment::{SentimentClassifier, SentimentScorer, VaderScorer};
pub use types::{normalize_query, DeliveryRate, Sentiment, TopicList, TurnReply, TurnRoute};
pub use voice::{LineListener, LogSpeaker, SpeechToText, TextToSpeech, VoiceInterface};
