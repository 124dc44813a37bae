//! Error types for the conversational engine.
//!
//! None of these reach the presentation layer as failures: follow-up errors
//! become reply text and speech errors are logged by the voice layer.

use crate::intent::ItemNumber;

/// Errors from follow-up resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("item {index} is outside the valid range 1 to {len}")]
    FollowUpIndexOutOfRange { index: ItemNumber, len: usize },
    #[error("no topic list to elaborate on")]
    FollowUpNoContext,
}

/// Errors from the speech backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    #[error("speech synthesis error: {0}")]
    Synthesis(String),
    #[error("speech recognition error: {0}")]
    Recognition(String),
    /// The input stream ended; no further utterances will arrive.
    #[error("speech input closed")]
    InputClosed,
}
