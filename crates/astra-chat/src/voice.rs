//! Spoken input and output.
//!
//! Speech engines are stateful about their rate, so [`VoiceInterface`] sets the
//! reply's delivery rate before each utterance and puts the base rate back
//! afterwards, whether or not speaking succeeded. Failures never reach the
//! caller: a failed utterance is logged, a failed recognition is an empty
//! string.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::error::VoiceError;
use crate::types::{DeliveryRate, TurnReply};

/// Speech synthesis backend.
pub trait TextToSpeech: Send {
    fn set_rate(&mut self, rate: DeliveryRate) -> Result<(), VoiceError>;
    fn speak(&mut self, text: &str) -> Result<(), VoiceError>;
}

/// Speech recognition backend. Each call yields one utterance.
#[async_trait]
pub trait SpeechToText: Send {
    async fn listen(&mut self) -> Result<String, VoiceError>;
}

/// Wraps the speech backends with rate handling and error absorption.
pub struct VoiceInterface {
    listener: Box<dyn SpeechToText>,
    speaker: Option<Box<dyn TextToSpeech>>,
    base_rate: DeliveryRate,
}

impl VoiceInterface {
    /// Voice layer that listens but stays silent until a speaker is attached.
    pub fn new(listener: Box<dyn SpeechToText>, base_rate: DeliveryRate) -> Self {
        Self {
            listener,
            speaker: None,
            base_rate,
        }
    }

    pub fn with_speaker(mut self, speaker: Box<dyn TextToSpeech>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    /// Speak `text` at `rate`, then restore the base rate.
    pub fn speak(&mut self, text: &str, rate: DeliveryRate) {
        let Some(speaker) = self.speaker.as_mut() else {
            return;
        };

        let spoken = speaker.set_rate(rate).and_then(|()| speaker.speak(text));
        if let Err(e) = spoken {
            tracing::error!(error = %e, rate = %rate, "Failed to speak reply");
        }

        if let Err(e) = speaker.set_rate(self.base_rate) {
            tracing::warn!(error = %e, "Failed to restore speech rate");
        }
    }

    /// Speak a turn's reply; replies without text are skipped.
    pub fn speak_reply(&mut self, reply: &TurnReply) {
        if let Some(text) = reply.text.as_deref() {
            self.speak(text, reply.rate);
        }
    }

    /// Capture one utterance.
    ///
    /// Empty when nothing was understood, which callers treat as no turn.
    /// `None` once the input has closed.
    pub async fn listen(&mut self) -> Option<String> {
        match self.listener.listen().await {
            Ok(text) => Some(text),
            Err(VoiceError::InputClosed) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Speech recognition failed");
                Some(String::new())
            }
        }
    }
}

/// Speaker that writes utterances to the log instead of an audio device.
#[derive(Debug, Default)]
pub struct LogSpeaker {
    rate: DeliveryRate,
}

impl LogSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate(&self) -> DeliveryRate {
        self.rate
    }
}

impl TextToSpeech for LogSpeaker {
    fn set_rate(&mut self, rate: DeliveryRate) -> Result<(), VoiceError> {
        self.rate = rate;
        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<(), VoiceError> {
        tracing::info!(rate = %self.rate, chars = text.chars().count(), "Speaking: {}", text);
        Ok(())
    }
}

/// Listener that takes typed lines as recognized utterances.
pub struct LineListener<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> LineListener<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> SpeechToText for LineListener<R> {
    async fn listen(&mut self) -> Result<String, VoiceError> {
        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(line.trim().to_string()),
            Ok(None) => Err(VoiceError::InputClosed),
            // a line that is not UTF-8 is skipped like an unrecognized phrase
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                Err(VoiceError::Recognition(e.to_string()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Input stream failed");
                Err(VoiceError::InputClosed)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
