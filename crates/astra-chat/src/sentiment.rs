//! Sentiment scoring.
//!
//! Produces a compound polarity score in `[-1, 1]` for a message and maps it
//! onto a coarse [`Sentiment`] plus the delivery rate used to speak the reply.

use astra_core::config::SentimentConfig;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::types::{DeliveryRate, Sentiment};

// =============================================================================
// Scorers
// =============================================================================

/// Produces a compound polarity score in `[-1, 1]` for a piece of text.
pub trait SentimentScorer: Send + Sync {
    fn compound(&self, text: &str) -> f32;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> f32 + Send + Sync,
{
    fn compound(&self, text: &str) -> f32 {
        self(text)
    }
}

/// VADER compound score over the full valence lexicon.
///
/// Boosters, negations, ALL-CAPS emphasis, "but" shifts, exclamation marks
/// and emoticons all count.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderScorer;

impl VaderScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for VaderScorer {
    fn compound(&self, text: &str) -> f32 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0) as f32
    }
}

// =============================================================================
// SentimentClassifier
// =============================================================================

/// Maps messages to a [`Sentiment`] and a delivery rate.
pub struct SentimentClassifier {
    scorer: Box<dyn SentimentScorer>,
    positive_threshold: f32,
    negative_threshold: f32,
    positive_rate: DeliveryRate,
    negative_rate: DeliveryRate,
}

impl SentimentClassifier {
    /// Create a classifier backed by the VADER scorer.
    pub fn new(config: &SentimentConfig) -> Self {
        Self::with_scorer(config, VaderScorer)
    }

    /// Create a classifier with a custom scorer.
    pub fn with_scorer(config: &SentimentConfig, scorer: impl SentimentScorer + 'static) -> Self {
        Self {
            scorer: Box::new(scorer),
            positive_threshold: config.positive_threshold,
            negative_threshold: config.negative_threshold,
            positive_rate: DeliveryRate::new(config.positive_rate),
            negative_rate: DeliveryRate::new(config.negative_rate),
        }
    }

    /// Classify a message.
    pub fn classify(&self, text: &str) -> Sentiment {
        let compound = self.scorer.compound(text);
        let sentiment = self.sentiment_for(compound);
        tracing::debug!(compound, sentiment = %sentiment, "Message classified");
        sentiment
    }

    /// Map a compound score onto a sentiment using the configured thresholds.
    pub fn sentiment_for(&self, compound: f32) -> Sentiment {
        if compound >= self.positive_threshold {
            Sentiment::Positive
        } else if compound <= self.negative_threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    /// Delivery rate for a sentiment.
    pub fn delivery_rate(&self, sentiment: Sentiment) -> DeliveryRate {
        match sentiment {
            Sentiment::Positive => self.positive_rate,
            Sentiment::Negative => self.negative_rate,
            Sentiment::Neutral => DeliveryRate::NEUTRAL,
        }
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new(&SentimentConfig::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
