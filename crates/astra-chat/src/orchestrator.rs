//! Dialogue engine: routes each turn and shapes the reply.
//!
//! Fixed phrases are answered directly, follow-up requests go to the
//! [`FollowUpResolver`], and everything else is answered by the
//! [`KnowledgeBroker`] and decorated according to the user's sentiment.

use std::sync::Arc;

use astra_core::config::AstraConfig;
use astra_core::lookup::{EncyclopediaLookup, WebTopicLookup};

use crate::broker::KnowledgeBroker;
use crate::context::{ConversationContext, FollowUpResolver};
use crate::intent::{Intent, IntentTable};
use crate::response::ResponseComposer;
use crate::sentiment::SentimentClassifier;
use crate::types::{TurnReply, TurnRoute};

/// Central coordinator for one conversation.
pub struct DialogueEngine {
    intents: IntentTable,
    broker: KnowledgeBroker,
    follow_up: FollowUpResolver,
    classifier: SentimentClassifier,
    composer: ResponseComposer,
    context: Arc<ConversationContext>,
}

impl DialogueEngine {
    /// Create an engine with a fresh conversation context.
    pub fn new(
        config: &AstraConfig,
        encyclopedia: Arc<dyn EncyclopediaLookup>,
        web: Arc<dyn WebTopicLookup>,
    ) -> Self {
        let context = Arc::new(ConversationContext::new());
        let broker = KnowledgeBroker::new(
            Arc::clone(&context),
            Arc::clone(&encyclopedia),
            web,
            &config.knowledge,
        );
        let follow_up = FollowUpResolver::new(Arc::clone(&context), encyclopedia);

        tracing::debug!(conversation = %context.id(), "Dialogue engine created");

        Self {
            intents: IntentTable::new(),
            broker,
            follow_up,
            classifier: SentimentClassifier::new(&config.sentiment),
            composer: ResponseComposer,
            context,
        }
    }

    /// Replace the sentiment classifier.
    pub fn with_classifier(mut self, classifier: SentimentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn context(&self) -> &Arc<ConversationContext> {
        &self.context
    }

    /// Handle one user message.
    ///
    /// Phrase and follow-up replies are delivered at neutral rate. Knowledge
    /// answers carry the sentiment of the user's message, never of the answer.
    pub async fn handle_turn(&self, message: &str) -> TurnReply {
        let reply = match self.intents.classify(message) {
            Intent::Phrase(rule) => TurnReply::neutral(Some(rule.reply.clone()), rule.route),
            Intent::FollowUp => {
                TurnReply::neutral(self.follow_up.resolve(message).await, TurnRoute::FollowUp)
            }
            Intent::Knowledge => {
                let answer = self.broker.resolve(message).await;
                let sentiment = self.classifier.classify(message);
                TurnReply {
                    text: Some(self.composer.decorate(answer, sentiment)),
                    rate: self.classifier.delivery_rate(sentiment),
                    route: TurnRoute::Knowledge,
                }
            }
        };

        tracing::debug!(
            conversation = %self.context.id(),
            route = %reply.route,
            rate = %reply.rate,
            has_text = reply.text.is_some(),
            "Turn handled"
        );
        reply
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubEncyclopedia, StubWebTopics};
    use astra_core::config::SentimentConfig;

    const EIFFEL: &str = "The Eiffel Tower is a wrought-iron lattice tower in Paris.";

    fn build_engine(enc: Arc<StubEncyclopedia>, web: Arc<StubWebTopics>) -> DialogueEngine {
        DialogueEngine::new(&AstraConfig::default(), enc, web)
    }

    fn fixed_score(score: f32) -> SentimentClassifier {
        SentimentClassifier::with_scorer(&SentimentConfig::default(), move |_: &str| score)
    }

    // ---- Fixed phrases ----

    #[tokio::test]
    async fn test_greeting_never_reaches_broker() {
        let enc = Arc::new(StubEncyclopedia::new());
        let web = Arc::new(StubWebTopics::new());
        let engine = build_engine(Arc::clone(&enc), Arc::clone(&web));

        let reply = engine.handle_turn("hello, what is gravity").await;
        assert_eq!(reply.text.as_deref(), Some("Hello! How can I help you today?"));
        assert_eq!(reply.route, TurnRoute::Greeting);
        assert!(reply.rate.is_neutral());
        assert!(enc.calls().is_empty());
        assert!(web.calls().is_empty());
    }

    #[tokio::test]
    async fn test_phrase_replies_ignore_sentiment() {
        let engine = build_engine(
            Arc::new(StubEncyclopedia::new()),
            Arc::new(StubWebTopics::new()),
        )
        .with_classifier(fixed_score(0.9));

        let reply = engine.handle_turn("thanks, that was great").await;
        assert_eq!(
            reply.text.as_deref(),
            Some("You're welcome! Feel free to ask me anything.")
        );
        assert!(reply.rate.is_neutral());
    }

    // ---- Follow-ups ----

    #[tokio::test]
    async fn test_follow_up_after_topic_list() {
        let enc = Arc::new(
            StubEncyclopedia::new().with("acm.org - awards", Ok("The ACM presents awards.")),
        );
        let web = Arc::new(StubWebTopics::new().with(
            "Turing Award",
            &["en.wikipedia.org", "acm.org - awards", "britannica.com"],
        ));
        let engine = build_engine(Arc::clone(&enc), web);

        let listing = engine.handle_turn("Turing Award").await;
        assert_eq!(listing.route, TurnRoute::Knowledge);
        assert!(listing.text.unwrap().contains("3. About britannica.com\n"));

        let reply = engine.handle_turn("Tell me more about item 2").await;
        assert_eq!(reply.route, TurnRoute::FollowUp);
        assert_eq!(reply.text.as_deref(), Some("The ACM presents awards."));

        let reply = engine.handle_turn("tell me more about item 5").await;
        assert_eq!(
            reply.text.as_deref(),
            Some("Invalid item number 5. Please choose between 1 and 3.")
        );
        let reply = engine.handle_turn("tell me more about item 0").await;
        assert!(reply.text.unwrap().contains("between 1 and 3"));
    }

    #[tokio::test]
    async fn test_follow_up_without_topics() {
        let engine = build_engine(
            Arc::new(StubEncyclopedia::new()),
            Arc::new(StubWebTopics::new()),
        );
        let reply = engine.handle_turn("tell me more about item 1").await;
        assert_eq!(
            reply.text.as_deref(),
            Some("Sorry, I don't have any topics to give more info about.")
        );
        assert!(reply.rate.is_neutral());
    }

    #[tokio::test]
    async fn test_follow_up_without_number_has_no_text() {
        let engine = build_engine(
            Arc::new(StubEncyclopedia::new()),
            Arc::new(StubWebTopics::new()),
        )
        .with_classifier(fixed_score(-0.9));

        let reply = engine.handle_turn("tell me more about item").await;
        assert_eq!(reply.text, None);
        assert_eq!(reply.route, TurnRoute::FollowUp);
        assert!(reply.rate.is_neutral());
    }

    // ---- Sentiment ----

    async fn knowledge_reply(score: f32) -> TurnReply {
        let enc = Arc::new(StubEncyclopedia::new().with("Eiffel Tower", Ok(EIFFEL)));
        let engine = build_engine(enc, Arc::new(StubWebTopics::new()))
            .with_classifier(fixed_score(score));
        engine.handle_turn("Eiffel Tower").await
    }

    #[tokio::test]
    async fn test_positive_sentiment_decoration() {
        let reply = knowledge_reply(0.7).await;
        assert_eq!(reply.rate.value(), 2);
        assert_eq!(
            reply.text.unwrap(),
            format!("{}😊 I'm glad you feel good! Let me help you.", EIFFEL)
        );
    }

    #[tokio::test]
    async fn test_negative_sentiment_decoration() {
        let reply = knowledge_reply(-0.6).await;
        assert_eq!(reply.rate.value(), -2);
        assert_eq!(
            reply.text.unwrap(),
            format!(
                "{}🙏 I'm sorry to hear that. I'll do my best to assist you.",
                EIFFEL
            )
        );
    }

    #[tokio::test]
    async fn test_neutral_sentiment_leaves_answer() {
        let reply = knowledge_reply(0.1).await;
        assert!(reply.rate.is_neutral());
        assert_eq!(reply.text.as_deref(), Some(EIFFEL));
    }

    #[tokio::test]
    async fn test_cached_answer_is_undecorated() {
        let enc = Arc::new(StubEncyclopedia::new().with("Eiffel Tower", Ok(EIFFEL)));
        let engine = build_engine(enc, Arc::new(StubWebTopics::new()))
            .with_classifier(fixed_score(0.8));

        engine.handle_turn("Eiffel Tower").await;
        assert_eq!(
            engine.context().cached_answer("eiffel tower").as_deref(),
            Some(EIFFEL)
        );
    }

    #[tokio::test]
    async fn test_rates_follow_config() {
        let config = SentimentConfig {
            positive_rate: 4,
            ..SentimentConfig::default()
        };
        let enc = Arc::new(StubEncyclopedia::new().with("Eiffel Tower", Ok(EIFFEL)));
        let engine = build_engine(enc, Arc::new(StubWebTopics::new()))
            .with_classifier(SentimentClassifier::with_scorer(&config, |_: &str| 0.95));

        let reply = engine.handle_turn("Eiffel Tower").await;
        assert_eq!(reply.rate.value(), 4);
    }

    // ---- End to end ----

    #[tokio::test]
    async fn test_question_then_farewell() {
        let enc = Arc::new(
            StubEncyclopedia::new().with("What is the Eiffel Tower?", Ok(EIFFEL)),
        );
        let engine = build_engine(Arc::clone(&enc), Arc::new(StubWebTopics::new()));

        let answer = engine.handle_turn("What is the Eiffel Tower?").await;
        assert_eq!(answer.route, TurnRoute::Knowledge);
        assert!(answer.text.unwrap().starts_with(EIFFEL));

        let farewell = engine.handle_turn("bye").await;
        assert_eq!(farewell.text.as_deref(), Some("Goodbye! Have a great day!"));
        assert_eq!(farewell.route, TurnRoute::Farewell);
        assert!(farewell.rate.is_neutral());
        assert_eq!(enc.calls().len(), 1);
    }
}
