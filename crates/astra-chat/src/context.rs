//! Conversation state and follow-up resolution.
//!
//! [`ConversationContext`] owns the two caches a conversation accumulates:
//! answers keyed by normalized query, and the topic lists produced when the
//! encyclopedia had nothing. [`FollowUpResolver`] answers "tell me more about
//! item N" against whichever topic list was recorded last.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use astra_core::lookup::{EncyclopediaLookup, LookupError};
use uuid::Uuid;

use crate::error::ChatError;
use crate::intent::{extract_item_index, ItemNumber};
use crate::response::ResponseComposer;
use crate::types::TopicList;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("Conversation cache lock poisoned, recovering");
        poisoned.into_inner()
    })
}

// =============================================================================
// ConversationContext
// =============================================================================

#[derive(Default)]
struct TopicState {
    by_query: HashMap<String, Arc<TopicList>>,
    /// Most recently recorded list; follow-ups always resolve against it.
    current: Option<Arc<TopicList>>,
}

/// Caches shared by the knowledge broker and the follow-up resolver.
///
/// Both maps live as long as the context and are never evicted. Locks are
/// held only for the map operation itself.
pub struct ConversationContext {
    id: Uuid,
    answers: Mutex<HashMap<String, String>>,
    topics: Mutex<TopicState>,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            answers: Mutex::new(HashMap::new()),
            topics: Mutex::new(TopicState::default()),
        }
    }

    /// Identifier used to correlate log lines of one conversation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Cached answer for a normalized query.
    pub fn cached_answer(&self, key: &str) -> Option<String> {
        lock(&self.answers).get(key).cloned()
    }

    /// Store an answer unless one already exists, returning the stored text.
    ///
    /// The first answer written for a key wins.
    pub fn store_answer(&self, key: String, answer: String) -> String {
        lock(&self.answers).entry(key).or_insert(answer).clone()
    }

    pub fn answered_count(&self) -> usize {
        lock(&self.answers).len()
    }

    /// Record the topic list for a normalized query and make it current.
    pub fn record_topics(&self, key: String, topics: TopicList) {
        let topics = Arc::new(topics);
        let mut state = lock(&self.topics);
        state.by_query.insert(key, Arc::clone(&topics));
        state.current = Some(topics);
    }

    /// Topic list recorded for a specific normalized query.
    pub fn topics_for(&self, key: &str) -> Option<Arc<TopicList>> {
        lock(&self.topics).by_query.get(key).cloned()
    }

    /// The topic list follow-ups resolve against.
    pub fn current_topics(&self) -> Option<Arc<TopicList>> {
        lock(&self.topics).current.clone()
    }
}

// =============================================================================
// FollowUpResolver
// =============================================================================

/// Resolves "tell me more about item N" against the current topic list.
pub struct FollowUpResolver {
    context: Arc<ConversationContext>,
    encyclopedia: Arc<dyn EncyclopediaLookup>,
    composer: ResponseComposer,
}

impl FollowUpResolver {
    pub fn new(
        context: Arc<ConversationContext>,
        encyclopedia: Arc<dyn EncyclopediaLookup>,
    ) -> Self {
        Self {
            context,
            encyclopedia,
            composer: ResponseComposer,
        }
    }

    /// Answer a follow-up request.
    ///
    /// Returns `None` when the message names no item number. Every other
    /// outcome, including a missing or out-of-range item, is reply text.
    pub async fn resolve(&self, message: &str) -> Option<String> {
        let index = extract_item_index(message)?;

        let reply = match self.select_topic(&index) {
            Ok(topic) => self.describe_topic(&topic).await,
            Err(err) => {
                tracing::debug!(index = %index, error = %err, "Follow-up rejected");
                self.composer.describe_error(&err)
            }
        };
        Some(reply)
    }

    /// Pick the 1-based `index` entry of the current topic list.
    pub fn select_topic(&self, index: &ItemNumber) -> Result<String, ChatError> {
        let topics = self
            .context
            .current_topics()
            .ok_or(ChatError::FollowUpNoContext)?;

        index
            .position()
            .and_then(|position| topics.get(position))
            .cloned()
            .ok_or_else(|| ChatError::FollowUpIndexOutOfRange {
                index: index.clone(),
                len: topics.len(),
            })
    }

    async fn describe_topic(&self, topic: &str) -> String {
        match self.encyclopedia.fetch(topic).await {
            Ok(summary) if !summary.trim().is_empty() => summary,
            Ok(_) => self.composer.topic_details_missing(topic),
            Err(LookupError::Ambiguous(_)) => self.composer.ambiguous(),
            Err(err) => {
                tracing::debug!(
                    topic = %topic,
                    kind = err.kind(),
                    error = %err,
                    "Topic lookup failed"
                );
                self.composer.topic_details_missing(topic)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
