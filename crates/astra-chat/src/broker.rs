//! Knowledge retrieval.
//!
//! A query that misses the answer cache is sent to both knowledge sources at
//! once. The encyclopedia summary is preferred; web topics are the fallback and
//! become the list that follow-up requests index into.

use std::sync::Arc;

use astra_core::config::KnowledgeConfig;
use astra_core::lookup::{EncyclopediaLookup, LookupError, WebTopicLookup};
use tokio::task::JoinError;

use crate::context::ConversationContext;
use crate::response::ResponseComposer;
use crate::types::{normalize_query, TopicList};

/// What the encyclopedia task contributed to a retrieval.
#[derive(Debug)]
enum SummaryOutcome {
    Found(String),
    Ambiguous,
    Missing,
}

/// Answers free-text queries from the encyclopedia and web topic sources.
pub struct KnowledgeBroker {
    context: Arc<ConversationContext>,
    encyclopedia: Arc<dyn EncyclopediaLookup>,
    web: Arc<dyn WebTopicLookup>,
    composer: ResponseComposer,
    max_topic_results: usize,
}

impl KnowledgeBroker {
    pub fn new(
        context: Arc<ConversationContext>,
        encyclopedia: Arc<dyn EncyclopediaLookup>,
        web: Arc<dyn WebTopicLookup>,
        config: &KnowledgeConfig,
    ) -> Self {
        Self {
            context,
            encyclopedia,
            web,
            composer: ResponseComposer,
            max_topic_results: config.max_topic_results,
        }
    }

    /// Answer a query, consulting the cache first.
    ///
    /// Never fails: lookup errors are absorbed into reply text, and the
    /// result (including "not found") is cached under the normalized query.
    pub async fn resolve(&self, query: &str) -> String {
        let key = normalize_query(query);
        if let Some(answer) = self.context.cached_answer(&key) {
            tracing::debug!(query = %key, "Answer cache hit");
            return answer;
        }

        let (summary, topics) = self.retrieve(query).await;
        let answer = match summary {
            SummaryOutcome::Found(summary) => summary,
            SummaryOutcome::Ambiguous => self.composer.ambiguous(),
            SummaryOutcome::Missing if !topics.is_empty() => {
                let answer = self.composer.topic_list(&topics);
                self.context.record_topics(key.clone(), topics);
                answer
            }
            SummaryOutcome::Missing => self.composer.not_found(),
        };

        self.context.store_answer(key, answer)
    }

    /// Run both lookups as independent tasks and wait for both.
    async fn retrieve(&self, query: &str) -> (SummaryOutcome, TopicList) {
        let encyclopedia = Arc::clone(&self.encyclopedia);
        let summary_query = query.to_string();
        let summary_task =
            tokio::spawn(async move { encyclopedia.fetch(&summary_query).await });

        let web = Arc::clone(&self.web);
        let topic_query = query.to_string();
        let max_results = self.max_topic_results;
        let topic_task = tokio::spawn(async move { web.fetch(&topic_query, max_results).await });

        let (summary, topics) = tokio::join!(summary_task, topic_task);
        tracing::debug!(
            conversation = %self.context.id(),
            query = %query,
            "Knowledge lookups finished"
        );

        (summary_outcome(query, summary), topic_outcome(query, topics))
    }
}

fn summary_outcome(
    query: &str,
    joined: Result<Result<String, LookupError>, JoinError>,
) -> SummaryOutcome {
    match joined {
        Ok(Ok(summary)) if !summary.trim().is_empty() => SummaryOutcome::Found(summary),
        Ok(Ok(_)) => SummaryOutcome::Missing,
        Ok(Err(LookupError::Ambiguous(_))) => {
            tracing::debug!(query = %query, "Encyclopedia query is ambiguous");
            SummaryOutcome::Ambiguous
        }
        Ok(Err(LookupError::NotFound(_))) => SummaryOutcome::Missing,
        Ok(Err(err)) => {
            tracing::warn!(query = %query, error = %err, "Encyclopedia lookup failed");
            SummaryOutcome::Missing
        }
        Err(err) => {
            tracing::warn!(query = %query, error = %err, "Encyclopedia task did not complete");
            SummaryOutcome::Missing
        }
    }
}

fn topic_outcome(
    query: &str,
    joined: Result<Result<TopicList, LookupError>, JoinError>,
) -> TopicList {
    match joined {
        Ok(Ok(topics)) => topics,
        Ok(Err(err)) => {
            tracing::warn!(
                query = %query,
                kind = err.kind(),
                error = %err,
                "Web topic lookup failed"
            );
            Vec::new()
        }
        Err(err) => {
            tracing::warn!(query = %query, error = %err, "Web topic task did not complete");
            Vec::new()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
