//! Recording lookup doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use astra_core::lookup::{EncyclopediaLookup, LookupError, WebTopicLookup};
use async_trait::async_trait;

/// Encyclopedia double: canned results per exact query, `NotFound` otherwise.
#[derive(Default)]
pub(crate) struct StubEncyclopedia {
    responses: HashMap<String, Result<String, LookupError>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl StubEncyclopedia {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, query: &str, result: Result<&str, LookupError>) -> Self {
        self.responses
            .insert(query.to_string(), result.map(str::to_string));
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncyclopediaLookup for StubEncyclopedia {
    async fn fetch(&self, query: &str) -> Result<String, LookupError> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .get(query)
            .cloned()
            .unwrap_or_else(|| Err(LookupError::NotFound(query.to_string())))
    }
}

/// Web topic double: canned snippets per exact query, empty otherwise.
#[derive(Default)]
pub(crate) struct StubWebTopics {
    responses: HashMap<String, Result<Vec<String>, LookupError>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl StubWebTopics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, query: &str, topics: &[&str]) -> Self {
        self.responses.insert(
            query.to_string(),
            Ok(topics.iter().map(|t| t.to_string()).collect()),
        );
        self
    }

    pub(crate) fn failing(mut self, query: &str, err: LookupError) -> Self {
        self.responses.insert(query.to_string(), Err(err));
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebTopicLookup for StubWebTopics {
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<String>, LookupError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses.get(query).cloned().unwrap_or_else(|| Ok(vec![]))
    }
}
