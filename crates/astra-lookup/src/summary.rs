//! Encyclopedia summaries from the Wikipedia REST API.
//!
//! Free-text queries rarely match a page title exactly, so the query is first
//! resolved to the best full-text search hit and that page's summary is then
//! fetched and cut to the configured number of sentences.

use astra_core::config::LookupConfig;
use astra_core::lookup::{EncyclopediaLookup, LookupError};
use async_trait::async_trait;
use serde::Deserialize;

use crate::http::HttpSettings;

/// Page summary payload; only the fields we read.
#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

/// Resolves a query to a page and returns its leading sentences.
pub struct WikipediaSummaryClient {
    http: HttpSettings,
    sentences: usize,
}

impl WikipediaSummaryClient {
    pub fn new(config: &LookupConfig) -> astra_core::Result<Self> {
        Ok(Self::with_http(
            HttpSettings::from_config(config)?,
            config.summary_sentences,
        ))
    }

    pub fn with_http(http: HttpSettings, sentences: usize) -> Self {
        Self { http, sentences }
    }

    async fn resolve_title(&self, query: &str) -> Result<String, LookupError> {
        let mut url = self.http.endpoint(&["w", "api.php"]);
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("list", "search")
            .append_pair("srsearch", query)
            .append_pair("srlimit", "1")
            .append_pair("format", "json");

        let response: Option<SearchResponse> = self.http.get_json(url).await?;
        response
            .and_then(|r| r.query)
            .and_then(|q| q.search.into_iter().next())
            .map(|hit| hit.title)
            .ok_or_else(|| LookupError::NotFound(query.to_string()))
    }

    async fn page_summary(&self, title: &str) -> Result<Option<PageSummary>, LookupError> {
        let page = title.replace(' ', "_");
        let url = self
            .http
            .endpoint(&["api", "rest_v1", "page", "summary", page.as_str()]);
        self.http.get_json(url).await
    }
}

#[async_trait]
impl EncyclopediaLookup for WikipediaSummaryClient {
    async fn fetch(&self, query: &str) -> Result<String, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::NotFound(String::new()));
        }

        let title = self.resolve_title(query).await?;
        tracing::debug!(
            query = %query,
            title = %title,
            source = "wikipedia",
            "Resolved page title"
        );

        let summary = self
            .page_summary(&title)
            .await?
            .ok_or_else(|| LookupError::NotFound(title.clone()))?;
        interpret_summary(&title, summary, self.sentences)
    }
}

fn interpret_summary(
    title: &str,
    summary: PageSummary,
    sentences: usize,
) -> Result<String, LookupError> {
    if summary.kind == "disambiguation" {
        return Err(LookupError::Ambiguous(title.to_string()));
    }
    let text = first_sentences(&summary.extract, sentences);
    if text.is_empty() {
        return Err(LookupError::NotFound(title.to_string()));
    }
    Ok(text)
}

/// Leading `count` sentences of `text`, trimmed. `0` keeps everything.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text, so abbreviations such as "St. Louis" also end a sentence.
pub fn first_sentences(text: &str, count: usize) -> String {
    let text = text.trim();
    if count == 0 {
        return text.to_string();
    }

    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if at_boundary {
            seen += 1;
            if seen == count {
                return text[..i + c.len_utf8()].to_string();
            }
        }
    }
    text.to_string()
}
