//! Related topic snippets from the OpenSearch endpoint.

use std::borrow::Cow;

use astra_core::config::LookupConfig;
use astra_core::lookup::{LookupError, WebTopicLookup};
use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use reqwest::Url;

use crate::http::HttpSettings;

/// OpenSearch reply: `[query, titles, descriptions, urls]`.
type OpenSearchResponse = (String, Vec<String>, Vec<String>, Vec<String>);

/// Web topic source returning one display snippet per result URL.
pub struct WikipediaSearchClient {
    http: HttpSettings,
}

impl WikipediaSearchClient {
    pub fn new(config: &LookupConfig) -> astra_core::Result<Self> {
        Ok(Self::with_http(HttpSettings::from_config(config)?))
    }

    pub fn with_http(http: HttpSettings) -> Self {
        Self { http }
    }

    fn search_url(&self, query: &str, max_results: usize) -> Url {
        let mut url = self.http.endpoint(&["w", "api.php"]);
        url.query_pairs_mut()
            .append_pair("action", "opensearch")
            .append_pair("search", query)
            .append_pair("limit", &max_results.to_string())
            .append_pair("namespace", "0")
            .append_pair("format", "json");
        url
    }
}

#[async_trait]
impl WebTopicLookup for WikipediaSearchClient {
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<String>, LookupError> {
        let query = query.trim();
        if query.is_empty() || max_results == 0 {
            return Ok(Vec::new());
        }

        let response: Option<OpenSearchResponse> =
            self.http.get_json(self.search_url(query, max_results)).await?;
        let (titles, urls) = response
            .map(|(_, titles, _, urls)| (titles, urls))
            .unwrap_or_default();

        let snippets: Vec<String> = urls
            .iter()
            .enumerate()
            .filter_map(|(i, url)| article_snippet(titles.get(i).map(String::as_str), url))
            .take(max_results)
            .collect();
        tracing::debug!(
            query = %query,
            topics = snippets.len(),
            source = "opensearch",
            "Topic search finished"
        );
        Ok(snippets)
    }
}

/// Snippet for an article hit: the page title beside the URL's host.
///
/// Every article URL shares the `/wiki/` prefix, so the title is more telling
/// than the first path segment. Falls back to [`snippet_from_url`] when the
/// title is missing.
fn article_snippet(title: Option<&str>, url: &str) -> Option<String> {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => {
            let parsed = Url::parse(url).ok()?;
            Some(format!("{} - {}", parsed.host_str()?, title))
        }
        None => snippet_from_url(url),
    }
}

/// Display snippet for a result URL.
///
/// The host alone, or `"{host} - {segment}"` where `segment` is the first path
/// segment, percent-decoded, with `_` and `-` turned into spaces. `None` when
/// the URL does not parse or has no host.
pub fn snippet_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;

    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|segment| !segment.is_empty())
        .map(|segment| decode_segment(segment).replace(['_', '-'], " "));

    Some(match segment {
        Some(segment) => format!("{} - {}", host, segment),
        None => host.to_string(),
    })
}

/// Decode `%XX` escapes, keeping the raw text when the result is not UTF-8.
fn decode_segment(segment: &str) -> Cow<'_, str> {
    percent_decode_str(segment)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(segment))
}
