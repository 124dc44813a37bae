//! HTTP knowledge sources backed by the Wikipedia APIs.
//!
//! [`WikipediaSummaryClient`] answers with a short page summary and
//! [`WikipediaSearchClient`] supplies related topic snippets. Both implement
//! the lookup traits from `astra-core` and share one HTTP client setup.

pub mod http;
pub mod search;
pub mod summary;

pub use http::HttpSettings;
pub use search::{snippet_from_url, WikipediaSearchClient};
pub use summary::{first_sentences, WikipediaSummaryClient};
