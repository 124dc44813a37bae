//! Knowledge source capabilities.
//!
//! The dialogue engine never talks to an encyclopedia or a search engine
//! directly; it goes through these two traits so that HTTP clients, offline
//! fixtures and test doubles are interchangeable.

use async_trait::async_trait;
use thiserror::Error;

/// Ways a knowledge lookup can fail.
///
/// Only [`LookupError::Ambiguous`] carries meaning for the caller; the other
/// two are reported and treated as "no result".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("'{0}' may refer to multiple pages")]
    Ambiguous(String),
    #[error("no page found for '{0}'")]
    NotFound(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl LookupError {
    /// Short label used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::Ambiguous(_) => "ambiguous",
            LookupError::NotFound(_) => "not_found",
            LookupError::Transport(_) => "transport",
        }
    }
}

/// Single best-effort summary for a term.
#[async_trait]
pub trait EncyclopediaLookup: Send + Sync {
    /// Fetch a short summary for `query`.
    async fn fetch(&self, query: &str) -> Result<String, LookupError>;
}

/// Ranked list of topic snippets related to a term.
///
/// Each snippet is a display string such as `"en.wikipedia.org - Turing Award"`.
#[async_trait]
pub trait WebTopicLookup: Send + Sync {
    /// Fetch at most `max_results` snippets for `query`, best first.
    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<String>, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    #[async_trait]
    impl EncyclopediaLookup for Fixed {
        async fn fetch(&self, query: &str) -> Result<String, LookupError> {
            if query == "mercury" {
                Err(LookupError::Ambiguous(query.to_string()))
            } else {
                Ok(format!("{} is a thing.", query))
            }
        }
    }

    #[async_trait]
    impl WebTopicLookup for Fixed {
        async fn fetch(
            &self,
            query: &str,
            max_results: usize,
        ) -> Result<Vec<String>, LookupError> {
            Ok((1..=max_results)
                .map(|i| format!("example.org - {} {}", query, i))
                .collect())
        }
    }

    #[test]
    fn test_lookup_error_display() {
        assert_eq!(
            LookupError::Ambiguous("Mercury".into()).to_string(),
            "'Mercury' may refer to multiple pages"
        );
        assert_eq!(
            LookupError::NotFound("Atlantis".into()).to_string(),
            "no page found for 'Atlantis'"
        );
        assert_eq!(
            LookupError::Transport("connection reset".into()).to_string(),
            "transport failure: connection reset"
        );
    }

    #[test]
    fn test_lookup_error_kind() {
        assert_eq!(LookupError::Ambiguous(String::new()).kind(), "ambiguous");
        assert_eq!(LookupError::NotFound(String::new()).kind(), "not_found");
        assert_eq!(LookupError::Transport(String::new()).kind(), "transport");
    }

    #[tokio::test]
    async fn test_traits_are_object_safe() {
        let encyclopedia: Box<dyn EncyclopediaLookup> = Box::new(Fixed);
        let web: Box<dyn WebTopicLookup> = Box::new(Fixed);

        assert_eq!(encyclopedia.fetch("tea").await.unwrap(), "tea is a thing.");
        assert!(matches!(
            encyclopedia.fetch("mercury").await,
            Err(LookupError::Ambiguous(_))
        ));
        assert_eq!(web.fetch("tea", 2).await.unwrap().len(), 2);
    }
}
