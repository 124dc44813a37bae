//! Shared HTTP plumbing for the Wikipedia clients.

use std::time::Duration;

use astra_core::config::LookupConfig;
use astra_core::lookup::LookupError;
use astra_core::{AstraError, Result};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

/// HTTP client plus the base URL every request is resolved against.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    client: Client,
    base_url: Url,
}

impl HttpSettings {
    /// Build a client with the configured user agent and request timeout.
    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        let base_url = Url::parse(&config.wikipedia_base_url).map_err(|e| {
            AstraError::Config(format!(
                "invalid wikipedia_base_url '{}': {}",
                config.wikipedia_base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AstraError::Config(format!(
                "wikipedia_base_url '{}' cannot carry a path",
                config.wikipedia_base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AstraError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET `url` and decode the JSON body. `Ok(None)` means HTTP 404.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> std::result::Result<Option<T>, LookupError> {
        tracing::debug!(url = %url, "HTTP GET");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Transport(format!("request timeout: {}", e))
            } else if e.is_connect() {
                LookupError::Transport(format!("connection failed: {}", e))
            } else {
                LookupError::Transport(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::Transport(format!("HTTP {}", status)));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| LookupError::Transport(format!("failed to parse response: {}", e)))
    }
}
