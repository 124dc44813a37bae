use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AstraError, Result};

/// Top-level configuration for the Astra assistant.
///
/// Loaded from `~/.astra/config.toml` by default. Every section falls back to
/// its defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AstraConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl AstraConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AstraConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AstraError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Name the assistant uses for itself in the transcript.
    pub assistant_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            assistant_name: "Astra".to_string(),
        }
    }
}

/// Knowledge retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Number of web topics requested per query.
    pub max_topic_results: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            max_topic_results: 3,
        }
    }
}

/// Sentiment classification and delivery-rate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Compound score at or above which a message is positive.
    pub positive_threshold: f32,
    /// Compound score at or below which a message is negative.
    pub negative_threshold: f32,
    /// Delivery rate offset for positive messages.
    pub positive_rate: i8,
    /// Delivery rate offset for negative messages.
    pub negative_rate: i8,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive_threshold: 0.5,
            negative_threshold: -0.5,
            positive_rate: 2,
            negative_rate: -2,
        }
    }
}

/// HTTP lookup client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the Wikipedia instance, without trailing slash.
    pub wikipedia_base_url: String,
    /// Number of sentences kept from a page summary.
    pub summary_sentences: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            wikipedia_base_url: "https://en.wikipedia.org".to_string(),
            summary_sentences: 2,
            timeout_secs: 10,
            user_agent: "astra-assistant/0.1".to_string(),
        }
    }
}

/// Speech output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Speak replies through the configured speech sink.
    pub enabled: bool,
    /// Rate the speech sink returns to after every utterance.
    pub base_rate: i8,
}
