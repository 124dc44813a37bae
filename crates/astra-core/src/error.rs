use thiserror::Error;

/// Top-level error type for Astra.
///
/// Lookup and dialogue failures never surface here; the engine turns them
/// into reply text. What remains is setup and output.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AstraError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for AstraError {
    fn from(err: toml::de::Error) -> Self {
        AstraError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AstraError {
    fn from(err: toml::ser::Error) -> Self {
        AstraError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AstraError {
    fn from(err: serde_json::Error) -> Self {
        AstraError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Astra operations.
pub type Result<T> = std::result::Result<T, AstraError>;
