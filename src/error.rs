//! Error types for Scriptcast.

use thiserror::Error;

/// Library-level error type for Scriptcast operations.
#[derive(Error, Debug)]
pub enum ScriptcastError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error: {0}")]
    OpenAI(String),

    /// The model answered, but the reply did not have a usable text shape.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

impl ScriptcastError {
    /// Whether this error is the known response-shape failure that the
    /// direct-call fallback can recover from.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, ScriptcastError::MalformedResponse(_))
    }
}

/// Result type alias for Scriptcast operations.
pub type Result<T> = std::result::Result<T, ScriptcastError>;
