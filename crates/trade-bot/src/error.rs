//! Error types for the order bot

use thiserror::Error;

/// Order bot specific errors
#[derive(Debug, Error)]
pub enum BotError {
    /// Network or HTTP error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (transport layer)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or incomplete response from an exchange
    #[error("{venue} response error: {reason}")]
    Exchange { venue: String, reason: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Session storage error
    #[error("session error: {0}")]
    Session(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl BotError {
    /// Build an [`BotError::Exchange`] for a malformed venue response.
    pub fn exchange(venue: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Exchange {
            venue: venue.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;
