//! Error types for the chat boundary.

use thiserror::Error;

/// Errors talking to the Bot API.
#[derive(Debug, Error)]
pub enum BotError {
    /// Transport failure. The request URL is stripped since it embeds the token.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The API answered with `ok: false` or a non-success status
    #[error("Bot API error in {method}: {status} {description}")]
    Api {
        method: String,
        status: u16,
        description: String,
    },

    /// The API answered with a body we could not decode
    #[error("unexpected Bot API response in {method}: {message}")]
    Decode { method: String, message: String },
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

/// Result type for chat operations.
pub type Result<T> = std::result::Result<T, BotError>;
