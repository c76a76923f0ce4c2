//! Unified error types for HookRelay.
//!
//! Every variant is terminal for the request that raised it. The gateway turns
//! it into a `{status, message}` body using [`RelayError::status_code`] and
//! [`RelayError::public_message`]; the `Display` text is for logs only.

use thiserror::Error;

/// Result type alias using RelayError.
pub type Result<T> = std::result::Result<T, RelayError>;

pub const MSG_UNRECOGNIZED_BODY: &str = "unrecognized webhook body";
pub const MSG_MISSING_EMAIL: &str = "user does not have email";
pub const MSG_NO_RECOMMENDATION: &str = "could not get recommendation for this user";
pub const MSG_INVALID_OUTGOING: &str = "invalid outgoing webhook body";
pub const MSG_SEND_FAILED: &str = "could not send webhook";

#[derive(Error, Debug)]
pub enum RelayError {
    // Inbound errors
    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // Upstream errors
    #[error("Recommendation unavailable: {0}")]
    RecommendationUnavailable(String),

    // Outbound errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Transport error: {0}")]
    Transport(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl RelayError {
    pub fn decoding(msg: impl Into<String>) -> Self {
        Self::Decoding(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::RecommendationUnavailable(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status mirrored back to the webhook caller.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Message safe to show the webhook caller. Downstream detail (status
    /// codes, response bodies) never leaks through here.
    pub fn public_message(&self) -> String {
        match self {
            Self::Decoding(_) => MSG_UNRECOGNIZED_BODY.into(),
            Self::Validation(msg) => msg.clone(),
            Self::RecommendationUnavailable(_) => MSG_NO_RECOMMENDATION.into(),
            Self::Serialization(_) => MSG_INVALID_OUTGOING.into(),
            Self::Transport(_) => MSG_SEND_FAILED.into(),
            other => other.to_string(),
        }
    }
}
