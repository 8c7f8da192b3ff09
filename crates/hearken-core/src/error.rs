//! Error types shared across Hearken crates.

use thiserror::Error;

/// Errors returned by a [`SlackApi`](crate::SlackApi) implementation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The underlying connection is not available.
    #[error("not connected")]
    NotConnected,

    /// Slack rejected the call (`ok: false`).
    #[error("slack api error: {0}")]
    Slack(String),

    /// The payload could not be serialized.
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Request(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised when assigning the bot identity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// A different identity was already assigned.
    #[error("bot identity already set to '{current}', refusing '{attempted}'")]
    Conflict { current: String, attempted: String },

    /// The connection acknowledged an empty user ID.
    #[error("bot identity cannot be empty")]
    Empty,
}
