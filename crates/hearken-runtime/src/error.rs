//! Runtime error types.

use hearken_adapter_slack::TransportError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that end [`HearkenRuntime::run`](crate::HearkenRuntime::run) or
/// prevent the runtime from being built.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The transport loop stopped because a handler failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
