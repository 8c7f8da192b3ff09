//! Transport loop errors.

use hearken_framework::DispatchError;
use thiserror::Error;

/// Errors that end a transport loop.
///
/// Connection problems and undecodable payloads are logged and skipped; only
/// failures the loop cannot step over are returned.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A handler failed; the loop stops with the handler's error.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Result type for transport loops.
pub type TransportResult<T> = Result<T, TransportError>;
