//! Error types for the Hearken framework.

use thiserror::Error;

use crate::handler::BoxError;

/// Errors raised while registering routes.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The message pattern is not a valid regular expression.
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors surfaced by [`Dispatcher::dispatch`](crate::Dispatcher::dispatch).
///
/// A missing match is not an error; see
/// [`DispatchOutcome::NotMatched`](crate::DispatchOutcome::NotMatched).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A route matched but the context carries no bot to hand the handler.
    #[error("no bot bound to the dispatch context")]
    MissingBot,

    /// The matched handler returned an error. It is passed through untouched.
    #[error("handler for route {route} failed: {source}")]
    Handler {
        route: usize,
        #[source]
        source: BoxError,
    },
}
