//! Handler traits.
//!
//! Handlers are plain async functions. The blanket implementations below let
//! any `Fn(Context, Arc<Bot>, Arc<E>) -> impl Future<Output = HandlerResult>`
//! be registered directly:
//!
//! ```rust,ignore
//! async fn on_thumbs_up(ctx: Context, bot: Arc<Bot>, reaction: Arc<ReactionEvent>) -> HandlerResult {
//!     if ctx.reaction_direction() == Some(ReactionDirection::Added) {
//!         // ...
//!     }
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use hearken_core::{MessageEvent, ReactionEvent};

use crate::bot::Bot;
use crate::context::Context;

/// A type-erased error returned by handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The result every handler returns.
///
/// Errors are not caught by the dispatcher; they propagate to whoever drives
/// the dispatch loop.
pub type HandlerResult = Result<(), BoxError>;

/// Handles a matched message route.
pub trait MessageHandler: Send + Sync + 'static {
    fn call(
        &self,
        ctx: Context,
        bot: Arc<Bot>,
        message: Arc<MessageEvent>,
    ) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> MessageHandler for F
where
    F: Fn(Context, Arc<Bot>, Arc<MessageEvent>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(
        &self,
        ctx: Context,
        bot: Arc<Bot>,
        message: Arc<MessageEvent>,
    ) -> BoxFuture<'static, HandlerResult> {
        (self)(ctx, bot, message).boxed()
    }
}

/// Handles a matched reaction route.
///
/// Receives both added and removed reactions; the direction is available on
/// the event and through [`Context::reaction_direction`].
pub trait ReactionHandler: Send + Sync + 'static {
    fn call(
        &self,
        ctx: Context,
        bot: Arc<Bot>,
        reaction: Arc<ReactionEvent>,
    ) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> ReactionHandler for F
where
    F: Fn(Context, Arc<Bot>, Arc<ReactionEvent>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(
        &self,
        ctx: Context,
        bot: Arc<Bot>,
        reaction: Arc<ReactionEvent>,
    ) -> BoxFuture<'static, HandlerResult> {
        (self)(ctx, bot, reaction).boxed()
    }
}
