//! # Hearken Framework
//!
//! The routing core of Hearken.
//!
//! This layer provides:
//! - [`Router`] for ordered, two-step route registration (`hear` / `on_reaction`)
//! - [`Dispatcher`] for first-match-wins evaluation of a frozen route table
//! - [`Context`], the immutable carrier that hands derived data to handlers
//! - The self/subtype [`filter`] applied before dispatch
//! - [`TypingSimulator`] and the [`Bot`] reply helpers built on it
//!
//! # Example
//!
//! ```rust,ignore
//! use hearken_framework::{Bot, Context, HandlerResult, Router, Typing};
//!
//! async fn how_are_you(_ctx: Context, bot: Arc<Bot>, msg: Arc<MessageEvent>) -> HandlerResult {
//!     bot.reply(&msg, "A bit tired. You get it? A bit?", Typing::With).await?;
//!     Ok(())
//! }
//!
//! let mut router = Router::new();
//! router.hear("(?i)how are you(.*)")?.message_handler(how_are_you);
//! let dispatcher = router.into_dispatcher();
//! ```

pub mod bot;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod handler;
pub mod route;
pub mod typing;

#[cfg(test)]
pub(crate) mod test_support;

pub use bot::{Bot, Typing};
pub use context::Context;
pub use dispatcher::{DispatchOutcome, Dispatcher, RouteMatch};
pub use error::{DispatchError, RouteError};
pub use filter::{Admission, admit, admit_message, admit_reaction};
pub use handler::{BoxError, HandlerResult, MessageHandler, ReactionHandler};
pub use route::{
    Captures, MessageRouteBuilder, ReactionRouteBuilder, Route, RouteKind, Router,
};
pub use typing::TypingSimulator;
