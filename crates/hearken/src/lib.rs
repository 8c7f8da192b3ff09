//! # Hearken
//!
//! An ordered, first-match-wins event router for Slack bots.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌────────────┐   ┌────────┐   ┌────────────┐   ┌─────────┐
//! │ RTM / SM    │──▶│ Normalizer │──▶│ Filter │──▶│ Dispatcher │──▶│ Handler │
//! │ EventSource │   └────────────┘   └────────┘   └────────────┘   └─────────┘
//! └─────────────┘
//! ```
//!
//! - **Core**: canonical events, outgoing payloads and the [`SlackApi`](core::SlackApi) seam
//! - **Framework**: route registry, dispatcher, context and typing simulation
//! - **Slack adapter**: native RTM / Socket Mode models and their loops
//! - **Runtime**: configuration, logging and the signal-aware run loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hearken::prelude::*;
//!
//! async fn how_are_you(_ctx: Context, bot: Arc<Bot>, msg: Arc<MessageEvent>) -> HandlerResult {
//!     bot.reply(&msg, "A bit tired. You get it? A bit?", Typing::With).await?;
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = HearkenRuntime::new();
//!     runtime.hear("(?i)how are you(.*)")?.message_handler(how_are_you);
//!     runtime.run(api, Connection::rtm(events)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: load `hearken.toml` files (default)
//! - `json-log`: allow `logging.format = "json"`

pub use hearken_adapter_slack as slack;
pub use hearken_core as core;
pub use hearken_framework as framework;
pub use hearken_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use hearken::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    // Runtime entry point
    pub use hearken_runtime::{Connection, HearkenRuntime};

    // Handlers and replies
    pub use hearken_framework::{Bot, Context, HandlerResult, Typing};

    // Events handlers receive
    pub use hearken_core::{
        Attachment, MessageEvent, MessageType, OutgoingMessage, ReactionDirection, ReactionEvent,
    };

    // Logging
    pub use hearken_runtime::prelude::*;
}
