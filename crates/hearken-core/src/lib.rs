//! # Hearken Core
//!
//! The transport-independent foundation of the Hearken Slack bot router.
//!
//! This crate holds the pieces every other layer agrees on:
//!
//! - **Canonical events**: [`MessageEvent`] and [`ReactionEvent`], plus the
//!   exhaustive [`InboundEvent`] variant every transport normalizes into
//! - **Outgoing payloads**: [`OutgoingMessage`] and [`Attachment`]
//! - **Collaborator seam**: the [`SlackApi`] trait used to send replies
//! - **Identity**: the single-assignment [`BotIdentity`]
//!
//! ```text
//! ┌───────────┐   ┌────────────┐   ┌──────────────┐   ┌─────────┐
//! │ Transport │──▶│ Normalizer │──▶│ InboundEvent │──▶│ Matcher │
//! │ RTM / SM  │   └────────────┘   └──────────────┘   └─────────┘
//! └───────────┘
//! ```

pub mod api;
pub mod error;
pub mod event;
pub mod identity;
pub mod message;

pub use api::SlackApi;
pub use error::{ApiError, ApiResult, IdentityError};
pub use event::{
    ConnectInfo, InboundEvent, MessageEvent, MessageType, ReactionDirection, ReactionEvent,
    ReactionItem, subtype,
};
pub use identity::BotIdentity;
pub use message::{Attachment, AttachmentField, OutgoingMessage};
