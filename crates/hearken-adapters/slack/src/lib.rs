//! # Hearken Adapter for Slack
//!
//! Connects the Hearken router to Slack's two event transports: the RTM
//! websocket stream and Socket Mode (Events API over a websocket).
//!
//! ## Overview
//!
//! The wire client that owns the socket is supplied by the caller as an
//! [`EventSource`]. This crate handles:
//!
//! - Decoding raw frames into native event models ([`RtmEvent`], [`SocketModeEvent`])
//! - Normalizing both native sets into [`InboundEvent`](hearken_core::InboundEvent)
//! - Running the per-transport loops ([`RtmLoop`], [`SocketModeLoop`])
//!
//! ## Data Flow
//!
//! ```text
//! EventSource ─▶ native event ─▶ normalize ─▶ filter ─▶ Context ─▶ Dispatcher ─▶ handler
//! ```
//!
//! Events are processed strictly one at a time; the next event is not read
//! until the previous handler has returned.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! let driver = EventDriver::new(bot, router.into_dispatcher());
//! let exit = RtmLoop::new(rx, driver).run().await?;
//! ```

pub mod driver;
pub mod error;
pub mod model;
pub mod normalize;
pub mod rtm;
pub mod socket;
pub mod source;
pub mod testing;

pub use driver::{EventDriver, EventOutcome, LoopExit};
pub use error::{TransportError, TransportResult};
pub use model::{
    CallbackEvent, EventsApiEnvelope, EventsApiPayload, MessagePayload, ReactionItemPayload,
    ReactionPayload, RtmError, RtmEvent, RtmFrame, SocketEnvelope, SocketModeEvent,
};
pub use normalize::{normalize_message, normalize_reaction, normalize_rtm, normalize_socket};
pub use rtm::RtmLoop;
pub use socket::{EnvelopeAck, SocketModeLoop};
pub use source::EventSource;
pub use testing::{ApiCall, RecordingApi};
