//! Native Slack wire models.
//!
//! Each transport has its own event set:
//!
//! ```text
//! RtmEvent                              SocketModeEvent
//! ├── Connected(ConnectInfo)            ├── Connecting
//! ├── Frame(RtmFrame)   ← "type"        ├── Connected(ConnectInfo)
//! ├── InvalidAuth                       ├── ConnectionError(String)
//! ├── ConnectionError(String)           ├── InvalidAuth
//! └── Malformed(String)                 ├── Envelope(SocketEnvelope) ← "type"
//!                                       └── Malformed(String)
//! ```
//!
//! Frames and envelopes are decoded the same way: the raw JSON is parsed once
//! into a [`Value`], its `type` discriminator is inspected, and only then is
//! the most specific payload struct deserialized from it. Unknown
//! discriminators decode to an `Other` variant instead of failing.
//!
//! The payload structs accept missing fields everywhere; turning absent
//! values into canonical defaults is the normalizer's job.

pub mod rtm;
pub mod socket;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use rtm::{RtmError, RtmEvent, RtmFrame};
pub use socket::{CallbackEvent, EventsApiEnvelope, EventsApiPayload, SocketEnvelope, SocketModeEvent};

/// Returns the `type` discriminator of a JSON object, or `""`.
pub(crate) fn type_tag(value: &Value) -> &str {
    value.get("type").and_then(Value::as_str).unwrap_or("")
}

// ============================================================================
// Shared payloads
// ============================================================================

/// A `message` event body as both transports deliver it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub channel_type: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub event_ts: Option<String>,
    #[serde(default)]
    pub client_msg_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// The item a reaction payload points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionItemPayload {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

/// A `reaction_added` / `reaction_removed` event body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionPayload {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub item_user: Option<String>,
    #[serde(default)]
    pub reaction: Option<String>,
    #[serde(default)]
    pub item: ReactionItemPayload,
    #[serde(default)]
    pub event_ts: Option<String>,
}
