//! Canonical event model.
//!
//! Both Slack transports (RTM and Socket Mode) deliver structurally different
//! payloads. Adapters normalize them into the types defined here before any
//! filtering or routing happens, so the matcher never depends on which
//! transport an event arrived on.
//!
//! # Event Hierarchy
//!
//! ```text
//! InboundEvent
//! ├── Connected(ConnectInfo)        ← identity acknowledged
//! ├── Message(MessageEvent)
//! ├── ReactionAdded(ReactionEvent)
//! ├── ReactionRemoved(ReactionEvent)
//! ├── Error(String)
//! ├── InvalidAuth
//! └── Unsupported(String)           ← anything else, ignored
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message subtypes the router treats specially.
pub mod subtype {
    /// A message posted by an integration rather than a user.
    pub const BOT_MESSAGE: &str = "bot_message";
    /// Echo sent when a thread receives a reply; the reply arrives on its own.
    pub const MESSAGE_REPLIED: &str = "message_replied";
    /// A thread reply that was also broadcast to the channel.
    pub const THREAD_BROADCAST: &str = "thread_broadcast";
}

// ============================================================================
// MessageEvent
// ============================================================================

/// A chat message in transport-independent form.
///
/// Absent wire fields are normalized to an empty string (required fields) or
/// `None` (optional fields). No further validation is performed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Channel the message was posted in.
    pub channel: String,
    /// Author's user ID.
    pub user: String,
    /// Message text, including Slack markup such as `<@U123>`.
    pub text: String,
    /// Message timestamp (`ts`), which doubles as the message ID.
    pub timestamp: String,
    /// Parent thread timestamp, when the message is a thread reply.
    pub thread_timestamp: Option<String>,
    /// Message subtype, e.g. [`subtype::BOT_MESSAGE`].
    pub subtype: Option<String>,
    /// ID of the integration that posted the message.
    pub bot_id: Option<String>,
    /// Timestamp of the delivery event itself.
    pub event_timestamp: Option<String>,
    /// Client-generated message ID.
    pub client_msg_id: Option<String>,
    /// Display name override used by integrations.
    pub username: Option<String>,
}

impl MessageEvent {
    /// Returns `true` if the message has the given subtype.
    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtype.as_deref() == Some(subtype)
    }

    /// Returns the timestamp a reply should thread under, if any.
    pub fn thread_root(&self) -> Option<&str> {
        self.thread_timestamp.as_deref().filter(|ts| !ts.is_empty())
    }

    /// Classifies this message relative to the bot's own user ID.
    ///
    /// Direct-message channels (IDs starting with `D`) win over mentions.
    /// Without a known bot ID a channel message is always [`MessageType::Ambient`].
    pub fn classify(&self, bot_user_id: Option<&str>) -> MessageType {
        if self.channel.starts_with('D') {
            return MessageType::DirectMessage;
        }

        let Some(id) = bot_user_id.filter(|id| !id.is_empty()) else {
            return MessageType::Ambient;
        };

        match find_mention(&self.text, id) {
            Some(0) => MessageType::DirectMention,
            Some(_) => MessageType::Mention,
            None => MessageType::Ambient,
        }
    }
}

/// Finds the byte offset (ignoring leading whitespace) of the first `<@id>`
/// or `<@id|label>` mention.
fn find_mention(text: &str, id: &str) -> Option<usize> {
    let text = text.trim_start();
    let needle = format!("<@{id}");
    text.match_indices(&needle)
        .find(|(pos, _)| {
            matches!(
                text.as_bytes().get(pos + needle.len()),
                Some(b'>') | Some(b'|')
            )
        })
        .map(|(pos, _)| pos)
}

/// How a message relates to the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Sent in a direct-message channel with the bot.
    DirectMessage,
    /// Starts by mentioning the bot.
    DirectMention,
    /// Mentions the bot somewhere after the start.
    Mention,
    /// Channel chatter that does not address the bot.
    Ambient,
}

impl MessageType {
    /// Returns the wire-style name of this classification.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectMessage => "direct_message",
            Self::DirectMention => "direct_mention",
            Self::Mention => "mention",
            Self::Ambient => "ambient",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ReactionEvent
// ============================================================================

/// Whether a reaction was added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionDirection {
    Added,
    Removed,
}

impl fmt::Display for ReactionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => f.write_str("Added"),
            Self::Removed => f.write_str("Removed"),
        }
    }
}

/// The item a reaction was attached to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionItem {
    /// Item type, usually `"message"`.
    pub kind: String,
    pub channel: String,
    pub timestamp: String,
}

/// A reaction added to or removed from an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub direction: ReactionDirection,
    /// User who reacted.
    pub user: String,
    /// Owner of the reacted-to item.
    pub item_user: String,
    /// Emoji name without colons.
    pub reaction: String,
    pub item: ReactionItem,
    pub event_timestamp: String,
}

// ============================================================================
// InboundEvent
// ============================================================================

/// Identity details reported when a connection is established.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectInfo {
    /// The bot's own user ID.
    pub user_id: String,
    /// The bot's user name.
    #[serde(default)]
    pub user_name: String,
    /// Workspace (team) ID.
    #[serde(default)]
    pub team_id: String,
}

/// The exhaustive set of events a transport loop acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The connection acknowledged the bot's identity.
    Connected(ConnectInfo),
    Message(MessageEvent),
    ReactionAdded(ReactionEvent),
    ReactionRemoved(ReactionEvent),
    /// A transport-reported error.
    Error(String),
    /// The credentials were rejected.
    InvalidAuth,
    /// Anything else; carries a short description of what was received.
    Unsupported(String),
}

impl InboundEvent {
    /// A short, stable name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected(_) => "connected",
            Self::Message(_) => "message",
            Self::ReactionAdded(_) => "reaction_added",
            Self::ReactionRemoved(_) => "reaction_removed",
            Self::Error(_) => "error",
            Self::InvalidAuth => "invalid_auth",
            Self::Unsupported(_) => "unsupported",
        }
    }

    /// The user who originated the event, for events that have one.
    pub fn originating_user(&self) -> Option<&str> {
        match self {
            Self::Message(msg) => Some(&msg.user),
            Self::ReactionAdded(r) | Self::ReactionRemoved(r) => Some(&r.user),
            _ => None,
        }
    }
}
