//! RTM websocket events.

use hearken_core::ConnectInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{MessagePayload, ReactionPayload, type_tag};

/// An event produced by an RTM connection.
///
/// `Connected`, `InvalidAuth` and `ConnectionError` are reported by the wire
/// client itself; everything Slack sends over the socket arrives as a
/// [`Frame`](RtmEvent::Frame).
#[derive(Debug, Clone, PartialEq)]
pub enum RtmEvent {
    Connected(ConnectInfo),
    Frame(RtmFrame),
    InvalidAuth,
    ConnectionError(String),
    /// A frame that could not be decoded; carries the decoder error.
    Malformed(String),
}

impl RtmEvent {
    /// Decodes one raw websocket frame.
    ///
    /// Never fails: undecodable input becomes [`RtmEvent::Malformed`].
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw).and_then(RtmFrame::from_value) {
            Ok(frame) => Self::Frame(frame),
            Err(e) => Self::Malformed(e.to_string()),
        }
    }
}

/// A JSON frame received over the RTM socket, keyed by its `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum RtmFrame {
    Hello,
    Message(MessagePayload),
    ReactionAdded(ReactionPayload),
    ReactionRemoved(ReactionPayload),
    Error(RtmError),
    /// Any other frame type; carries the type name.
    Other(String),
}

impl RtmFrame {
    /// Builds the most specific frame for a parsed JSON object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let frame = match type_tag(&value) {
            "hello" => Self::Hello,
            "message" => Self::Message(serde_json::from_value(value)?),
            "reaction_added" => Self::ReactionAdded(serde_json::from_value(value)?),
            "reaction_removed" => Self::ReactionRemoved(serde_json::from_value(value)?),
            "error" => match value.get("error") {
                Some(body) if !body.is_null() => Self::Error(serde_json::from_value(body.clone())?),
                _ => Self::Error(RtmError::default()),
            },
            other => Self::Other(other.to_string()),
        };
        Ok(frame)
    }

    /// The frame's `type` as sent by Slack.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Hello => "hello",
            Self::Message(_) => "message",
            Self::ReactionAdded(_) => "reaction_added",
            Self::ReactionRemoved(_) => "reaction_removed",
            Self::Error(_) => "error",
            Self::Other(name) => name,
        }
    }
}

/// Body of an RTM `error` frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtmError {
    pub code: i64,
    pub msg: String,
}

impl std::fmt::Display for RtmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RTM error {}: {}", self.code, self.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_message_frame() {
        let raw = r#"{
            "type": "message",
            "channel": "C2147483705",
            "user": "U2147483697",
            "text": "Hello world",
            "ts": "1355517523.000005",
            "thread_ts": "1355517500.000001"
        }"#;

        let RtmEvent::Frame(RtmFrame::Message(msg)) = RtmEvent::decode(raw) else {
            panic!("Expected message frame");
        };
        assert_eq!(msg.channel.as_deref(), Some("C2147483705"));
        assert_eq!(msg.text.as_deref(), Some("Hello world"));
        assert_eq!(msg.thread_ts.as_deref(), Some("1355517500.000001"));
        assert_eq!(msg.subtype, None);
    }

    #[test]
    fn test_decode_reaction_frame() {
        let raw = r#"{
            "type": "reaction_removed",
            "user": "U024BE7LH",
            "reaction": "thumbsup",
            "item_user": "U0G9QF9C6",
            "item": { "type": "message", "channel": "C0G9QF9GZ", "ts": "1360782400.498405" },
            "event_ts": "1360782804.083113"
        }"#;

        let RtmEvent::Frame(RtmFrame::ReactionRemoved(reaction)) = RtmEvent::decode(raw) else {
            panic!("Expected reaction_removed frame");
        };
        assert_eq!(reaction.reaction.as_deref(), Some("thumbsup"));
        assert_eq!(reaction.item.kind.as_deref(), Some("message"));
        assert_eq!(reaction.item.ts.as_deref(), Some("1360782400.498405"));
    }

    #[test]
    fn test_decode_error_frame() {
        let raw = r#"{"type":"error","error":{"code":1,"msg":"Socket URL has expired"}}"#;
        let RtmEvent::Frame(RtmFrame::Error(error)) = RtmEvent::decode(raw) else {
            panic!("Expected error frame");
        };
        assert_eq!(error.code, 1);
        assert_eq!(error.to_string(), "RTM error 1: Socket URL has expired");
    }

    #[test]
    fn test_error_frame_without_body() {
        for raw in [r#"{"type":"error"}"#, r#"{"type":"error","error":null}"#] {
            assert_eq!(
                RtmEvent::decode(raw),
                RtmEvent::Frame(RtmFrame::Error(RtmError::default()))
            );
        }
        assert!(matches!(
            RtmEvent::decode(r#"{"type":"error","error":"expired"}"#),
            RtmEvent::Malformed(_)
        ));
    }

    #[test]
    fn test_decode_unknown_and_malformed() {
        assert_eq!(
            RtmEvent::decode(r#"{"type":"presence_change","user":"U1"}"#),
            RtmEvent::Frame(RtmFrame::Other("presence_change".into()))
        );
        assert_eq!(RtmEvent::decode(r#"{"type":"hello"}"#), RtmEvent::Frame(RtmFrame::Hello));
        assert!(matches!(RtmEvent::decode("not json"), RtmEvent::Malformed(_)));
        assert!(matches!(
            RtmEvent::decode(r#"{"type":"message","text":42}"#),
            RtmEvent::Malformed(_)
        ));
    }
}
