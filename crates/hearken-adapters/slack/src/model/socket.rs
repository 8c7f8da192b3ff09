//! Socket Mode events and envelopes.

use hearken_core::ConnectInfo;
use serde_json::Value;

use super::{MessagePayload, ReactionPayload, type_tag};

/// An event produced by a Socket Mode connection.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketModeEvent {
    Connecting,
    Connected(ConnectInfo),
    ConnectionError(String),
    InvalidAuth,
    Envelope(SocketEnvelope),
    /// An envelope that could not be decoded; carries the decoder error.
    Malformed(String),
}

impl SocketModeEvent {
    /// Decodes one raw Socket Mode message.
    ///
    /// Never fails: undecodable input becomes [`SocketModeEvent::Malformed`].
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw).and_then(SocketEnvelope::from_value) {
            Ok(envelope) => Self::Envelope(envelope),
            Err(e) => Self::Malformed(e.to_string()),
        }
    }

    /// The envelope ID Slack expects to be acknowledged, if any.
    pub fn envelope_id(&self) -> Option<&str> {
        match self {
            Self::Envelope(SocketEnvelope::EventsApi(envelope)) => Some(&envelope.envelope_id),
            _ => None,
        }
    }
}

/// A Socket Mode envelope, keyed by its `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEnvelope {
    Hello,
    EventsApi(EventsApiEnvelope),
    /// Interactive payloads are received but not routed.
    Interactive { envelope_id: String },
    /// Slash commands are received but not routed.
    SlashCommands { envelope_id: String },
    Disconnect { reason: String },
    /// Any other envelope type; carries the type name.
    Other(String),
}

impl SocketEnvelope {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let envelope = match type_tag(&value) {
            "hello" => Self::Hello,
            "events_api" => Self::EventsApi(EventsApiEnvelope::from_value(value)?),
            "interactive" => Self::Interactive {
                envelope_id: string_field(&value, "envelope_id"),
            },
            "slash_commands" => Self::SlashCommands {
                envelope_id: string_field(&value, "envelope_id"),
            },
            "disconnect" => Self::Disconnect {
                reason: string_field(&value, "reason"),
            },
            other => Self::Other(other.to_string()),
        };
        Ok(envelope)
    }

    pub fn type_name(&self) -> &str {
        match self {
            Self::Hello => "hello",
            Self::EventsApi(_) => "events_api",
            Self::Interactive { .. } => "interactive",
            Self::SlashCommands { .. } => "slash_commands",
            Self::Disconnect { .. } => "disconnect",
            Self::Other(name) => name,
        }
    }
}

/// An `events_api` envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct EventsApiEnvelope {
    pub envelope_id: String,
    pub payload: EventsApiPayload,
}

impl EventsApiEnvelope {
    fn from_value(mut value: Value) -> Result<Self, serde_json::Error> {
        let envelope_id = string_field(&value, "envelope_id");
        let payload = match value.get_mut("payload").map(Value::take) {
            Some(payload) => EventsApiPayload::from_value(payload)?,
            None => EventsApiPayload::Other(String::new()),
        };
        Ok(Self {
            envelope_id,
            payload,
        })
    }
}

/// The Events API payload carried by an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum EventsApiPayload {
    /// An `event_callback` wrapping one inner event.
    Callback {
        team_id: String,
        event_id: String,
        event: CallbackEvent,
    },
    /// Any other payload type (`url_verification`, `app_rate_limited`, ...).
    Other(String),
}

impl EventsApiPayload {
    fn from_value(mut value: Value) -> Result<Self, serde_json::Error> {
        if type_tag(&value) != "event_callback" {
            return Ok(Self::Other(type_tag(&value).to_string()));
        }

        let team_id = string_field(&value, "team_id");
        let event_id = string_field(&value, "event_id");
        let event = match value.get_mut("event").map(Value::take) {
            Some(inner) => CallbackEvent::from_value(inner)?,
            None => CallbackEvent::Other(String::new()),
        };
        Ok(Self::Callback {
            team_id,
            event_id,
            event,
        })
    }
}

/// The inner event of an `event_callback`.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackEvent {
    Message(MessagePayload),
    ReactionAdded(ReactionPayload),
    ReactionRemoved(ReactionPayload),
    Other(String),
}

impl CallbackEvent {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let event = match type_tag(&value) {
            "message" => Self::Message(serde_json::from_value(value)?),
            "reaction_added" => Self::ReactionAdded(serde_json::from_value(value)?),
            "reaction_removed" => Self::ReactionRemoved(serde_json::from_value(value)?),
            other => Self::Other(other.to_string()),
        };
        Ok(event)
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE_ENVELOPE: &str = r#"{
        "type": "events_api",
        "envelope_id": "57d6a792-4d35-4d0b-b6aa-3361493e1caf",
        "accepts_response_payload": false,
        "payload": {
            "type": "event_callback",
            "team_id": "T012AB3C4",
            "event_id": "Ev01ABCDEF",
            "event": {
                "type": "message",
                "channel": "C123ABC456",
                "channel_type": "channel",
                "user": "U123ABC456",
                "text": "How are you today?",
                "ts": "1700000000.000100",
                "event_ts": "1700000000.000100",
                "client_msg_id": "a1b2c3"
            }
        }
    }"#;

    #[test]
    fn test_decode_events_api_message() {
        let event = SocketModeEvent::decode(MESSAGE_ENVELOPE);
        assert_eq!(event.envelope_id(), Some("57d6a792-4d35-4d0b-b6aa-3361493e1caf"));

        let SocketModeEvent::Envelope(SocketEnvelope::EventsApi(envelope)) = event else {
            panic!("Expected events_api envelope");
        };
        let EventsApiPayload::Callback { team_id, event, .. } = envelope.payload else {
            panic!("Expected event_callback payload");
        };
        assert_eq!(team_id, "T012AB3C4");
        let CallbackEvent::Message(msg) = event else {
            panic!("Expected message event");
        };
        assert_eq!(msg.text.as_deref(), Some("How are you today?"));
        assert_eq!(msg.channel_type.as_deref(), Some("channel"));
        assert_eq!(msg.client_msg_id.as_deref(), Some("a1b2c3"));
    }

    #[test]
    fn test_decode_control_envelopes() {
        assert_eq!(
            SocketModeEvent::decode(r#"{"type":"hello","num_connections":1}"#),
            SocketModeEvent::Envelope(SocketEnvelope::Hello)
        );
        assert_eq!(
            SocketModeEvent::decode(r#"{"type":"disconnect","reason":"refresh_requested"}"#),
            SocketModeEvent::Envelope(SocketEnvelope::Disconnect {
                reason: "refresh_requested".into()
            })
        );

        let slash = SocketModeEvent::decode(
            r#"{"type":"slash_commands","envelope_id":"e1","payload":{"command":"/deploy"}}"#,
        );
        assert_eq!(
            slash,
            SocketModeEvent::Envelope(SocketEnvelope::SlashCommands {
                envelope_id: "e1".into()
            })
        );
        assert_eq!(slash.envelope_id(), None);
    }

    #[test]
    fn test_decode_non_callback_payload() {
        let raw = r#"{"type":"events_api","envelope_id":"e2","payload":{"type":"app_rate_limited"}}"#;
        let SocketModeEvent::Envelope(SocketEnvelope::EventsApi(envelope)) =
            SocketModeEvent::decode(raw)
        else {
            panic!("Expected events_api envelope");
        };
        assert_eq!(envelope.envelope_id, "e2");
        assert_eq!(
            envelope.payload,
            EventsApiPayload::Other("app_rate_limited".into())
        );
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(
            SocketModeEvent::decode("{"),
            SocketModeEvent::Malformed(_)
        ));
        assert!(matches!(
            SocketModeEvent::decode(
                r#"{"type":"events_api","envelope_id":"e3","payload":{"type":"event_callback","event":{"type":"message","user":7}}}"#
            ),
            SocketModeEvent::Malformed(_)
        ));
    }
}
