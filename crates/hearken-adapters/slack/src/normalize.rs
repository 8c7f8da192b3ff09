//! Native event → canonical event mapping.
//!
//! Pure functions: no I/O, no logging, no identity lookups. Absent wire fields
//! become empty strings (required canonical fields) or `None` (optional
//! ones); nothing is validated.

use hearken_core::{
    InboundEvent, MessageEvent, ReactionDirection, ReactionEvent, ReactionItem,
};

use crate::model::{
    CallbackEvent, EventsApiPayload, MessagePayload, ReactionPayload, RtmEvent, RtmFrame,
    SocketEnvelope, SocketModeEvent,
};

/// Maps a `message` body to a canonical message.
pub fn normalize_message(payload: MessagePayload) -> MessageEvent {
    MessageEvent {
        channel: payload.channel.unwrap_or_default(),
        user: payload.user.unwrap_or_default(),
        text: payload.text.unwrap_or_default(),
        timestamp: payload.ts.unwrap_or_default(),
        thread_timestamp: payload.thread_ts,
        subtype: payload.subtype,
        bot_id: payload.bot_id,
        event_timestamp: payload.event_ts,
        client_msg_id: payload.client_msg_id,
        username: payload.username,
    }
}

/// Maps a reaction body to a canonical reaction with the given direction.
pub fn normalize_reaction(payload: ReactionPayload, direction: ReactionDirection) -> ReactionEvent {
    ReactionEvent {
        direction,
        user: payload.user.unwrap_or_default(),
        item_user: payload.item_user.unwrap_or_default(),
        reaction: payload.reaction.unwrap_or_default(),
        item: ReactionItem {
            kind: payload.item.kind.unwrap_or_default(),
            channel: payload.item.channel.unwrap_or_default(),
            timestamp: payload.item.ts.unwrap_or_default(),
        },
        event_timestamp: payload.event_ts.unwrap_or_default(),
    }
}

/// Normalizes one RTM event.
pub fn normalize_rtm(event: RtmEvent) -> InboundEvent {
    match event {
        RtmEvent::Connected(info) => InboundEvent::Connected(info),
        RtmEvent::InvalidAuth => InboundEvent::InvalidAuth,
        RtmEvent::ConnectionError(error) => InboundEvent::Error(error),
        RtmEvent::Malformed(_) => InboundEvent::Unsupported("malformed".into()),
        RtmEvent::Frame(frame) => match frame {
            RtmFrame::Message(payload) => InboundEvent::Message(normalize_message(payload)),
            RtmFrame::ReactionAdded(payload) => {
                InboundEvent::ReactionAdded(normalize_reaction(payload, ReactionDirection::Added))
            }
            RtmFrame::ReactionRemoved(payload) => InboundEvent::ReactionRemoved(
                normalize_reaction(payload, ReactionDirection::Removed),
            ),
            RtmFrame::Error(error) => InboundEvent::Error(error.to_string()),
            RtmFrame::Hello => InboundEvent::Unsupported("hello".into()),
            RtmFrame::Other(kind) => InboundEvent::Unsupported(kind),
        },
    }
}

/// Normalizes one Socket Mode event.
pub fn normalize_socket(event: SocketModeEvent) -> InboundEvent {
    match event {
        SocketModeEvent::Connected(info) => InboundEvent::Connected(info),
        SocketModeEvent::InvalidAuth => InboundEvent::InvalidAuth,
        SocketModeEvent::ConnectionError(error) => InboundEvent::Error(error),
        SocketModeEvent::Connecting => InboundEvent::Unsupported("connecting".into()),
        SocketModeEvent::Malformed(_) => InboundEvent::Unsupported("malformed".into()),
        SocketModeEvent::Envelope(SocketEnvelope::EventsApi(envelope)) => match envelope.payload
        {
            EventsApiPayload::Callback { event, .. } => normalize_callback(event),
            EventsApiPayload::Other(kind) => InboundEvent::Unsupported(kind),
        },
        SocketModeEvent::Envelope(envelope) => {
            InboundEvent::Unsupported(envelope.type_name().to_string())
        }
    }
}

fn normalize_callback(event: CallbackEvent) -> InboundEvent {
    match event {
        CallbackEvent::Message(payload) => InboundEvent::Message(normalize_message(payload)),
        CallbackEvent::ReactionAdded(payload) => {
            InboundEvent::ReactionAdded(normalize_reaction(payload, ReactionDirection::Added))
        }
        CallbackEvent::ReactionRemoved(payload) => {
            InboundEvent::ReactionRemoved(normalize_reaction(payload, ReactionDirection::Removed))
        }
        CallbackEvent::Other(kind) => InboundEvent::Unsupported(kind),
    }
}
