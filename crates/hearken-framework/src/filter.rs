//! Pre-dispatch filtering.
//!
//! Applied to every canonical event before a context is built:
//!
//! - events originated by the bot itself are dropped, whatever their kind
//! - messages whose subtype is a derivative notification (a thread-reply
//!   echo, a thread broadcast, or an integration post) are dropped
//!
//! The decision depends only on the event and the identity, so filtering the
//! same event twice gives the same answer.

use hearken_core::{BotIdentity, InboundEvent, MessageEvent, ReactionEvent, subtype};

/// Message subtypes that are never dispatched.
pub const IGNORED_SUBTYPES: [&str; 3] = [
    subtype::MESSAGE_REPLIED,
    subtype::THREAD_BROADCAST,
    subtype::BOT_MESSAGE,
];

/// The filter's verdict on one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Hand the event to the dispatcher.
    Dispatch,
    /// The bot sent this event itself.
    SelfEvent,
    /// The message subtype is excluded.
    IgnoredSubtype(&'static str),
    /// Connection and control events are never routed.
    NotRoutable,
}

impl Admission {
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch)
    }
}

pub fn admit_message(message: &MessageEvent, identity: &BotIdentity) -> Admission {
    if identity.is_self(&message.user) {
        return Admission::SelfEvent;
    }

    match IGNORED_SUBTYPES
        .into_iter()
        .find(|ignored| message.has_subtype(ignored))
    {
        Some(ignored) => Admission::IgnoredSubtype(ignored),
        None => Admission::Dispatch,
    }
}

pub fn admit_reaction(reaction: &ReactionEvent, identity: &BotIdentity) -> Admission {
    if identity.is_self(&reaction.user) {
        Admission::SelfEvent
    } else {
        Admission::Dispatch
    }
}

/// Decides whether an inbound event should reach the dispatcher.
pub fn admit(event: &InboundEvent, identity: &BotIdentity) -> Admission {
    match event {
        InboundEvent::Message(message) => admit_message(message, identity),
        InboundEvent::ReactionAdded(reaction) | InboundEvent::ReactionRemoved(reaction) => {
            admit_reaction(reaction, identity)
        }
        _ => Admission::NotRoutable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearken_core::{ConnectInfo, ReactionDirection, ReactionItem};

    use crate::test_support::sample_message;

    fn reaction(user: &str, direction: ReactionDirection) -> ReactionEvent {
        ReactionEvent {
            direction,
            user: user.into(),
            item_user: "UBOT".into(),
            reaction: "eyes".into(),
            item: ReactionItem::default(),
            event_timestamp: "1.0".into(),
        }
    }

    #[test]
    fn test_self_events_are_dropped_for_every_kind() {
        let identity = BotIdentity::with_user_id("UBOT");
        let mut message = sample_message("anything at all");
        message.user = "UBOT".into();

        assert_eq!(
            admit(&InboundEvent::Message(message), &identity),
            Admission::SelfEvent
        );
        assert_eq!(
            admit(
                &InboundEvent::ReactionAdded(reaction("UBOT", ReactionDirection::Added)),
                &identity
            ),
            Admission::SelfEvent
        );
        assert_eq!(
            admit(
                &InboundEvent::ReactionRemoved(reaction("UBOT", ReactionDirection::Removed)),
                &identity
            ),
            Admission::SelfEvent
        );
    }

    #[test]
    fn test_ignored_subtypes() {
        let identity = BotIdentity::with_user_id("UBOT");
        for ignored in IGNORED_SUBTYPES {
            let mut message = sample_message("echo");
            message.subtype = Some(ignored.to_string());
            assert_eq!(
                admit_message(&message, &identity),
                Admission::IgnoredSubtype(ignored)
            );
        }

        let mut edited = sample_message("edited");
        edited.subtype = Some("me_message".into());
        assert_eq!(admit_message(&edited, &identity), Admission::Dispatch);
    }

    #[test]
    fn test_unassigned_identity_admits_everyone() {
        let identity = BotIdentity::new();
        let mut message = sample_message("hi");
        message.user = String::new();
        assert_eq!(admit_message(&message, &identity), Admission::Dispatch);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let identity = BotIdentity::with_user_id("UBOT");
        let event = InboundEvent::ReactionAdded(reaction("U1", ReactionDirection::Added));
        let first = admit(&event, &identity);
        assert_eq!(first, admit(&event, &identity));
        assert!(first.is_dispatch());
    }

    #[test]
    fn test_control_events_are_not_routable() {
        let identity = BotIdentity::new();
        assert_eq!(
            admit(&InboundEvent::Connected(ConnectInfo::default()), &identity),
            Admission::NotRoutable
        );
        assert_eq!(admit(&InboundEvent::InvalidAuth, &identity), Admission::NotRoutable);
    }
}
