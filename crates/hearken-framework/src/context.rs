//! The per-event context carrier.
//!
//! A [`Context`] is an immutable chain of typed bindings. Every `with_*`
//! method returns a **new** context whose head is one extra binding pointing
//! at the previous chain; the receiver is left untouched:
//!
//! ```text
//! background ◀── Bot ◀── Debug ◀── Message ◀── MessageType ◀── Captures
//!                              ▲
//!                              └── ReactionDirection ◀── Reaction
//! ```
//!
//! Lookups walk from the newest binding outward, so a later binding shadows an
//! earlier one of the same kind. A binding that was never added reads as
//! `None` (or `false` for the debug flag).
//!
//! Nodes are shared through `Arc`, which makes cloning a context a pointer
//! copy and lets one chain be read from several places without locking.

use std::fmt;
use std::sync::Arc;

use hearken_core::{MessageEvent, MessageType, ReactionDirection, ReactionEvent};

use crate::bot::Bot;
use crate::route::Captures;

enum Binding {
    Bot(Arc<Bot>),
    Message(Arc<MessageEvent>),
    MessageType(MessageType),
    ReactionDirection(ReactionDirection),
    Reaction(Arc<ReactionEvent>),
    Debug(bool),
    Captures(Arc<Captures>),
}

impl Binding {
    fn name(&self) -> &'static str {
        match self {
            Self::Bot(_) => "bot",
            Self::Message(_) => "message",
            Self::MessageType(_) => "message_type",
            Self::ReactionDirection(_) => "reaction_direction",
            Self::Reaction(_) => "reaction",
            Self::Debug(_) => "debug",
            Self::Captures(_) => "captures",
        }
    }
}

struct Node {
    binding: Binding,
    parent: Option<Arc<Node>>,
}

/// Immutable, chainable carrier of per-event data.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// Returns an empty context.
    pub fn background() -> Self {
        Self::default()
    }

    fn bind(&self, binding: Binding) -> Self {
        Self {
            head: Some(Arc::new(Node {
                binding,
                parent: self.head.clone(),
            })),
        }
    }

    fn bindings(&self) -> Bindings<'_> {
        Bindings {
            next: self.head.as_deref(),
        }
    }

    // ─── Enrichment ───────────────────────────────────────────────────────────

    /// Binds the bot that received the event.
    pub fn with_bot(&self, bot: Arc<Bot>) -> Self {
        self.bind(Binding::Bot(bot))
    }

    /// Binds the canonical message being dispatched.
    pub fn with_message(&self, message: impl Into<Arc<MessageEvent>>) -> Self {
        self.bind(Binding::Message(message.into()))
    }

    /// Binds the message's classification relative to the bot.
    pub fn with_message_type(&self, message_type: MessageType) -> Self {
        self.bind(Binding::MessageType(message_type))
    }

    /// Binds a reaction event.
    ///
    /// Adds two bindings: the direction first, then the event itself.
    pub fn with_reaction(&self, reaction: impl Into<Arc<ReactionEvent>>) -> Self {
        let reaction = reaction.into();
        self.bind(Binding::ReactionDirection(reaction.direction))
            .bind(Binding::Reaction(reaction))
    }

    /// Marks the context as belonging to a bot running in debug mode.
    pub fn with_debug(&self) -> Self {
        self.bind(Binding::Debug(true))
    }

    /// Binds the capture groups of the route that matched.
    pub fn with_captures(&self, captures: impl Into<Arc<Captures>>) -> Self {
        self.bind(Binding::Captures(captures.into()))
    }

    // ─── Accessors ────────────────────────────────────────────────────────────

    pub fn bot(&self) -> Option<&Arc<Bot>> {
        self.bindings().find_map(|b| match b {
            Binding::Bot(bot) => Some(bot),
            _ => None,
        })
    }

    pub fn message(&self) -> Option<&Arc<MessageEvent>> {
        self.bindings().find_map(|b| match b {
            Binding::Message(msg) => Some(msg),
            _ => None,
        })
    }

    pub fn message_type(&self) -> Option<MessageType> {
        self.bindings().find_map(|b| match b {
            Binding::MessageType(t) => Some(*t),
            _ => None,
        })
    }

    pub fn reaction_direction(&self) -> Option<ReactionDirection> {
        self.bindings().find_map(|b| match b {
            Binding::ReactionDirection(d) => Some(*d),
            _ => None,
        })
    }

    pub fn reaction(&self) -> Option<&Arc<ReactionEvent>> {
        self.bindings().find_map(|b| match b {
            Binding::Reaction(r) => Some(r),
            _ => None,
        })
    }

    /// Returns `true` if a debug binding is present.
    pub fn is_debug(&self) -> bool {
        self.bindings()
            .find_map(|b| match b {
                Binding::Debug(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn captures(&self) -> Option<&Arc<Captures>> {
        self.bindings().find_map(|b| match b {
            Binding::Captures(c) => Some(c),
            _ => None,
        })
    }

    /// Number of bindings in the chain.
    pub fn depth(&self) -> usize {
        self.bindings().count()
    }
}

struct Bindings<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Bindings<'a> {
    type Item = &'a Binding;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.parent.as_deref();
        Some(&node.binding)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.bindings().map(Binding::name))
            .finish()
    }
}
