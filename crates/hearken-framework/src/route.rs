//! Route registry and builders.
//!
//! Registration is a two-step contract. First a criterion is registered,
//! yielding a builder bound to it; then the builder is finalized with a
//! handler, which appends the completed [`Route`]:
//!
//! ```rust,ignore
//! let mut router = Router::new();
//! router.hear("(?i)how are you(.*)")?.message_handler(how_are_you);
//! router.on_reaction().reaction_handler(on_reaction);
//! ```
//!
//! Finalizing consumes the builder, and builders are the only way to create a
//! `Route`. Routes keep their registration order forever: the registry never
//! reorders, deduplicates or removes them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::dispatcher::Dispatcher;
use crate::error::RouteError;
use crate::handler::{MessageHandler, ReactionHandler};

/// The kind of event a route accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    Message,
    Reaction,
}

pub(crate) enum RouteRule {
    Message {
        pattern: Regex,
        handler: Arc<dyn MessageHandler>,
    },
    Reaction {
        handler: Arc<dyn ReactionHandler>,
    },
}

/// A registered (criterion, handler) pair with its registration index.
pub struct Route {
    index: usize,
    pub(crate) rule: RouteRule,
}

impl Route {
    /// Position in registration order, starting at zero.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> RouteKind {
        match self.rule {
            RouteRule::Message { .. } => RouteKind::Message,
            RouteRule::Reaction { .. } => RouteKind::Reaction,
        }
    }

    /// The source pattern of a message route.
    pub fn pattern(&self) -> Option<&str> {
        match &self.rule {
            RouteRule::Message { pattern, .. } => Some(pattern.as_str()),
            RouteRule::Reaction { .. } => None,
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("index", &self.index)
            .field("kind", &self.kind())
            .field("pattern", &self.pattern())
            .finish()
    }
}

// ============================================================================
// Router
// ============================================================================

/// The ordered route registry used during setup.
///
/// Registration needs `&mut Router`; once every route is in place the router
/// is frozen with [`into_dispatcher`](Self::into_dispatcher).
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a message criterion.
    ///
    /// The pattern is matched anywhere in the message text; anchor it with
    /// `^`/`$` to require a full match.
    pub fn hear(&mut self, pattern: &str) -> Result<MessageRouteBuilder<'_>, RouteError> {
        let regex = Regex::new(pattern).map_err(|source| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.hear_regex(regex))
    }

    /// Registers a message criterion from a precompiled regex.
    pub fn hear_regex(&mut self, pattern: Regex) -> MessageRouteBuilder<'_> {
        MessageRouteBuilder {
            router: self,
            pattern,
        }
    }

    /// Registers the implicit "any reaction" criterion.
    pub fn on_reaction(&mut self) -> ReactionRouteBuilder<'_> {
        ReactionRouteBuilder { router: self }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Freezes the registry into a dispatcher.
    pub fn into_dispatcher(self) -> Dispatcher {
        Dispatcher::new(self.routes)
    }

    fn push(&mut self, rule: RouteRule) {
        let index = self.routes.len();
        self.routes.push(Route { index, rule });
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .finish()
    }
}

/// Builder returned by [`Router::hear`].
#[must_use = "the route is only registered once a handler is attached"]
pub struct MessageRouteBuilder<'r> {
    router: &'r mut Router,
    pattern: Regex,
}

impl MessageRouteBuilder<'_> {
    /// Finalizes the route with a message handler.
    pub fn message_handler<H: MessageHandler>(self, handler: H) {
        self.router.push(RouteRule::Message {
            pattern: self.pattern,
            handler: Arc::new(handler),
        });
    }
}

/// Builder returned by [`Router::on_reaction`].
#[must_use = "the route is only registered once a handler is attached"]
pub struct ReactionRouteBuilder<'r> {
    router: &'r mut Router,
}

impl ReactionRouteBuilder<'_> {
    /// Finalizes the route with a reaction handler.
    pub fn reaction_handler<H: ReactionHandler>(self, handler: H) {
        self.router.push(RouteRule::Reaction {
            handler: Arc::new(handler),
        });
    }
}

// ============================================================================
// Captures
// ============================================================================

/// Owned capture groups from a matched message pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    groups: Vec<Option<String>>,
    names: HashMap<String, usize>,
}

impl Captures {
    pub(crate) fn from_regex(pattern: &Regex, caps: &regex::Captures<'_>) -> Self {
        let groups = caps
            .iter()
            .map(|m| m.map(|m| m.as_str().to_string()))
            .collect();
        let names = pattern
            .capture_names()
            .enumerate()
            .filter_map(|(i, name)| name.map(|name| (name.to_string(), i)))
            .collect();
        Self { groups, names }
    }

    /// The full matched text (group 0).
    pub fn matched(&self) -> &str {
        self.get(0).unwrap_or_default()
    }

    /// Returns group `i`, or `None` if it did not participate in the match.
    pub fn get(&self, i: usize) -> Option<&str> {
        self.groups.get(i).and_then(Option::as_deref)
    }

    /// Returns a named group.
    pub fn name(&self, name: &str) -> Option<&str> {
        self.names.get(name).and_then(|&i| self.get(i))
    }

    /// Number of groups, including group 0.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{noop_message_handler, noop_reaction_handler};

    #[test]
    fn test_routes_keep_registration_order() {
        let mut router = Router::new();
        router.hear("a").unwrap().message_handler(noop_message_handler);
        router.on_reaction().reaction_handler(noop_reaction_handler);
        router.hear("a").unwrap().message_handler(noop_message_handler);

        let summary: Vec<_> = router
            .routes()
            .iter()
            .map(|r| (r.index(), r.kind(), r.pattern()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, RouteKind::Message, Some("a")),
                (1, RouteKind::Reaction, None),
                (2, RouteKind::Message, Some("a")),
            ]
        );
    }

    #[test]
    fn test_unfinished_builder_registers_nothing() {
        let mut router = Router::new();
        let _ = router.hear("never finished").unwrap();
        let _ = router.on_reaction();
        assert!(router.is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let mut router = Router::new();
        let err = router.hear("(unclosed").err().unwrap();
        assert!(matches!(err, RouteError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
        assert!(router.is_empty());
    }

    #[test]
    fn test_captures_expose_positional_and_named_groups() {
        let pattern = Regex::new(r"(?i)deploy (?P<app>\w+)( now)?").unwrap();
        let caps = pattern.captures("please Deploy web").unwrap();
        let captures = Captures::from_regex(&pattern, &caps);

        assert_eq!(captures.matched(), "Deploy web");
        assert_eq!(captures.get(1), Some("web"));
        assert_eq!(captures.name("app"), Some("web"));
        assert_eq!(captures.get(2), None);
        assert_eq!(captures.name("missing"), None);
        assert_eq!(captures.len(), 3);
    }
}
