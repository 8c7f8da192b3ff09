//! Matcher and dispatcher.
//!
//! The [`Dispatcher`] owns a frozen route table and evaluates it against the
//! event carried by a [`Context`]:
//!
//! 1. Routes are tried in registration order
//! 2. A message route matches when its regex finds a match anywhere in the text
//! 3. A reaction route matches any reaction, added or removed
//! 4. The first match wins; its handler is awaited in the calling task
//!
//! No match is a normal outcome. Handler errors are returned as-is, never
//! retried, logged or swallowed here.
//!
//! # Tower Service Integration
//!
//! `Dispatcher` implements `tower::Service<Context>`, so middleware such as a
//! timeout can be layered around it:
//!
//! ```rust,ignore
//! use tower::ServiceBuilder;
//! use tower::timeout::TimeoutLayer;
//!
//! let service = ServiceBuilder::new()
//!     .layer(TimeoutLayer::new(Duration::from_secs(30)))
//!     .service(router.into_dispatcher());
//! ```

use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use hearken_core::{MessageEvent, ReactionEvent};
use tower::Service;
use tracing::{Instrument, debug_span, trace};

use crate::context::Context;
use crate::error::DispatchError;
use crate::handler::{MessageHandler, ReactionHandler};
use crate::route::{Captures, Route, RouteRule};

/// The result of a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The route at this registration index handled the event.
    Matched { route: usize },
    /// No route matched; nothing was invoked.
    NotMatched,
}

impl DispatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

enum MatchedHandler {
    Message(Arc<dyn MessageHandler>, Arc<MessageEvent>),
    Reaction(Arc<dyn ReactionHandler>, Arc<ReactionEvent>),
}

/// A successful match, ready to be invoked.
///
/// Built fresh for every dispatch attempt and consumed by
/// [`invoke`](Self::invoke).
pub struct RouteMatch {
    route: usize,
    handler: MatchedHandler,
    captures: Option<Arc<Captures>>,
    context: Context,
}

impl RouteMatch {
    /// Registration index of the matched route.
    pub fn route_index(&self) -> usize {
        self.route
    }

    /// Capture groups of a matched message route.
    pub fn captures(&self) -> Option<&Captures> {
        self.captures.as_deref()
    }

    /// The context the handler will receive.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Runs the matched handler.
    pub async fn invoke(self) -> Result<(), DispatchError> {
        let bot = self
            .context
            .bot()
            .cloned()
            .ok_or(DispatchError::MissingBot)?;

        let result = match self.handler {
            MatchedHandler::Message(handler, message) => {
                handler.call(self.context, bot, message).await
            }
            MatchedHandler::Reaction(handler, reaction) => {
                handler.call(self.context, bot, reaction).await
            }
        };

        result.map_err(|source| DispatchError::Handler {
            route: self.route,
            source,
        })
    }
}

/// Evaluates a frozen route table against incoming events.
///
/// Cloning is cheap; the route table is shared and never mutated.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<[Route]>,
}

impl Dispatcher {
    pub(crate) fn new(routes: Vec<Route>) -> Self {
        Self {
            routes: routes.into(),
        }
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Finds the first route matching the event in `ctx`.
    ///
    /// A context carrying a message is matched against message routes; one
    /// carrying a reaction against reaction routes. Anything else never
    /// matches.
    pub fn find_match(&self, ctx: &Context) -> Option<RouteMatch> {
        if let Some(message) = ctx.message() {
            return self.routes.iter().find_map(|route| match &route.rule {
                RouteRule::Message { pattern, handler } => {
                    let caps = pattern.captures(&message.text)?;
                    let captures = Arc::new(Captures::from_regex(pattern, &caps));
                    Some(RouteMatch {
                        route: route.index(),
                        handler: MatchedHandler::Message(Arc::clone(handler), Arc::clone(message)),
                        context: ctx.with_captures(Arc::clone(&captures)),
                        captures: Some(captures),
                    })
                }
                RouteRule::Reaction { .. } => None,
            });
        }

        if let Some(reaction) = ctx.reaction() {
            return self.routes.iter().find_map(|route| match &route.rule {
                RouteRule::Reaction { handler } => Some(RouteMatch {
                    route: route.index(),
                    handler: MatchedHandler::Reaction(Arc::clone(handler), Arc::clone(reaction)),
                    captures: None,
                    context: ctx.clone(),
                }),
                RouteRule::Message { .. } => None,
            });
        }

        None
    }

    /// Matches the event in `ctx` and invokes at most one handler.
    pub async fn dispatch(&self, ctx: Context) -> Result<DispatchOutcome, DispatchError> {
        let Some(matched) = self.find_match(&ctx) else {
            trace!("no route matched");
            return Ok(DispatchOutcome::NotMatched);
        };

        let route = matched.route_index();
        let span = debug_span!("dispatch", route);
        async move {
            trace!("invoking handler");
            matched.invoke().await?;
            Ok(DispatchOutcome::Matched { route })
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("route_count", &self.routes.len())
            .finish()
    }
}

impl Service<Context> for Dispatcher {
    type Response = DispatchOutcome;
    type Error = DispatchError;
    type Future = BoxFuture<'static, Result<DispatchOutcome, DispatchError>>;

    fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, ctx: Context) -> Self::Future {
        let dispatcher = self.clone();
        async move { dispatcher.dispatch(ctx).await }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hearken_core::{ReactionDirection, ReactionItem};
    use parking_lot::Mutex;
    use tower::ServiceExt;

    use crate::bot::Bot;
    use crate::handler::{BoxError, HandlerResult};
    use crate::route::Router;
    use crate::test_support::{mock_bot, sample_message};

    type TestHandler = Box<
        dyn Fn(Context, Arc<Bot>, Arc<MessageEvent>) -> BoxFuture<'static, HandlerResult>
            + Send
            + Sync,
    >;

    fn counting_handler(counter: &Arc<AtomicUsize>, amount: usize) -> TestHandler {
        let counter = Arc::clone(counter);
        Box::new(move |_ctx: Context, _bot: Arc<Bot>, _msg: Arc<MessageEvent>| {
            counter.fetch_add(amount, Ordering::SeqCst);
            async { Ok::<(), BoxError>(()) }.boxed()
        })
    }

    async fn failing_handler(
        _ctx: Context,
        _bot: Arc<Bot>,
        _msg: Arc<MessageEvent>,
    ) -> HandlerResult {
        Err(io::Error::other("handler exploded").into())
    }

    fn message_ctx(text: &str) -> Context {
        let (bot, _api) = mock_bot();
        Context::background()
            .with_bot(bot)
            .with_message(sample_message(text))
    }

    fn reaction_ctx(direction: ReactionDirection) -> Context {
        let (bot, _api) = mock_bot();
        Context::background().with_bot(bot).with_reaction(ReactionEvent {
            direction,
            user: "U1".into(),
            item_user: "U2".into(),
            reaction: "wave".into(),
            item: ReactionItem::default(),
            event_timestamp: "1.0".into(),
        })
    }

    #[tokio::test]
    async fn test_dispatch_no_routes() {
        let dispatcher = Router::new().into_dispatcher();
        let outcome = dispatcher.dispatch(message_ctx("hi")).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::NotMatched);
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.hear("never").unwrap().message_handler(counting_handler(&counter, 100));
        router.hear("how").unwrap().message_handler(counting_handler(&counter, 1));
        router.hear("are").unwrap().message_handler(counting_handler(&counter, 10));
        let dispatcher = router.into_dispatcher();

        let outcome = dispatcher.dispatch(message_ctx("how are you")).await.unwrap();

        assert_eq!(outcome, DispatchOutcome::Matched { route: 1 });
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_case_insensitive_substring_match() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router
            .hear("(?i)how are you")
            .unwrap()
            .message_handler(counting_handler(&counter, 1));
        let dispatcher = router.into_dispatcher();

        let matched = dispatcher.dispatch(message_ctx("How are you today?")).await.unwrap();
        let missed = dispatcher.dispatch(message_ctx("Good morning")).await.unwrap();

        assert!(matched.is_matched());
        assert_eq!(missed, DispatchOutcome::NotMatched);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_handler_sees_message_and_captures() {
        let seen: Arc<Mutex<Option<(Option<String>, bool)>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);

        let mut router = Router::new();
        router.hear("(?i)how are you(.*)").unwrap().message_handler(
            move |ctx: Context, _bot: Arc<Bot>, msg: Arc<MessageEvent>| {
                let rest = ctx.captures().and_then(|c| c.get(1)).map(str::to_string);
                let same = ctx.message().is_some_and(|m| Arc::ptr_eq(m, &msg));
                *sink.lock() = Some((rest, same));
                async { Ok::<(), BoxError>(()) }
            },
        );
        let dispatcher = router.into_dispatcher();

        dispatcher.dispatch(message_ctx("How are you today?")).await.unwrap();

        assert_eq!(*seen.lock(), Some((Some(" today?".to_string()), true)));
    }

    #[tokio::test]
    async fn test_reaction_route_ignores_messages_and_vice_versa() {
        let counter = Arc::new(AtomicUsize::new(0));
        let reactions = Arc::clone(&counter);
        let directions: Arc<Mutex<Vec<Option<ReactionDirection>>>> = Arc::default();
        let direction_sink = Arc::clone(&directions);

        let mut router = Router::new();
        router.on_reaction().reaction_handler(
            move |ctx: Context, _bot: Arc<Bot>, reaction: Arc<ReactionEvent>| {
                assert_eq!(ctx.reaction().map(|r| r.direction), Some(reaction.direction));
                direction_sink.lock().push(ctx.reaction_direction());
                reactions.fetch_add(1, Ordering::SeqCst);
                async { Ok::<(), BoxError>(()) }
            },
        );
        router.hear(".*").unwrap().message_handler(counting_handler(&counter, 100));
        let dispatcher = router.into_dispatcher();

        let added = dispatcher.dispatch(reaction_ctx(ReactionDirection::Added)).await.unwrap();
        let removed = dispatcher.dispatch(reaction_ctx(ReactionDirection::Removed)).await.unwrap();
        let message = dispatcher.dispatch(message_ctx("anything")).await.unwrap();

        assert_eq!(added, DispatchOutcome::Matched { route: 0 });
        assert_eq!(removed, DispatchOutcome::Matched { route: 0 });
        assert_eq!(message, DispatchOutcome::Matched { route: 1 });
        assert_eq!(counter.load(Ordering::SeqCst), 102);
        assert_eq!(
            *directions.lock(),
            vec![Some(ReactionDirection::Added), Some(ReactionDirection::Removed)]
        );
    }

    #[tokio::test]
    async fn test_reaction_without_reaction_routes_is_not_matched() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.hear(".*").unwrap().message_handler(counting_handler(&counter, 1));
        let dispatcher = router.into_dispatcher();

        let outcome = dispatcher.dispatch(reaction_ctx(ReactionDirection::Added)).await.unwrap();

        assert_eq!(outcome, DispatchOutcome::NotMatched);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_context_without_event_is_not_matched() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.hear(".*").unwrap().message_handler(counting_handler(&counter, 1));
        let dispatcher = router.into_dispatcher();

        let (bot, _api) = mock_bot();
        let outcome = dispatcher
            .dispatch(Context::background().with_bot(bot))
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::NotMatched);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_error_is_propagated() {
        let mut router = Router::new();
        router.hear("boom").unwrap().message_handler(failing_handler);
        let dispatcher = router.into_dispatcher();

        let err = dispatcher.dispatch(message_ctx("boom")).await.unwrap_err();

        match err {
            DispatchError::Handler { route, source } => {
                assert_eq!(route, 0);
                assert_eq!(source.to_string(), "handler exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_bot_is_reported() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.hear(".*").unwrap().message_handler(counting_handler(&counter, 1));
        let dispatcher = router.into_dispatcher();

        let ctx = Context::background().with_message(sample_message("hi"));
        let err = dispatcher.dispatch(ctx).await.unwrap_err();

        assert!(matches!(err, DispatchError::MissingBot));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_find_match_does_not_invoke() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router
            .hear("(?P<word>hello)")
            .unwrap()
            .message_handler(counting_handler(&counter, 1));
        let dispatcher = router.into_dispatcher();

        let ctx = message_ctx("well hello there");
        let matched = dispatcher.find_match(&ctx).unwrap();

        assert_eq!(matched.route_index(), 0);
        assert_eq!(matched.captures().unwrap().name("word"), Some("hello"));
        assert!(matched.context().captures().is_some());
        assert!(ctx.captures().is_none());
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio_test::block_on(matched.invoke()).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatcher_as_tower_service() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.hear("ping").unwrap().message_handler(counting_handler(&counter, 1));
        let dispatcher = router.into_dispatcher();

        let outcome = dispatcher.clone().oneshot(message_ctx("ping")).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Matched { route: 0 });

        let outcome = dispatcher.oneshot(message_ctx("pong")).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::NotMatched);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
