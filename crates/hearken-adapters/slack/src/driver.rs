//! Per-event processing shared by both transport loops.
//!
//! ```text
//! InboundEvent ──▶ control? ──▶ log / assign identity
//!              └─▶ admit ──▶ Context ──▶ Dispatcher
//! ```

use std::sync::Arc;

use hearken_core::{ConnectInfo, InboundEvent};
use hearken_framework::{
    Admission, Bot, Context, DispatchError, DispatchOutcome, Dispatcher, admit,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::source::EventSource;

/// Why a transport loop returned normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The shutdown token was cancelled.
    Shutdown,
    /// The event source ended.
    StreamClosed,
}

/// Waits for the next native event unless shutdown is requested first.
///
/// This is the loop's only cancellation point; work already handed to the
/// driver always runs to completion.
pub(crate) async fn next_event<E, S>(source: &mut S, shutdown: &CancellationToken) -> Result<E, LoopExit>
where
    S: EventSource<E> + ?Sized,
{
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => Err(LoopExit::Shutdown),
        event = source.next_event() => event.ok_or(LoopExit::StreamClosed),
    }
}

/// What happened to one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// A route matched and its handler completed.
    Dispatched { route: usize },
    /// The event was routable but no route matched.
    Unmatched,
    /// The filter rejected the event.
    Filtered(Admission),
    /// A connection or control event; nothing was dispatched.
    Control,
}

/// Turns canonical events into dispatches for one bot.
#[derive(Debug, Clone)]
pub struct EventDriver {
    bot: Arc<Bot>,
    dispatcher: Dispatcher,
}

impl EventDriver {
    pub fn new(bot: Arc<Bot>, dispatcher: Dispatcher) -> Self {
        Self { bot, dispatcher }
    }

    pub fn bot(&self) -> &Arc<Bot> {
        &self.bot
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Processes one canonical event to completion.
    ///
    /// A matched handler is awaited here; its failure is the only error.
    pub async fn handle(&self, event: InboundEvent) -> Result<EventOutcome, DispatchError> {
        if self.bot.is_debug() {
            debug!(event_type = event.kind(), "Event received");
        }

        let admission = admit(&event, self.bot.identity());
        let ctx = match event {
            InboundEvent::Connected(info) => {
                self.on_connected(&info);
                return Ok(EventOutcome::Control);
            }
            InboundEvent::Error(message) => {
                error!(error = %message, "Transport reported an error");
                return Ok(EventOutcome::Control);
            }
            InboundEvent::InvalidAuth => {
                error!("Invalid credentials");
                return Ok(EventOutcome::Control);
            }
            InboundEvent::Unsupported(kind) => {
                trace!(kind = %kind, "Ignoring unsupported event");
                return Ok(EventOutcome::Control);
            }
            _ if !admission.is_dispatch() => {
                trace!(?admission, "Event filtered");
                return Ok(EventOutcome::Filtered(admission));
            }
            InboundEvent::Message(message) => {
                let message_type = message.classify(self.bot.user_id());
                self.base_context()
                    .with_message(message)
                    .with_message_type(message_type)
            }
            InboundEvent::ReactionAdded(reaction) | InboundEvent::ReactionRemoved(reaction) => {
                self.base_context().with_reaction(reaction)
            }
        };

        match self.dispatcher.dispatch(ctx).await? {
            DispatchOutcome::Matched { route } => Ok(EventOutcome::Dispatched { route }),
            DispatchOutcome::NotMatched => Ok(EventOutcome::Unmatched),
        }
    }

    fn base_context(&self) -> Context {
        let ctx = Context::background().with_bot(Arc::clone(&self.bot));
        if self.bot.is_debug() {
            ctx.with_debug()
        } else {
            ctx
        }
    }

    fn on_connected(&self, info: &ConnectInfo) {
        info!(
            user_id = %info.user_id,
            user_name = %info.user_name,
            team_id = %info.team_id,
            "Connected to Slack"
        );

        if info.user_id.is_empty() {
            return;
        }
        if let Err(e) = self.bot.identity().assign(&info.user_id) {
            warn!(error = %e, "Ignoring identity acknowledgement");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearken_core::{MessageEvent, MessageType, ReactionDirection, ReactionEvent, ReactionItem};
    use hearken_framework::{HandlerResult, Router};
    use parking_lot::Mutex;

    use crate::testing::RecordingApi;

    fn message(user: &str, channel: &str, text: &str) -> InboundEvent {
        InboundEvent::Message(MessageEvent {
            channel: channel.into(),
            user: user.into(),
            text: text.into(),
            timestamp: "1700000000.000100".into(),
            ..Default::default()
        })
    }

    fn driver_with_seen() -> (EventDriver, Arc<Mutex<Vec<Option<MessageType>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = Router::new();
        let recorder = Arc::clone(&seen);
        router.hear("hello").unwrap().message_handler(
            move |ctx: Context, _bot: Arc<Bot>, _msg: Arc<MessageEvent>| {
                let recorder = Arc::clone(&recorder);
                async move {
                    recorder.lock().push(ctx.message_type());
                    HandlerResult::Ok(())
                }
            },
        );
        router.on_reaction().reaction_handler(
            |_ctx: Context, _bot: Arc<Bot>, _reaction: Arc<ReactionEvent>| async {
                HandlerResult::Ok(())
            },
        );

        let bot = Arc::new(Bot::new(Arc::new(RecordingApi::new())));
        (EventDriver::new(bot, router.into_dispatcher()), seen)
    }

    #[tokio::test]
    async fn test_connected_assigns_identity() {
        let (driver, _) = driver_with_seen();
        let info = ConnectInfo {
            user_id: "UBOT".into(),
            ..Default::default()
        };

        let outcome = driver.handle(InboundEvent::Connected(info)).await.unwrap();
        assert_eq!(outcome, EventOutcome::Control);
        assert_eq!(driver.bot().user_id(), Some("UBOT"));

        let conflicting = ConnectInfo {
            user_id: "UOTHER".into(),
            ..Default::default()
        };
        driver
            .handle(InboundEvent::Connected(conflicting))
            .await
            .unwrap();
        assert_eq!(driver.bot().user_id(), Some("UBOT"));
    }

    #[tokio::test]
    async fn test_message_is_classified_into_context() {
        let (driver, seen) = driver_with_seen();
        driver.bot().identity().assign("UBOT").unwrap();

        let outcome = driver
            .handle(message("U1", "C1", "<@UBOT> hello"))
            .await
            .unwrap();
        assert_eq!(outcome, EventOutcome::Dispatched { route: 0 });

        driver.handle(message("U1", "D1", "hello")).await.unwrap();
        assert_eq!(
            *seen.lock(),
            vec![Some(MessageType::DirectMention), Some(MessageType::DirectMessage)]
        );
    }

    #[tokio::test]
    async fn test_self_and_unmatched() {
        let (driver, seen) = driver_with_seen();
        driver.bot().identity().assign("UBOT").unwrap();

        assert_eq!(
            driver.handle(message("UBOT", "C1", "hello")).await.unwrap(),
            EventOutcome::Filtered(Admission::SelfEvent)
        );
        assert_eq!(
            driver.handle(message("U1", "C1", "good morning")).await.unwrap(),
            EventOutcome::Unmatched
        );
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_reaction_dispatches_to_reaction_route() {
        let (driver, _) = driver_with_seen();
        let reaction = ReactionEvent {
            direction: ReactionDirection::Removed,
            user: "U1".into(),
            item_user: "U2".into(),
            reaction: "eyes".into(),
            item: ReactionItem::default(),
            event_timestamp: "1.0".into(),
        };

        assert_eq!(
            driver
                .handle(InboundEvent::ReactionRemoved(reaction))
                .await
                .unwrap(),
            EventOutcome::Dispatched { route: 1 }
        );
    }

    #[tokio::test]
    async fn test_control_events_are_logged_only() {
        let (driver, _) = driver_with_seen();
        for event in [
            InboundEvent::InvalidAuth,
            InboundEvent::Error("boom".into()),
            InboundEvent::Unsupported("presence_change".into()),
        ] {
            assert_eq!(driver.handle(event).await.unwrap(), EventOutcome::Control);
        }
    }
}
