//! The bot handle given to handlers.

use std::sync::Arc;
use std::time::Duration;

use hearken_core::{ApiResult, Attachment, BotIdentity, MessageEvent, OutgoingMessage, SlackApi};

use crate::typing::TypingSimulator;

/// Whether a reply should be preceded by a typing simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Typing {
    With,
    #[default]
    Without,
}

/// An active bot: its identity, its outbound API and its reply settings.
///
/// One `Bot` is shared (behind an `Arc`) by the transport loop and every
/// handler invocation.
pub struct Bot {
    api: Arc<dyn SlackApi>,
    identity: BotIdentity,
    typing: TypingSimulator,
    debug: bool,
}

impl Bot {
    pub fn new(api: Arc<dyn SlackApi>) -> Self {
        Self {
            api,
            identity: BotIdentity::new(),
            typing: TypingSimulator::default(),
            debug: false,
        }
    }

    pub fn with_typing(mut self, typing: TypingSimulator) -> Self {
        self.typing = typing;
        self
    }

    /// Enables verbose tracing of received events.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Starts with an already known identity.
    pub fn with_identity(mut self, identity: BotIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn api(&self) -> &Arc<dyn SlackApi> {
        &self.api
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    /// The bot's own user ID, once the connection has reported it.
    pub fn user_id(&self) -> Option<&str> {
        self.identity.get()
    }

    pub fn typing(&self) -> &TypingSimulator {
        &self.typing
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Replies to a message in its channel with plain text.
    pub async fn reply(
        &self,
        message: &MessageEvent,
        text: impl Into<String>,
        typing: Typing,
    ) -> ApiResult<String> {
        self.send(&message.channel, None, OutgoingMessage::Text(text.into()), typing)
            .await
    }

    /// Replies in the message's thread, starting one if needed.
    pub async fn reply_in_thread(
        &self,
        message: &MessageEvent,
        text: impl Into<String>,
        typing: Typing,
    ) -> ApiResult<String> {
        let thread = message.thread_root().unwrap_or(&message.timestamp);
        self.send(
            &message.channel,
            Some(thread),
            OutgoingMessage::Text(text.into()),
            typing,
        )
        .await
    }

    /// Replies to a message with a set of attachments.
    pub async fn reply_with_attachments(
        &self,
        message: &MessageEvent,
        attachments: Vec<Attachment>,
        typing: Typing,
    ) -> ApiResult<String> {
        self.send(
            &message.channel,
            None,
            OutgoingMessage::Attachments(attachments),
            typing,
        )
        .await
    }

    /// Shows the typing indicator and waits as long as typing `payload` would take.
    pub async fn type_message(
        &self,
        channel: &str,
        payload: &OutgoingMessage,
    ) -> ApiResult<Duration> {
        self.typing.simulate(self.api.as_ref(), channel, payload).await
    }

    async fn send(
        &self,
        channel: &str,
        thread_ts: Option<&str>,
        payload: OutgoingMessage,
        typing: Typing,
    ) -> ApiResult<String> {
        if typing == Typing::With {
            self.type_message(channel, &payload).await?;
        }
        self.api.post(channel, thread_ts, &payload).await
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("user_id", &self.user_id())
            .field("typing", &self.typing)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    use crate::test_support::{MockApi, Sent, sample_message};

    fn bot() -> (Bot, Arc<MockApi>) {
        let api = Arc::new(MockApi::default());
        (Bot::new(api.clone()), api)
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_without_typing_sends_immediately() {
        let (bot, api) = bot();
        let start = Instant::now();

        bot.reply(&sample_message("hi"), "hello", Typing::Without)
            .await
            .unwrap();

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(
            api.sent(),
            vec![Sent::Post {
                channel: "C1".into(),
                thread_ts: None,
                message: OutgoingMessage::Text("hello".into()),
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_with_typing_waits_before_sending() {
        let (bot, api) = bot();
        let start = Instant::now();

        bot.reply(&sample_message("hi"), "x".repeat(3000), Typing::With)
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(2000));
        let sent = api.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], Sent::Typing("C1".into()));
        assert!(matches!(&sent[1], Sent::Post { channel, .. } if channel == "C1"));
    }

    #[tokio::test]
    async fn test_reply_in_thread_uses_thread_root() {
        let (bot, api) = bot();
        let mut message = sample_message("hi");
        bot.reply_in_thread(&message, "top", Typing::Without)
            .await
            .unwrap();

        message.thread_timestamp = Some("1699999999.000001".into());
        bot.reply_in_thread(&message, "nested", Typing::Without)
            .await
            .unwrap();

        let threads: Vec<_> = api
            .sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Post { thread_ts, .. } => thread_ts,
                Sent::Typing(_) => None,
            })
            .collect();
        assert_eq!(threads, vec![message.timestamp.clone(), "1699999999.000001".to_string()]);
    }

    #[tokio::test]
    async fn test_reply_with_attachments() {
        let (bot, api) = bot();
        let attachments = vec![Attachment::text("Host, deploy and share your bot in seconds.")];

        bot.reply_with_attachments(&sample_message("hi"), attachments.clone(), Typing::Without)
            .await
            .unwrap();

        assert_eq!(
            api.sent(),
            vec![Sent::Post {
                channel: "C1".into(),
                thread_ts: None,
                message: OutgoingMessage::Attachments(attachments),
            }]
        );
    }

    #[test]
    fn test_user_id_follows_identity() {
        let (bot, _api) = bot();
        assert_eq!(bot.user_id(), None);
        bot.identity().assign("UBOT").unwrap();
        assert_eq!(bot.user_id(), Some("UBOT"));
    }
}
