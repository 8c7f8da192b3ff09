//! Shared fixtures for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use hearken_core::{ApiResult, MessageEvent, OutgoingMessage, ReactionEvent, SlackApi};
use parking_lot::Mutex;

use crate::bot::Bot;
use crate::context::Context;
use crate::handler::HandlerResult;

/// A call recorded by [`MockApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Typing(String),
    Post {
        channel: String,
        thread_ts: Option<String>,
        message: OutgoingMessage,
    },
}

#[derive(Debug, Default)]
pub struct MockApi {
    sent: Mutex<Vec<Sent>>,
}

impl MockApi {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl SlackApi for MockApi {
    async fn post(
        &self,
        channel: &str,
        thread_ts: Option<&str>,
        message: &OutgoingMessage,
    ) -> ApiResult<String> {
        let mut sent = self.sent.lock();
        sent.push(Sent::Post {
            channel: channel.to_string(),
            thread_ts: thread_ts.map(str::to_string),
            message: message.clone(),
        });
        Ok(format!("1700000000.{:06}", sent.len()))
    }

    async fn send_typing(&self, channel: &str) -> ApiResult<()> {
        self.sent.lock().push(Sent::Typing(channel.to_string()));
        Ok(())
    }
}

pub fn mock_bot() -> (Arc<Bot>, Arc<MockApi>) {
    let api = Arc::new(MockApi::default());
    (Arc::new(Bot::new(api.clone())), api)
}

pub fn sample_message(text: &str) -> MessageEvent {
    MessageEvent {
        channel: "C1".into(),
        user: "U1".into(),
        text: text.into(),
        timestamp: "1700000000.000100".into(),
        ..Default::default()
    }
}

pub async fn noop_message_handler(
    _ctx: Context,
    _bot: Arc<Bot>,
    _message: Arc<MessageEvent>,
) -> HandlerResult {
    Ok(())
}

pub async fn noop_reaction_handler(
    _ctx: Context,
    _bot: Arc<Bot>,
    _reaction: Arc<ReactionEvent>,
) -> HandlerResult {
    Ok(())
}
