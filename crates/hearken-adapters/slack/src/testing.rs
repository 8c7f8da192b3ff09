//! In-memory collaborators for tests and demos.

use async_trait::async_trait;
use hearken_core::{ApiResult, OutgoingMessage, SlackApi};
use parking_lot::Mutex;

use crate::socket::EnvelopeAck;

/// One call made against a [`RecordingApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Post {
        channel: String,
        thread_ts: Option<String>,
        message: OutgoingMessage,
    },
    Typing {
        channel: String,
    },
    Ack {
        envelope_id: String,
    },
}

/// A [`SlackApi`] and [`EnvelopeAck`] that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, oldest first.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    /// Posted payloads as `(channel, message)` pairs.
    pub fn posts(&self) -> Vec<(String, OutgoingMessage)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ApiCall::Post {
                    channel, message, ..
                } => Some((channel.clone(), message.clone())),
                _ => None,
            })
            .collect()
    }

    /// Posted plain-text bodies, in order.
    pub fn posted_texts(&self) -> Vec<String> {
        self.posts()
            .into_iter()
            .filter_map(|(_, message)| match message {
                OutgoingMessage::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn acks(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ApiCall::Ack { envelope_id } => Some(envelope_id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: ApiCall) -> usize {
        let mut calls = self.calls.lock();
        calls.push(call);
        calls.len()
    }
}

#[async_trait]
impl SlackApi for RecordingApi {
    async fn post(
        &self,
        channel: &str,
        thread_ts: Option<&str>,
        message: &OutgoingMessage,
    ) -> ApiResult<String> {
        let seq = self.record(ApiCall::Post {
            channel: channel.to_string(),
            thread_ts: thread_ts.map(str::to_string),
            message: message.clone(),
        });
        Ok(format!("1700000000.{seq:06}"))
    }

    async fn send_typing(&self, channel: &str) -> ApiResult<()> {
        self.record(ApiCall::Typing {
            channel: channel.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl EnvelopeAck for RecordingApi {
    async fn ack(&self, envelope_id: &str) -> ApiResult<()> {
        self.record(ApiCall::Ack {
            envelope_id: envelope_id.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let api = RecordingApi::new();
        api.send_typing("C1").await.unwrap();
        let ts = api
            .post("C1", None, &OutgoingMessage::Text("hi".into()))
            .await
            .unwrap();
        api.ack("e1").await.unwrap();

        assert_eq!(ts, "1700000000.000002");
        assert_eq!(api.calls().len(), 3);
        assert_eq!(api.posted_texts(), vec!["hi".to_string()]);
        assert_eq!(api.acks(), vec!["e1".to_string()]);

        api.clear();
        assert!(api.calls().is_empty());
    }
}
