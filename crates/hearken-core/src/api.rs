//! The outbound half of the transport collaborator.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::message::OutgoingMessage;

/// Outbound Slack primitives the router relies on.
///
/// The wire client behind this trait (Web API over HTTP, or the RTM socket)
/// lives outside Hearken. Implementations are expected to handle
/// authentication and rate limiting themselves.
#[async_trait]
pub trait SlackApi: Send + Sync + 'static {
    /// Posts a message to a channel, optionally as a thread reply.
    ///
    /// Returns the timestamp of the posted message.
    async fn post(
        &self,
        channel: &str,
        thread_ts: Option<&str>,
        message: &OutgoingMessage,
    ) -> ApiResult<String>;

    /// Shows the "is typing" indicator in a channel.
    ///
    /// Transports without a typing indicator may treat this as a no-op.
    async fn send_typing(&self, channel: &str) -> ApiResult<()>;
}
