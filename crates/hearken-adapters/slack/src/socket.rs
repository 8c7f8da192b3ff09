//! The Socket Mode transport loop.

use std::sync::Arc;

use async_trait::async_trait;
use hearken_core::ApiResult;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::driver::{EventDriver, LoopExit, next_event};
use crate::error::TransportResult;
use crate::model::{SocketEnvelope, SocketModeEvent};
use crate::normalize::normalize_socket;
use crate::source::EventSource;

/// Acknowledges Socket Mode envelopes back to Slack.
///
/// Slack redelivers any Events API envelope that is not acknowledged within
/// a few seconds.
#[async_trait]
pub trait EnvelopeAck: Send + Sync + 'static {
    async fn ack(&self, envelope_id: &str) -> ApiResult<()>;
}

/// Pulls Socket Mode events one at a time and drives them through the router.
///
/// Events API envelopes are acknowledged before their inner event is
/// normalized and dispatched.
pub struct SocketModeLoop<S> {
    source: S,
    ack: Arc<dyn EnvelopeAck>,
    driver: EventDriver,
    shutdown: CancellationToken,
}

impl<S> SocketModeLoop<S>
where
    S: EventSource<SocketModeEvent>,
{
    pub fn new(source: S, ack: Arc<dyn EnvelopeAck>, driver: EventDriver) -> Self {
        Self {
            source,
            ack,
            driver,
            shutdown: CancellationToken::new(),
        }
    }

    /// Uses an externally owned shutdown token.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Runs until the source closes, shutdown is requested, or a handler fails.
    pub async fn run(mut self) -> TransportResult<LoopExit> {
        info!("Starting Socket Mode event loop");
        loop {
            let event = match next_event(&mut self.source, &self.shutdown).await {
                Ok(event) => event,
                Err(exit) => {
                    info!(?exit, "Socket Mode event loop stopped");
                    return Ok(exit);
                }
            };

            observe(self.ack.as_ref(), &event).await;
            self.driver.handle(normalize_socket(event)).await?;
        }
    }
}

/// Transport-level bookkeeping that happens before normalization.
async fn observe(ack: &dyn EnvelopeAck, event: &SocketModeEvent) {
    match event {
        SocketModeEvent::Connecting => info!("Connecting to Slack with Socket Mode"),
        SocketModeEvent::Malformed(error) => {
            warn!(error = %error, "Dropping malformed Socket Mode envelope")
        }
        SocketModeEvent::Envelope(SocketEnvelope::Hello) => debug!("Slack says hello"),
        SocketModeEvent::Envelope(SocketEnvelope::Disconnect { reason }) => {
            info!(reason = %reason, "Slack requested a disconnect")
        }
        SocketModeEvent::Envelope(SocketEnvelope::EventsApi(envelope)) => {
            trace!(envelope_id = %envelope.envelope_id, "Acknowledging envelope");
            if let Err(e) = ack.ack(&envelope.envelope_id).await {
                warn!(
                    envelope_id = %envelope.envelope_id,
                    error = %e,
                    "Failed to acknowledge envelope"
                );
            }
        }
        _ => {}
    }
}
