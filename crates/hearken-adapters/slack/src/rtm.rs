//! The RTM transport loop.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::driver::{EventDriver, LoopExit, next_event};
use crate::error::TransportResult;
use crate::model::{RtmEvent, RtmFrame};
use crate::normalize::normalize_rtm;
use crate::source::EventSource;

/// Pulls RTM events one at a time and drives them through the router.
pub struct RtmLoop<S> {
    source: S,
    driver: EventDriver,
    shutdown: CancellationToken,
}

impl<S> RtmLoop<S>
where
    S: EventSource<RtmEvent>,
{
    pub fn new(source: S, driver: EventDriver) -> Self {
        Self {
            source,
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
        info!("Starting RTM event loop");
        loop {
            let event = match next_event(&mut self.source, &self.shutdown).await {
                Ok(event) => event,
                Err(exit) => {
                    info!(?exit, "RTM event loop stopped");
                    return Ok(exit);
                }
            };

            match &event {
                RtmEvent::Malformed(error) => warn!(error = %error, "Dropping malformed RTM frame"),
                RtmEvent::Frame(RtmFrame::Hello) => debug!("RTM says hello"),
                _ => {}
            }

            self.driver.handle(normalize_rtm(event)).await?;
        }
    }
}
