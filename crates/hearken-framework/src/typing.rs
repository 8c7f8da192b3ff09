//! Typing simulation.
//!
//! Before a reply is sent the bot can show the "is typing" indicator and wait
//! for a time proportional to the reply's size, so replies do not appear
//! instantly. The delay is capped, and it is awaited in the caller's task:
//! inside a handler this holds up the transport loop until it elapses.

use std::time::Duration;

use hearken_core::{ApiResult, OutgoingMessage, SlackApi};
use tracing::trace;

/// Default typing speed, in characters per minute.
pub const DEFAULT_CHARS_PER_MINUTE: u32 = 3000;

/// Default upper bound on a single typing delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(2000);

const NANOS_PER_MINUTE: u128 = 60 * 1_000_000_000;

/// Computes and applies size-proportional typing delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingSimulator {
    chars_per_minute: u32,
    max_delay: Duration,
}

impl Default for TypingSimulator {
    fn default() -> Self {
        Self {
            chars_per_minute: DEFAULT_CHARS_PER_MINUTE,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl TypingSimulator {
    /// Creates a simulator. A zero rate is raised to one character per minute.
    pub fn new(chars_per_minute: u32, max_delay: Duration) -> Self {
        Self {
            chars_per_minute: chars_per_minute.max(1),
            max_delay,
        }
    }

    pub fn chars_per_minute(&self) -> u32 {
        self.chars_per_minute
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// The size a payload counts as.
    ///
    /// Text counts its byte length and attachments their JSON length. Block
    /// payloads are not sized and count as zero.
    pub fn payload_len(payload: &OutgoingMessage) -> usize {
        match payload {
            OutgoingMessage::Text(text) => text.len(),
            OutgoingMessage::Attachments(attachments) => serde_json_len(attachments),
            OutgoingMessage::Blocks(_) => 0,
        }
    }

    /// Delay for a payload of `len` characters, clamped to the maximum.
    pub fn delay_for_len(&self, len: usize) -> Duration {
        let nanos = NANOS_PER_MINUTE * len as u128 / u128::from(self.chars_per_minute);
        if nanos >= self.max_delay.as_nanos() {
            self.max_delay
        } else {
            // Below max_delay, so it fits in u64.
            Duration::from_nanos(nanos as u64)
        }
    }

    pub fn delay_for(&self, payload: &OutgoingMessage) -> Duration {
        self.delay_for_len(Self::payload_len(payload))
    }

    /// Sends the typing indicator to `channel`, then sleeps for the payload's
    /// delay. Returns the delay that was applied.
    pub async fn simulate(
        &self,
        api: &dyn SlackApi,
        channel: &str,
        payload: &OutgoingMessage,
    ) -> ApiResult<Duration> {
        let delay = self.delay_for(payload);
        api.send_typing(channel).await?;
        trace!(channel, delay_ms = delay.as_millis() as u64, "simulating typing");
        tokio::time::sleep(delay).await;
        Ok(delay)
    }
}

fn serde_json_len<T: serde::Serialize>(value: &T) -> usize {
    serde_json::to_string(value).map_or(0, |json| json.len())
}
