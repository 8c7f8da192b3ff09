//! # Hearken Runtime
//!
//! Wires a Hearken bot together from configuration:
//!
//! - Layered configuration (`hearken.toml`, `HEARKEN_*` environment variables)
//! - Logging setup driven by the `[logging]` section
//! - [`HearkenRuntime`], which owns the route registry and runs one
//!   transport loop with Ctrl+C / SIGTERM handling
//!
//! ```rust,ignore
//! use hearken_runtime::{Connection, HearkenRuntime};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = HearkenRuntime::new();
//!     runtime.hear("(?i)how are you(.*)")?.message_handler(how_are_you);
//!
//!     runtime.run(api, Connection::socket_mode(events, acker)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{
    BotSettings, ConfigError, ConfigLoader, ConfigResult, EventMode, HearkenConfig,
    LoggingConfig, TypingSettings, load_config,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{Connection, HearkenRuntime, RuntimeBuilder};

// Re-export tracing for use by bot crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for bot code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
