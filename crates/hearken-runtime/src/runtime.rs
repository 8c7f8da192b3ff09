//! Runtime orchestration.
//!
//! The runtime owns the loaded configuration and the route registry. Once
//! routes are registered, [`HearkenRuntime::run`] freezes them into a
//! dispatcher, builds the [`Bot`] from config, and drives the chosen
//! transport loop until the source closes, a signal arrives, or a handler
//! fails.
//!
//! ```rust,ignore
//! use hearken_runtime::{Connection, HearkenRuntime};
//!
//! let mut runtime = HearkenRuntime::builder()
//!     .config_file("hearken.toml")
//!     .build()?;
//!
//! runtime.hear("(?i)how are you(.*)")?.message_handler(how_are_you);
//! runtime.on_reaction().reaction_handler(reaction_logger);
//!
//! runtime.run(api, Connection::rtm(rtm_events)).await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use hearken_adapter_slack::{
    EnvelopeAck, EventDriver, EventSource, LoopExit, RtmEvent, RtmLoop, SocketModeEvent,
    SocketModeLoop,
};
use figment::Provider;
use hearken_core::SlackApi;
use hearken_framework::{Bot, MessageRouteBuilder, ReactionRouteBuilder, RouteError, Router};
use regex::Regex;
use serde::Serialize;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigLoader, ConfigResult, EventMode, HearkenConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// The event stream a runtime is driven by.
///
/// The wire client that produces these events (websocket, reconnection,
/// authentication) lives behind the [`EventSource`].
pub enum Connection {
    Rtm(Box<dyn EventSource<RtmEvent>>),
    SocketMode {
        source: Box<dyn EventSource<SocketModeEvent>>,
        ack: Arc<dyn EnvelopeAck>,
    },
}

impl Connection {
    pub fn rtm(source: impl EventSource<RtmEvent> + 'static) -> Self {
        Self::Rtm(Box::new(source))
    }

    pub fn socket_mode(
        source: impl EventSource<SocketModeEvent> + 'static,
        ack: Arc<dyn EnvelopeAck>,
    ) -> Self {
        Self::SocketMode {
            source: Box::new(source),
            ack,
        }
    }

    pub fn event_mode(&self) -> EventMode {
        match self {
            Self::Rtm(_) => EventMode::Rtm,
            Self::SocketMode { .. } => EventMode::SocketMode,
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Connection").field(&self.event_mode()).finish()
    }
}

/// A configured Hearken bot waiting for its routes and a connection.
pub struct HearkenRuntime {
    config: HearkenConfig,
    router: Router,
    shutdown: CancellationToken,
    handle_signals: bool,
}

impl HearkenRuntime {
    /// Loads configuration from the default locations and initializes
    /// logging from it.
    ///
    /// Falls back to defaults when the configuration cannot be loaded.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                // The subscriber is not installed yet.
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                HearkenConfig::default()
            });

        Self::from_config(&config)
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// Installs the global subscriber described by `config.logging` unless
    /// one is already installed. `bot.debug` also enables the per-event
    /// debug lines.
    pub fn from_config(config: &HearkenConfig) -> Self {
        logging::init_from_config(&config.logging, config.bot.debug);

        info!(
            event_mode = %config.bot.event_mode,
            debug = config.bot.debug,
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            router: Router::new(),
            shutdown: CancellationToken::new(),
            handle_signals: true,
        }
    }

    pub fn config(&self) -> &HearkenConfig {
        &self.config
    }

    /// Registers a message route for `pattern`; see [`Router::hear`].
    pub fn hear(&mut self, pattern: &str) -> Result<MessageRouteBuilder<'_>, RouteError> {
        self.router.hear(pattern)
    }

    pub fn hear_regex(&mut self, pattern: Regex) -> MessageRouteBuilder<'_> {
        self.router.hear_regex(pattern)
    }

    pub fn on_reaction(&mut self) -> ReactionRouteBuilder<'_> {
        self.router.on_reaction()
    }

    pub fn route_count(&self) -> usize {
        self.router.len()
    }

    /// Token that stops the transport loop between events when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Disables the Ctrl+C / SIGTERM watcher started by [`run`](Self::run).
    pub fn without_signal_handler(mut self) -> Self {
        self.handle_signals = false;
        self
    }

    /// Builds the bot and drives `connection` to completion.
    ///
    /// Returns how the loop ended normally, or the handler failure that
    /// terminated it.
    pub async fn run(self, api: Arc<dyn SlackApi>, connection: Connection) -> RuntimeResult<LoopExit> {
        let Self {
            config,
            router,
            shutdown,
            handle_signals,
        } = self;

        if connection.event_mode() != config.bot.event_mode {
            warn!(
                configured = %config.bot.event_mode,
                connection = %connection.event_mode(),
                "Connection does not match configured event mode, using the connection"
            );
        }

        let bot = Arc::new(
            Bot::new(api)
                .with_typing(config.typing.to_simulator())
                .with_debug(config.bot.debug),
        );
        debug!(routes = router.len(), "Freezing route table");
        let driver = EventDriver::new(bot, router.into_dispatcher());

        let signals = handle_signals.then(|| tokio::spawn(watch_signals(shutdown.clone())));

        info!(event_mode = %connection.event_mode(), "Hearken runtime is now running");
        let result = match connection {
            Connection::Rtm(source) => {
                RtmLoop::new(source, driver)
                    .with_shutdown(shutdown)
                    .run()
                    .await
            }
            Connection::SocketMode { source, ack } => {
                SocketModeLoop::new(source, ack, driver)
                    .with_shutdown(shutdown)
                    .run()
                    .await
            }
        };

        if let Some(task) = signals {
            task.abort();
        }

        match &result {
            Ok(exit) => info!(?exit, "Hearken runtime stopped"),
            Err(e) => error!(error = %e, "Hearken runtime stopped by a handler failure"),
        }
        result.map_err(RuntimeError::from)
    }
}

impl Default for HearkenRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancels `shutdown` on Ctrl+C or SIGTERM.
async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
    shutdown.cancel();
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for a [`HearkenRuntime`] with custom configuration sources.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges a provider above every other source; see [`ConfigLoader::merge`].
    pub fn merge(mut self, provider: impl Provider) -> Self {
        self.config_loader = self.config_loader.merge(provider);
        self
    }

    /// Overrides a single dotted key; see [`ConfigLoader::set`].
    pub fn set<T: Serialize>(mut self, key: &str, value: T) -> Self {
        self.config_loader = self.config_loader.set(key, value);
        self
    }

    pub fn build(self) -> ConfigResult<HearkenRuntime> {
        let config = self.config_loader.load()?;
        Ok(HearkenRuntime::from_config(&config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
