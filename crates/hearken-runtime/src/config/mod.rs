//! Configuration for Hearken bots.
//!
//! Sources are layered with figment: built-in defaults, then TOML files,
//! then `HEARKEN_*` environment variables, then programmatic overrides.
//!
//! ```toml
//! [bot]
//! debug = false
//! event_mode = "socket_mode"
//!
//! [typing]
//! max_delay_ms = 2000
//! chars_per_minute = 3000
//!
//! [logging]
//! level = "info"
//! format = "compact"
//!
//! [logging.filters]
//! hearken_framework = "debug"
//! ```

mod error;
mod loader;
mod schema;
mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BotSettings, EventMode, HearkenConfig, LogFormat, LogLevel, LogOutput, LoggingConfig,
    SpanEventConfig, TypingSettings,
};
pub use validation::validate_config;
