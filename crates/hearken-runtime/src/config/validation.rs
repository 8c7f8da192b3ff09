//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{HearkenConfig, LogOutput, LoggingConfig, TypingSettings};

/// Validates the entire configuration.
pub fn validate_config(config: &HearkenConfig) -> ConfigResult<()> {
    validate_typing(&config.typing)?;
    validate_logging(&config.logging)?;
    Ok(())
}

fn validate_typing(typing: &TypingSettings) -> ConfigResult<()> {
    if typing.chars_per_minute == 0 {
        return Err(ConfigError::validation(
            "typing.chars_per_minute must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.output = \"file\" requires logging.file_path",
        ));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid logging filter module name: {module:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&HearkenConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_typing_rate_is_rejected() {
        let mut config = HearkenConfig::default();
        config.typing.chars_per_minute = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));

        config.typing.chars_per_minute = 1;
        config.typing.max_delay_ms = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = HearkenConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("logs/hearken.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_blank_filter_module_is_rejected() {
        let mut config = HearkenConfig::default();
        config.logging.filters.insert(" ".into(), LogLevel::Debug);
        assert!(validate_config(&config).is_err());
    }
}
