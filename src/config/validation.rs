//! Configuration validation logic
//!
//! Checks that settings are usable before anything is sent. The webhook URL
//! itself is validated by `Notifier` when it is built, since an empty URL is
//! legal for commands such as `example`.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DeliverySettings, FileSettings, LoggerSettings, Settings, WebhookSettings,
};
use crate::services::notifications::COMMAND_STRATEGY_PREFIX;

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Strategy names accepted besides `command:<path>`
const VALID_STRATEGIES: &[&str] = &["auto", "native", "binary", "curl"];

impl WebhookSettings {
    /// Validate webhook settings
    ///
    /// # Validation Rules
    /// - Platform domain must not be empty or contain `/`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let domain = self.platform_domain.trim();
        if domain.is_empty() || domain.contains('/') {
            return Err(ConfigError::ValidationError {
                field: "webhook.platform_domain".to_string(),
                message: format!("Invalid platform domain '{}'", self.platform_domain),
            });
        }

        Ok(())
    }
}

impl DeliverySettings {
    /// Validate delivery settings
    ///
    /// # Validation Rules
    /// - Strategy must be auto, native, binary, curl or command:<path>
    /// - Timeouts must be greater than 0
    /// - Binary name and search-path variable must not be empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_strategy(&self.strategy)?;

        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "delivery.timeout_seconds",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "delivery.connect_timeout_seconds",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        if self.binary_name.trim().is_empty() {
            return Err(ConfigError::validation(
                "delivery.binary_name",
                "Binary name cannot be empty.",
            ));
        }

        if self.search_path_var.trim().is_empty() {
            return Err(ConfigError::validation(
                "delivery.search_path_var",
                "Search path variable name cannot be empty.",
            ));
        }

        Ok(())
    }
}

/// Checks the shape of a delivery strategy name without touching the system
pub fn validate_strategy(strategy: &str) -> Result<(), ConfigError> {
    let strategy = strategy.trim();
    if VALID_STRATEGIES.contains(&strategy) {
        return Ok(());
    }

    match strategy.strip_prefix(COMMAND_STRATEGY_PREFIX) {
        Some(command) if !command.trim().is_empty() => Ok(()),
        _ => Err(ConfigError::ValidationError {
            field: "delivery.strategy".to_string(),
            message: format!(
                "Invalid delivery strategy '{}'. Valid strategies are: {}, {}<path>",
                strategy,
                VALID_STRATEGIES.join(", "),
                COMMAND_STRATEGY_PREFIX
            ),
        }),
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()?;

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.webhook.validate()?;
        self.delivery.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
