//! Configuration settings structures for hookcast
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
use crate::models::FormatFields;
use crate::services::notifications::DEFAULT_PLATFORM_DOMAIN;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "hookcast".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_platform_domain() -> String {
    DEFAULT_PLATFORM_DOMAIN.to_string()
}

fn default_strategy() -> String {
    "auto".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_binary_name() -> String {
    "curl".to_string()
}

fn default_search_path_var() -> String {
    "HOOKCAST_PATH".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/hookcast.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Webhook Configuration
// ============================================================================

/// Target webhook and the formatting applied to every message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookSettings {
    /// Incoming webhook URL, validated when a notifier is built
    #[serde(default)]
    pub url: String,

    /// Domain expected after `https://hooks.`
    #[serde(default = "default_platform_domain")]
    pub platform_domain: String,

    /// Fields merged into every payload (`username`, `icon_emoji`, ...)
    #[serde(default)]
    pub defaults: FormatFields,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            platform_domain: default_platform_domain(),
            defaults: FormatFields::new(),
        }
    }
}

// ============================================================================
// Delivery Configuration
// ============================================================================

/// How payloads reach the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySettings {
    /// `auto`, `native`, `binary`, `curl` or `command:<path>`
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Whether the in-process HTTP client may be selected by `auto`
    #[serde(default = "default_true")]
    pub native_enabled: bool,

    /// Skip TLS certificate verification for native delivery
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// External HTTP client used by binary delivery
    #[serde(default = "default_binary_name")]
    pub binary_name: String,

    /// Variable consulted before `PATH` when looking for the binary
    #[serde(default = "default_search_path_var")]
    pub search_path_var: String,

    /// Directories searched when no search-path variable is set;
    /// empty means the built-in list
    #[serde(default)]
    pub fallback_dirs: Vec<String>,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            native_enabled: default_true(),
            accept_invalid_certs: false,
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            binary_name: default_binary_name(),
            search_path_var: default_search_path_var(),
            fallback_dirs: Vec::new(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    /// Append to an existing file instead of truncating it
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// One of: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig {
            enabled: self.console.enabled,
            colored: self.console.colored,
        };
        let file = self.file.into_file_config()?;

        LoggerConfig::new(&self.level, console, file)
            .map_err(|e| ConfigError::validation("logger".to_string(), e.to_string()))
    }
}

impl FileSettings {
    /// `None` when file output is disabled; the format is checked either way
    pub fn into_file_config(self) -> Result<Option<FileConfig>, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format".to_string(), e.to_string()))?;

        if !self.enabled {
            return Ok(None);
        }

        FileConfig::new(PathBuf::from(self.path), self.append, format)
            .map(Some)
            .map_err(|e| ConfigError::validation("logger.file".to_string(), e.to_string()))
    }
}

// ============================================================================
// Root Settings
// ============================================================================

/// Complete hookcast configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub webhook: WebhookSettings,

    #[serde(default)]
    pub delivery: DeliverySettings,

    #[serde(default)]
    pub logger: LoggerSettings,
}
