//! What [`init_logger`](super::init_logger) installs, built from `LoggerSettings`

use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;

use crate::logger::error::LoggerError;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: Level,
    pub console: ConsoleConfig,
    /// `None` keeps logs off disk
    pub file: Option<FileConfig>,
}

impl LoggerConfig {
    /// # Errors
    /// `LoggerError::Config` for an unknown level or when no output is left.
    pub fn new(
        level: &str,
        console: ConsoleConfig,
        file: Option<FileConfig>,
    ) -> Result<Self, LoggerError> {
        let level = Level::from_str(level.trim()).map_err(|_| {
            LoggerError::config(format!(
                "unknown log level '{level}', expected trace, debug, info, warn or error"
            ))
        })?;

        if !console.enabled && file.is_none() {
            return Err(LoggerError::config(
                "console and file output are both disabled",
            ));
        }

        Ok(Self {
            level,
            console,
            file,
        })
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            console: ConsoleConfig::default(),
            file: None,
        }
    }
}

/// Console output, always on stderr so stdout stays free for payloads
#[derive(Debug, Clone, Copy)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub colored: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileConfig {
    pub path: PathBuf,
    pub append: bool,
    pub format: LogFormat,
}

impl FileConfig {
    /// Parent directories are created later, when the writer opens the file
    pub fn new(path: PathBuf, append: bool, format: LogFormat) -> Result<Self, LoggerError> {
        if path.as_os_str().is_empty() {
            return Err(LoggerError::config("log file path is empty"));
        }
        Ok(Self {
            path,
            append,
            format,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::config(format!(
                "unknown log format '{s}', expected full, compact or json"
            ))),
        }
    }
}
