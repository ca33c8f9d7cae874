//! CLI argument validation functions
//!
//! Custom value parsers for arguments that clap cannot check on its own.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!(
            "Cannot read configuration file '{}': {}",
            path_str, e
        )),
    }
}

/// Parse `KEY=JSON` into a payload field
///
/// The value is parsed as JSON when possible, so `short=true` yields a
/// boolean and `color=good` falls back to the string `"good"`.
pub fn parse_field(field_str: &str) -> Result<(String, Value), String> {
    let Some((key, raw)) = field_str.split_once('=') else {
        return Err(format!("Field must look like KEY=JSON, got: '{}'", field_str));
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Field key cannot be empty: '{}'", field_str));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Validate a delivery strategy name
pub fn validate_strategy(strategy_str: &str) -> Result<String, String> {
    crate::config::validation::validate_strategy(strategy_str)
        .map(|_| strategy_str.trim().to_string())
        .map_err(|e| e.to_string())
}

/// Validate an emoji short code such as `:rocket:`
pub fn validate_icon_emoji(emoji_str: &str) -> Result<String, String> {
    let emoji = emoji_str.trim();
    let inner = emoji
        .strip_prefix(':')
        .and_then(|rest| rest.strip_suffix(':'))
        .unwrap_or_default();

    if inner.is_empty() || inner.contains(char::is_whitespace) {
        return Err(format!(
            "Icon emoji must look like :name:, got: '{}'",
            emoji_str
        ));
    }

    Ok(emoji.to_string())
}
