use crate::config::error::ConfigError;
use thiserror::Error;

/// Error type shared by the notifier, the delivery strategies and the CLI.
///
/// Every variant is returned to the immediate caller of `send`/`post`;
/// nothing in the crate retries or swallows these.
#[derive(Error, Debug)]
pub enum AppError {
    /// Webhook URL was empty or did not look like an incoming webhook
    #[error("Configuration error: {reason}: '{value}'")]
    Configuration { value: String, reason: String },

    /// A named delivery override could not be turned into something invokable
    #[error("Invalid delivery callback '{name}': {reason}")]
    InvalidCallback { name: String, reason: String },

    /// Neither native HTTP nor an external binary is available
    #[error(
        "No delivery mechanism available for posting to the webhook. Set one with \
         DeliveryResolver::set_override(); it receives the JSON payload and the \
         webhook URL to post to"
    )]
    NoDeliveryMechanism,

    /// Native HTTP request failed before a response was received
    #[error("Transport error while posting to {endpoint}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// External binary could not be executed
    #[error("Failed to run '{binary}'")]
    Subprocess {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// Payload could not be encoded or decoded as JSON
    #[error("Payload serialization failed")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn configuration(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_callback(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCallback {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Serialization { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::ValidationError { field, message } => AppError::Validation {
                field,
                reason: message,
            },
            other => AppError::Validation {
                field: "config".to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_carries_value() {
        let err = AppError::configuration("http://example.com", "Invalid webhook");
        assert!(err.to_string().contains("http://example.com"));
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[test]
    fn test_no_delivery_mechanism_mentions_override() {
        let err = AppError::NoDeliveryMechanism;
        assert!(err.to_string().contains("set_override"));
    }

    #[test]
    fn test_config_validation_error_conversion() {
        let err: AppError = ConfigError::validation("delivery.timeout_seconds", "must be > 0").into();
        match err {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "delivery.timeout_seconds");
                assert_eq!(reason, "must be > 0");
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }
}
