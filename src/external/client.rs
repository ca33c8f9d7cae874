use std::time::Duration;

use tracing::warn;

use crate::config::DeliverySettings;
use crate::error::{AppError, AppResult};

/// Builds the HTTP client used for native webhook delivery
///
/// # Features
/// - **Timeouts**: request and connect timeouts from `delivery` settings
/// - **Connection pooling**: idle connections are kept for repeated posts
/// - **Compression**: gzip responses are decoded transparently
/// - **Security**: certificate verification stays on unless
///   `accept_invalid_certs` is set, which is logged as a warning
///
/// # Example
/// ```ignore
/// let client = build_http_client(&DeliverySettings::default())?;
/// let response = client
///     .post("https://hooks.slack.com/services/T000/B000/XXXX")
///     .body(r#"payload={"text":"hi"}"#)
///     .send()
///     .await?;
/// ```
pub fn build_http_client(settings: &DeliverySettings) -> AppResult<reqwest::Client> {
    if settings.accept_invalid_certs {
        warn!("TLS certificate verification is disabled for webhook delivery");
    }

    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
        // Connection pooling
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        // Security
        .danger_accept_invalid_certs(settings.accept_invalid_certs)
        .user_agent(format!("hookcast/{}", crate::pkg_version()))
        .build()
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::new(e).context("Failed to build HTTP client"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_defaults() {
        assert!(build_http_client(&DeliverySettings::default()).is_ok());
    }

    #[test]
    fn test_client_builds_with_verification_disabled() {
        let settings = DeliverySettings {
            accept_invalid_certs: true,
            ..Default::default()
        };
        assert!(build_http_client(&settings).is_ok());
    }
}
