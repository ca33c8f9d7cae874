//! Webhook notifier.
//!
//! Validates the webhook URL once, merges per-call formatting with the
//! notifier's defaults and hands the serialized payload to the delivery
//! strategy chosen by a [`DeliveryResolver`].

use super::delivery::DeliveryOutcome;
use super::resolver::DeliveryResolver;
use crate::error::{AppError, AppResult};
use crate::models::{FormatFields, Payload};
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Domain of the default messaging platform
pub const DEFAULT_PLATFORM_DOMAIN: &str = "slack.com";

/// Posts messages to one incoming webhook
///
/// # Example
/// ```ignore
/// let notifier = Notifier::builder("https://hooks.slack.com/services/T000/B000/XXXX")
///     .default_field("username", "deploy-bot")
///     .build()?;
/// notifier.send("Deploy finished", &FormatFields::new()).await?;
/// ```
pub struct Notifier {
    endpoint: String,
    defaults: FormatFields,
    resolver: Arc<DeliveryResolver>,
}

impl Notifier {
    /// Creates a notifier for `endpoint` using the process-wide resolver
    ///
    /// # Errors
    /// `Configuration` if the endpoint is empty or not an incoming webhook URL.
    pub fn new(endpoint: &str, defaults: FormatFields) -> AppResult<Self> {
        Self::builder(endpoint).defaults(defaults).build()
    }

    pub fn builder(endpoint: impl Into<String>) -> NotifierBuilder {
        NotifierBuilder::new(endpoint)
    }

    /// Trims and validates a webhook URL for the given platform domain
    pub fn validate_endpoint(endpoint: &str, platform_domain: &str) -> AppResult<String> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(AppError::configuration(endpoint, "Empty webhook"));
        }

        let pattern = format!(
            r"^https://hooks\.{}/services/(?:\w|/)+$",
            regex::escape(platform_domain.trim())
        );
        let re = Regex::new(&pattern)
            .map_err(|e| AppError::configuration(platform_domain, e.to_string()))?;

        if !re.is_match(endpoint) {
            return Err(AppError::configuration(endpoint, "Invalid webhook"));
        }

        Ok(endpoint.to_string())
    }

    /// Builds the payload for `message`
    ///
    /// Precedence for a shared key: per-call `format`, then the message as
    /// `text`, then the notifier defaults. `text` always leads the payload.
    pub fn build_payload(&self, message: &str, format: &FormatFields) -> FormatFields {
        let text = format
            .get("text")
            .cloned()
            .unwrap_or_else(|| Value::String(message.to_string()));

        let mut payload = FormatFields::new();
        payload.insert("text".to_string(), text);
        merge_first_wins(payload, &[format, &self.defaults])
    }

    /// Sends `message` with per-call `format` fields
    pub async fn send(&self, message: &str, format: &FormatFields) -> AppResult<DeliveryOutcome> {
        let payload = self.build_payload(message, format);
        let json = serde_json::to_string(&payload)?;
        self.post(&json).await
    }

    /// Sends a typed payload; its fields act as the per-call format
    ///
    /// # Errors
    /// `Validation` when the payload has no text or only whitespace.
    pub async fn send_payload(&self, mut payload: Payload) -> AppResult<DeliveryOutcome> {
        let message = match payload.text.take() {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                return Err(AppError::Validation {
                    field: "text".to_string(),
                    reason: "payload text is empty".to_string(),
                });
            }
        };
        self.send(&message, &payload.into_fields()).await
    }

    /// Posts an already serialized payload through the resolved delivery
    pub async fn post(&self, json: &str) -> AppResult<DeliveryOutcome> {
        let delivery = self.resolver.resolve().await?;
        debug!(
            strategy = delivery.name(),
            bytes = json.len(),
            "Posting webhook payload"
        );
        delivery.post(json, &self.endpoint).await
    }
}

/// Adds every key of `layers` not yet in `merged`; earlier layers win
fn merge_first_wins(mut merged: FormatFields, layers: &[&FormatFields]) -> FormatFields {
    for layer in layers {
        for (key, value) in layer.iter() {
            if !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

/// Builder for [`Notifier`]
pub struct NotifierBuilder {
    endpoint: String,
    defaults: FormatFields,
    platform_domain: String,
    resolver: Option<Arc<DeliveryResolver>>,
}

impl NotifierBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            defaults: FormatFields::new(),
            platform_domain: DEFAULT_PLATFORM_DOMAIN.to_string(),
            resolver: None,
        }
    }

    pub fn defaults(mut self, defaults: FormatFields) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn default_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    pub fn platform_domain(mut self, domain: impl Into<String>) -> Self {
        self.platform_domain = domain.into();
        self
    }

    pub fn resolver(mut self, resolver: Arc<DeliveryResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn build(self) -> AppResult<Notifier> {
        let endpoint = Notifier::validate_endpoint(&self.endpoint, &self.platform_domain)?;
        Ok(Notifier {
            endpoint,
            defaults: self.defaults,
            resolver: self.resolver.unwrap_or_else(DeliveryResolver::global),
        })
    }
}
