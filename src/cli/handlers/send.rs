//! Send command handler

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::build_notifier;
use crate::cli::parser::SendArgs;
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::models::{Attachment, FormatFields, Payload};
use crate::services::notifications::DeliveryOutcome;
use crate::services::{DeliveryResolver, Notifier};

/// Handler for the send command
pub struct SendCommandHandler {
    config: Settings,
}

impl SendCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Send the message, or print its payload when `dry_run` is set
    pub async fn execute(&self, args: &SendArgs) -> AppResult<()> {
        let format = Self::build_format(args).await?;

        if args.dry_run {
            let notifier = build_notifier(&self.config, DeliveryResolver::global())?;
            println!("{}", Self::render_payload(&notifier, &args.message, &format)?);
            return Ok(());
        }

        let resolver = Arc::new(DeliveryResolver::from_settings(self.config.delivery.clone()).await?);
        let notifier = build_notifier(&self.config, resolver)?;
        let outcome = notifier.send(&args.message, &format).await?;

        println!("{}", Self::describe_outcome(&outcome));
        Ok(())
    }

    /// Per-call formatting fields collected from the command line
    ///
    /// Typed flags go in first; `--field` entries are applied afterwards in
    /// order, so they replace typed values with the same key.
    pub async fn build_format(args: &SendArgs) -> AppResult<FormatFields> {
        let mut payload = Payload::new();
        if let Some(ref username) = args.username {
            payload = payload.username(username);
        }
        if let Some(ref emoji) = args.icon_emoji {
            payload = payload.icon_emoji(emoji);
        }
        if let Some(ref url) = args.icon_url {
            payload = payload.icon_url(url);
        }
        if let Some(ref channel) = args.channel {
            payload = payload.channel(channel);
        }
        if let Some(ref path) = args.attachments {
            payload.attachments = Self::read_attachments(path).await?;
        }

        let mut format = payload.into_fields();
        for (key, value) in &args.fields {
            format.insert(key.clone(), value.clone());
        }
        Ok(format)
    }

    async fn read_attachments(path: &Path) -> AppResult<Vec<Attachment>> {
        debug!(path = %path.display(), "Reading attachments");
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Validation {
                field: "attachments".to_string(),
                reason: format!("cannot read '{}': {}", path.display(), e),
            })?;

        serde_json::from_str(&content).map_err(|e| AppError::Validation {
            field: "attachments".to_string(),
            reason: format!("'{}' is not a JSON array of attachments: {}", path.display(), e),
        })
    }

    fn render_payload(notifier: &Notifier, message: &str, format: &FormatFields) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&notifier.build_payload(message, format))?)
    }

    fn describe_outcome(outcome: &DeliveryOutcome) -> String {
        let mut line = format!("✓ Delivered via {}", outcome.strategy);
        if let Some(status) = outcome.status_code {
            line.push_str(&format!(" (HTTP {status})"));
        }
        if let Some(code) = outcome.exit_code {
            line.push_str(&format!(" (exit code {code})"));
        }
        line.push_str(&format!(" in {} ms", outcome.duration_ms));
        if let Some(response) = outcome.response.as_deref().map(str::trim)
            && !response.is_empty()
        {
            line.push_str(&format!(": {response}"));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WEBHOOK: &str = "https://hooks.slack.com/services/T000/B000/XXXX";

    fn args(message: &str) -> SendArgs {
        SendArgs {
            message: message.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_build_format_typed_flags() {
        let args = SendArgs {
            username: Some("deploy-bot".to_string()),
            icon_emoji: Some(":rocket:".to_string()),
            channel: Some("#ops".to_string()),
            ..args("hi")
        };

        let format = SendCommandHandler::build_format(&args).await.unwrap();
        assert_eq!(
            serde_json::Value::Object(format),
            json!({"username": "deploy-bot", "icon_emoji": ":rocket:", "channel": "#ops"})
        );
    }

    #[tokio::test]
    async fn test_field_replaces_typed_flag() {
        let args = SendArgs {
            username: Some("deploy-bot".to_string()),
            fields: vec![
                ("username".to_string(), json!("override")),
                ("mrkdwn".to_string(), json!(false)),
            ],
            ..args("hi")
        };

        let format = SendCommandHandler::build_format(&args).await.unwrap();
        assert_eq!(format["username"], "override");
        assert_eq!(format["mrkdwn"], false);
    }

    #[tokio::test]
    async fn test_attachments_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("attachments.json");
        std::fs::write(&file, r#"[{"fallback": "build failed", "color": "danger"}]"#).unwrap();

        let args = SendArgs {
            attachments: Some(file),
            ..args("hi")
        };
        let format = SendCommandHandler::build_format(&args).await.unwrap();
        assert_eq!(
            format["attachments"],
            json!([{"fallback": "build failed", "color": "danger"}])
        );
    }

    #[tokio::test]
    async fn test_attachments_file_must_be_array() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("attachments.json");
        std::fs::write(&file, r#"{"fallback": "not an array"}"#).unwrap();

        let args = SendArgs {
            attachments: Some(file),
            ..args("hi")
        };
        let result = SendCommandHandler::build_format(&args).await;
        assert!(matches!(result, Err(AppError::Validation { field, .. }) if field == "attachments"));
    }

    #[tokio::test]
    async fn test_render_payload_applies_defaults() {
        let mut settings = Settings::default();
        settings.webhook.url = WEBHOOK.to_string();
        settings.webhook.defaults.insert("username".to_string(), json!("default-bot"));
        settings.webhook.defaults.insert("channel".to_string(), json!("#general"));

        let notifier = build_notifier(&settings, DeliveryResolver::global()).unwrap();
        let mut format = FormatFields::new();
        format.insert("channel".to_string(), json!("#ops"));

        let rendered = SendCommandHandler::render_payload(&notifier, "hi", &format).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            value,
            json!({"text": "hi", "channel": "#ops", "username": "default-bot"})
        );
    }

    #[tokio::test]
    async fn test_dry_run_requires_webhook() {
        let handler = SendCommandHandler::new(Settings::default());
        let args = SendArgs {
            dry_run: true,
            ..args("hi")
        };
        let result = handler.execute(&args).await;
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_send_through_native_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/T000/B000/XXXX"))
            .and(body_string_contains("Deploy"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        // The mock server speaks plain HTTP, so post through the resolved
        // delivery directly instead of going through URL validation
        let mut settings = Settings::default();
        settings.delivery.strategy = "native".to_string();
        let resolver = DeliveryResolver::from_settings(settings.delivery.clone()).await.unwrap();
        let delivery = resolver.resolve().await.unwrap();
        let outcome = delivery
            .post(
                r#"{"text":"Deploy finished"}"#,
                &format!("{}/services/T000/B000/XXXX", server.uri()),
            )
            .await
            .unwrap();

        assert_eq!(outcome.status_code, Some(200));
        let line = SendCommandHandler::describe_outcome(&outcome);
        assert!(line.starts_with("✓ Delivered via native (HTTP 200)"));
        assert!(line.ends_with(": ok"));
    }
}
