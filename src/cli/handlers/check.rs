//! Check command handler
//!
//! Validates the merged configuration and reports which delivery strategy
//! a `send` would use, without posting anything.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppResult;
use crate::services::DeliveryResolver;

use super::build_notifier;

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> AppResult<()> {
        for line in self.report().await? {
            println!("{line}");
        }
        Ok(())
    }

    /// Lines describing the configuration, failing on the first problem
    pub async fn report(&self) -> AppResult<Vec<String>> {
        self.config.validate()?;
        let mut lines = vec!["✓ Configuration is valid".to_string()];

        let resolver = Arc::new(DeliveryResolver::from_settings(self.config.delivery.clone()).await?);
        build_notifier(&self.config, resolver.clone())?;
        lines.push(format!(
            "✓ Webhook is valid for {}",
            self.config.webhook.platform_domain
        ));

        let delivery = resolver.resolve().await?;
        lines.push(format!(
            "✓ Delivery strategy: {} (configured: {})",
            delivery.name(),
            self.config.delivery.strategy
        ));

        match resolver.locator().locate().await {
            Some(path) => lines.push(format!(
                "✓ {} found at {}",
                resolver.locator().binary_name(),
                path.display()
            )),
            None => lines.push(format!(
                "- {} not found; binary fallback unavailable",
                resolver.locator().binary_name()
            )),
        }

        if self.config.delivery.accept_invalid_certs {
            lines.push("! TLS certificate verification is disabled".to_string());
        }

        Ok(lines)
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
