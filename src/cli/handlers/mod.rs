//! Command handlers for CLI operations
//!
//! Each handler owns the merged settings and performs one subcommand.

pub mod check;
pub mod example;
pub mod send;

pub use check::CheckCommandHandler;
pub use example::ExampleCommandHandler;
pub use send::SendCommandHandler;

use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppResult;
use crate::services::{DeliveryResolver, Notifier};

/// Build a notifier for the configured webhook
///
/// # Errors
/// `Configuration` when the webhook URL is missing or malformed.
pub(crate) fn build_notifier(
    settings: &Settings,
    resolver: Arc<DeliveryResolver>,
) -> AppResult<Notifier> {
    Notifier::builder(settings.webhook.url.as_str())
        .platform_domain(settings.webhook.platform_domain.as_str())
        .defaults(settings.webhook.defaults.clone())
        .resolver(resolver)
        .build()
}
