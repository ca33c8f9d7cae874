//! hookcast
//!
//! Post formatted messages to chat incoming webhooks, natively over HTTPS or
//! through an external curl binary.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod models;
pub mod services;

pub use error::{AppError, AppResult};
pub use models::{Attachment, AttachmentField, FormatFields, Payload};
pub use services::{DeliveryResolver, Notifier};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
