//! Configuration for hookcast
//!
//! Settings come from TOML files and `HOOKCAST_*` variables, lowest priority
//! first:
//! 1. Built-in defaults
//! 2. `default.toml`
//! 3. `{profile}.toml` when a profile is selected
//! 4. `local.toml`, kept out of version control
//! 5. `HOOKCAST_*` environment variables

pub mod error;
pub mod loader;
pub mod profile;
pub mod settings;
pub mod validation;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use profile::Profile;
pub use settings::{
    DeliverySettings, LoggerSettings, Settings, WebhookSettings,
};
