//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments override values loaded from configuration files and
//! `HOOKCAST_*` environment variables.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

/// Applies CLI argument overrides on top of file-based configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration the way the CLI asked for it
    ///
    /// `--config` switches to single file mode, `--profile` picks the
    /// profile layer. Without either the process environment decides.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match cli.config {
            Some(ref path) => Self::loader_for_file(path)?,
            None => ConfigLoader::new()?,
        };
        let loader = match cli.profile {
            Some(ref profile) => loader.with_profile(profile.clone()),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    fn loader_for_file(path: &Path) -> Result<ConfigLoader, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::ValidationError {
                field: "config_file".to_string(),
                message: format!("Configuration path is not a file: '{}'", path.display()),
            });
        }
        Ok(ConfigLoader::with_config_file(path))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// # Returns
    /// A new Settings instance with CLI overrides applied and validated
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);
        Self::apply_command_overrides(&mut config, &cli.command);

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(ref url) = cli.webhook {
            config.webhook.url = url.clone();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        if let Commands::Send(args) = command
            && let Some(ref via) = args.via
        {
            config.delivery.strategy = via.clone();
        }
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
