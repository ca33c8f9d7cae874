//! CLI argument parsing with clap
//!
//! Defines the `hookcast` command line: global configuration flags and the
//! `send`, `example` and `check` subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::config::Profile;

/// Post formatted messages to a chat incoming webhook
#[derive(Parser, Debug)]
#[command(name = "hookcast")]
#[command(about = "Post formatted messages to a chat incoming webhook")]
#[command(long_about = "
hookcast posts messages to an incoming webhook. It talks HTTPS itself and
falls back to an external curl binary when native delivery is disabled.

EXAMPLES:
    # Send a plain message using the configured webhook
    hookcast send \"Deploy finished\"

    # Send to an explicit webhook with a custom bot name and emoji
    hookcast --webhook https://hooks.slack.com/services/T000/B000/XXXX \\
        send \"Deploy finished\" --username deploy-bot --icon-emoji :rocket:

    # Add arbitrary payload fields as JSON
    hookcast send \"Build broke\" --field 'attachments=[{\"color\":\"danger\",\"text\":\"main\"}]'

    # Show the payload without posting it
    hookcast send \"Hello\" --dry-run

    # Force delivery through curl
    hookcast send \"Hello\" --via binary

    # Print a template payload to start from
    hookcast example --attachments

    # Check configuration and report the delivery strategy
    hookcast check
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Use a single TOML file instead of the layered `config/` directory.
    /// The file must exist and be readable.
    #[arg(short, long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Configuration profile, overrides `HOOKCAST_PROFILE`
    ///
    /// Loads `{profile}.toml` between `default.toml` and `local.toml`.
    #[arg(short, long, global = true, value_name = "NAME")]
    pub profile: Option<Profile>,

    /// Incoming webhook URL, overrides `webhook.url`
    #[arg(short, long, global = true, value_name = "URL")]
    pub webhook: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a message
    ///
    /// Examples:
    ///   hookcast send "Deploy finished"
    ///   hookcast send "Deploy finished" --channel '#ops' --field color=good
    ///   hookcast send "Report" --attachments report.json --dry-run
    Send(SendArgs),

    /// Print a template payload
    Example {
        /// Print the template with two attachments
        #[arg(long)]
        attachments: bool,
    },

    /// Validate configuration and report which delivery would be used
    Check,
}

/// Arguments of the `send` subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct SendArgs {
    /// Message text
    #[arg(value_name = "MESSAGE")]
    pub message: String,

    /// Bot name shown next to the message
    #[arg(long)]
    pub username: Option<String>,

    /// Emoji used as the bot icon, e.g. :rocket:
    #[arg(long, conflicts_with = "icon_url", value_parser = super::validation::validate_icon_emoji)]
    pub icon_emoji: Option<String>,

    /// Image URL used as the bot icon
    #[arg(long)]
    pub icon_url: Option<String>,

    /// Channel to post in, when the webhook allows it
    #[arg(long)]
    pub channel: Option<String>,

    /// Extra payload field as KEY=JSON; non-JSON values are sent as strings
    ///
    /// Can be repeated. A later field replaces an earlier one with the same key.
    #[arg(long = "field", value_name = "KEY=JSON", value_parser = super::validation::parse_field)]
    pub fields: Vec<(String, Value)>,

    /// JSON file holding an array of attachments
    #[arg(long, value_name = "FILE")]
    pub attachments: Option<PathBuf>,

    /// Delivery strategy for this message
    ///
    /// One of: auto, native, binary, curl, command:<path>
    #[arg(long, value_name = "STRATEGY", value_parser = super::validation::validate_strategy)]
    pub via: Option<String>,

    /// Print the payload instead of posting it
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["hookcast", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["hookcast"]).is_err());
    }

    #[test]
    fn test_send_command() {
        let cli = Cli::try_parse_from([
            "hookcast",
            "send",
            "Deploy finished",
            "--username",
            "deploy-bot",
            "--icon-emoji",
            ":rocket:",
            "--field",
            "color=\"good\"",
            "--field",
            "mrkdwn=true",
            "--via",
            "native",
            "--dry-run",
        ])
        .unwrap();

        let Commands::Send(args) = cli.command else {
            panic!("Expected Send command");
        };
        assert_eq!(args.message, "Deploy finished");
        assert_eq!(args.username.as_deref(), Some("deploy-bot"));
        assert_eq!(args.icon_emoji.as_deref(), Some(":rocket:"));
        assert_eq!(
            args.fields,
            vec![
                ("color".to_string(), json!("good")),
                ("mrkdwn".to_string(), json!(true)),
            ]
        );
        assert_eq!(args.via.as_deref(), Some("native"));
        assert!(args.dry_run);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hookcast",
            "check",
            "--webhook",
            "https://hooks.slack.com/services/T000/B000/XXXX",
            "--profile",
            "ops",
            "--verbose",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Check));
        assert!(cli.webhook.is_some());
        assert_eq!(cli.profile.as_ref().map(Profile::name), Some("ops"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_icon_emoji_conflicts_with_icon_url() {
        let err = Cli::try_parse_from([
            "hookcast",
            "send",
            "hi",
            "--icon-emoji",
            ":ghost:",
            "--icon-url",
            "https://example.com/icon.png",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["hookcast", "--verbose", "--quiet", "check"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result = Cli::try_parse_from(["hookcast", "send", "hi", "--via", "pigeon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_name_is_validated() {
        let result = Cli::try_parse_from(["hookcast", "--profile", "../etc", "check"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_example_command() {
        let cli = Cli::try_parse_from(["hookcast", "example", "--attachments"]).unwrap();
        assert!(matches!(cli.command, Commands::Example { attachments: true }));
    }
}
