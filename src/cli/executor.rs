//! Command executor for dispatching CLI commands

use super::handlers::{CheckCommandHandler, ExampleCommandHandler, SendCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// Execute a CLI command with the merged settings
///
/// # Errors
/// Returns errors from the command handlers
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Commands::Send(args) => SendCommandHandler::new(settings).execute(args).await,
        Commands::Example { attachments } => ExampleCommandHandler::execute(*attachments),
        Commands::Check => CheckCommandHandler::new(settings).execute().await,
    }
}
