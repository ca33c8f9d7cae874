use std::process::ExitCode;

use clap::Parser;
use hookcast::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = load_and_merge_config(cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(version = hookcast::pkg_version(), "Starting hookcast");
    execute_command(cli, settings).await?;
    Ok(())
}
