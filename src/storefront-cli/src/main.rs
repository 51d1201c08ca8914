//! Storefront CLI
//!
//! - `storefront suggest <text...>` prints suggestions for the trailing word
//! - `storefront interactive` opens a full-screen search box

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use storefront_api::StorefrontClient;
use storefront_cli::logging::{default_log_path, setup_file_logging, setup_logging};
use storefront_cli::{Cli, Command, interactive};
use storefront_search::CandidateProvider;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The interactive screen owns the terminal, so its logs go to a file.
    let _log_guard = if cli.is_interactive() {
        match setup_file_logging(&cli.log_level, cli.json_logs, &default_log_path()) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Error: {e:#}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        setup_logging(&cli.log_level, cli.json_logs);
        None
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    let client = StorefrontClient::new(&config.api).context("Invalid API configuration")?;
    let provider: Arc<dyn CandidateProvider> = Arc::new(client);

    match cli.command {
        Command::Suggest(cmd) => {
            let mut stdout = std::io::stdout();
            cmd.run(provider, &config.suggest, &mut stdout).await
        }
        Command::Interactive => interactive::run(provider, config.suggest).await,
    }
}
