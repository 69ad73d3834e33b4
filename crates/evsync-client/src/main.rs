//! evsync CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use evsync_client::cli::{Cli, Command, ConfigAction};
use evsync_client::commands;
use evsync_client::config::Config;
use evsync_client::error::ClientResult;
use evsync_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config.with_format(cli.log_format.into())) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let path = cli.config.unwrap_or_else(Config::default_path);

    if let Some(Command::Config { action: ConfigAction::Path }) = cli.command {
        return commands::config::path(&path, &mut std::io::stdout());
    }

    let config = Config::load_from(&path)?;

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &mut std::io::stdout()),
            ConfigAction::Validate => commands::config::validate(&config, &mut std::io::stdout()),
            ConfigAction::Path => commands::config::path(&path, &mut std::io::stdout()),
        },
        None => commands::sync::run(&config).await.map(|_| ()),
    }
}
