// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use migratehvp::MigrateConfig;
use std::process::ExitCode;
use tracing::debug;

fn main() -> Result<ExitCode> {
    // Usage errors are configuration errors and exit 1; help and version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print()?;
            return Ok(if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(Commands::Completions { shell }) = cli.command {
        return commands::cmd_completions(shell);
    }

    let mut config = MigrateConfig::load(cli.config.as_deref())?;
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
        config.validate()?;
    }
    debug!("Effective configuration: {:?}", config);

    match cli.command {
        Some(Commands::Init) => commands::cmd_init(&config),
        Some(Commands::Status { content_types }) => commands::cmd_status(&config, &content_types),
        Some(Commands::Completions { .. }) => Ok(ExitCode::SUCCESS),
        None => commands::cmd_migrate(&config, &cli.migrate),
    }
}
