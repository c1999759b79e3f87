// src/commands/init.rs
//! Database initialization and shell completions

use super::open_store;
use crate::cli::Cli;
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use migratehvp::MigrateConfig;
use std::io;
use std::process::ExitCode;
use tracing::info;

/// Create the database, or bring an existing one up to the current schema
pub fn cmd_init(config: &MigrateConfig) -> Result<ExitCode> {
    info!("Initializing migration database at: {}", config.db_path);
    migratehvp::db::init(&config.db_path).context("Failed to initialize database")?;
    let store = open_store(config)?;

    println!("Database initialized successfully at: {}", config.db_path);
    println!("Object store: {}", store.objects_dir().display());
    Ok(ExitCode::SUCCESS)
}

pub fn cmd_completions(shell: Shell) -> Result<ExitCode> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "migratehvp", &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
