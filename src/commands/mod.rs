// src/commands/mod.rs
//! Command handlers for the migratehvp CLI

mod audit;
mod init;
mod migrate;
pub mod progress;
mod status;

pub use audit::cmd_audit;
pub use init::{cmd_completions, cmd_init};
pub use migrate::cmd_migrate;
pub use status::cmd_status;

use anyhow::{Context, Result};
use migratehvp::MigrateConfig;
use migratehvp::db::{self, schema};
use migratehvp::filesystem::CasStore;
use rusqlite::Connection;
use std::process::ExitCode;
use tracing::debug;

/// Open the record store named by the config
fn open_database(config: &MigrateConfig) -> Result<Connection> {
    db::open(&config.db_path).context("Failed to open migration database")
}

/// Open the object store named by the config
fn open_store(config: &MigrateConfig) -> Result<CasStore> {
    let objects_dir = config.objects_dir();
    debug!("Using object store at {}", objects_dir.display());
    CasStore::with_algorithm(&objects_dir, config.hash_algorithm)
        .with_context(|| format!("Failed to open object store at {}", objects_dir.display()))
}

/// Refuse to work on a site in maintenance or with a pending schema upgrade
///
/// Returns the exit code to stop with, or `None` when the site is usable.
fn check_site(conn: &Connection, config: &MigrateConfig) -> Result<Option<ExitCode>> {
    if config.maintenance_enabled() {
        println!("CLI maintenance mode active, migration suspended.");
        return Ok(Some(ExitCode::FAILURE));
    }

    if schema::needs_upgrade(conn).context("Failed to read schema version")? {
        println!("Database upgrade pending, migration suspended. Run 'migratehvp init' first.");
        return Ok(Some(ExitCode::FAILURE));
    }

    Ok(None)
}
