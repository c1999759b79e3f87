// src/commands/status.rs
//! Migration status

use super::open_database;
use anyhow::{Context, Result};
use migratehvp::MigrateConfig;
use migratehvp::db::schema;
use migratehvp::migrate::count_eligible;
use std::process::ExitCode;
use tracing::info;

pub fn cmd_status(config: &MigrateConfig, content_types: &[i64]) -> Result<ExitCode> {
    info!("Counting activities waiting for migration...");

    let conn = open_database(config)?;
    let version = schema::get_schema_version(&conn).context("Failed to read schema version")?;
    let pending = count_eligible(&conn, content_types).context("Failed to count activities")?;

    println!("Database:       {}", config.db_path);
    println!("Schema version: {}", version);
    if schema::needs_upgrade(&conn)? {
        println!("                (upgrade pending, run 'migratehvp init')");
    }
    if config.maintenance_enabled() {
        println!("Maintenance:    active");
    }
    if !content_types.is_empty() {
        let ids: Vec<String> = content_types.iter().map(i64::to_string).collect();
        println!("Content types:  {}", ids.join(", "));
    }
    println!("Not migrated:   {}", pending);

    Ok(ExitCode::SUCCESS)
}
