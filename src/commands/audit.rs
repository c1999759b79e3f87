// src/commands/audit.rs
//! Audit CSV of already migrated activities

use anyhow::{Context, Result};
use migratehvp::MigrateConfig;
use migratehvp::migrate::{AuditReporter, LinkBuilder, write_csv};
use rusqlite::Connection;
use std::path::Path;
use std::process::ExitCode;

/// Write one row per migrated pair to `csv_path`; never migrates anything
pub fn cmd_audit(conn: &Connection, config: &MigrateConfig, csv_path: &Path) -> Result<ExitCode> {
    let site = config.site_url().context("Invalid wwwroot in configuration")?;
    let reporter = AuditReporter::new(LinkBuilder::new(site));

    let rows = reporter
        .reconcile(conn)
        .context("Failed to reconcile migrated activities")?;
    write_csv(&rows, csv_path)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;

    println!("Done writing to CSV output file");
    Ok(ExitCode::SUCCESS)
}
