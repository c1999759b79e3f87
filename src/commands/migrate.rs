// src/commands/migrate.rs
//! Batch migration command

use super::progress::BatchProgress;
use super::{check_site, cmd_audit, open_database, open_store};
use crate::cli::MigrateArgs;
use anyhow::{Context, Result, bail};
use migratehvp::MigrateConfig;
use migratehvp::migrate::{BatchDriver, BatchRequest, CopyPolicy, RetentionPolicy};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Run a migration batch, or write the audit CSV when `--csvfile` is given
pub fn cmd_migrate(config: &MigrateConfig, args: &MigrateArgs) -> Result<ExitCode> {
    let mut conn = open_database(config)?;
    if let Some(code) = check_site(&conn, config)? {
        return Ok(code);
    }

    if args.limit <= 0 {
        bail!("Limit must be a positive integer (got {})", args.limit);
    }
    let retention = RetentionPolicy::from_code(args.keep_original)
        .context("Invalid --keeporiginal value")?;
    let copy = CopyPolicy::from_code(args.copy_to_content_bank)
        .context("Invalid --copy2cb value")?;

    println!("Server Time: {}\n", chrono::Local::now().to_rfc2822());

    if let Some(csv_path) = &args.csv_file {
        return cmd_audit(&conn, config, csv_path);
    }

    println!("Search for {} non migrated hvp activities\n", args.limit);

    let store = open_store(config)?;
    let progress = BatchProgress::new();

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    }) {
        warn!("Could not install interrupt handler: {}", e);
    }

    let request = BatchRequest {
        content_types: args.content_types.clone(),
        limit: args.limit,
        retention,
        copy,
        dry_run: !args.execute,
    };
    info!(
        "Starting batch (execute: {}, retention: {}, copy: {})",
        args.execute, retention, copy
    );

    let driver = BatchDriver::new(&store)
        .with_progress(&progress)
        .with_cancel_flag(cancel);
    let report = driver
        .run(&mut conn, &request)
        .context("Failed to select activities")?;

    if report.is_empty() {
        println!(" * No activities are found.\n");
        return Ok(ExitCode::FAILURE);
    }

    if report.cancelled {
        println!(
            "Interrupted: {} selected activities were not started",
            report.not_started.len()
        );
    }

    Ok(ExitCode::SUCCESS)
}
