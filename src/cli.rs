// src/cli.rs
//! CLI definitions for migratehvp
//!
//! Without a subcommand the tool runs a migration batch (a dry run unless
//! `--execute` is given). The actual command implementations are in the
//! `commands` module.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "migratehvp")]
#[command(author = "migratehvp contributors")]
#[command(version)]
#[command(about = "Migrate mod_hvp activities to mod_h5pactivity", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub migrate: MigrateArgs,

    /// Path to the database file (overrides the config file)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Run the migration (without this, only list what would be migrated)
    #[arg(short, long)]
    pub execute: bool,

    /// Maximum number of activities per run; already migrated ones are ignored
    #[arg(short, long, default_value_t = 100, allow_negative_numbers = true)]
    pub limit: i64,

    /// After migration: 0 removes the original, 1 keeps it, 2 hides it
    #[arg(short = 'k', long = "keeporiginal", value_name = "N", default_value_t = 1)]
    pub keep_original: i64,

    /// Add packages to the content bank: 0 no, 1 with a link, 2 as a copy
    #[arg(short = 'c', long = "copy2cb", value_name = "N", default_value_t = 1)]
    pub copy_to_content_bank: i64,

    /// Only migrate activities whose main library has one of these IDs
    #[arg(short = 't', long = "contenttypes", value_name = "IDS", value_delimiter = ',')]
    pub content_types: Vec<i64>,

    /// Write already migrated pairs to this CSV file instead of migrating
    #[arg(short = 'f', long = "csvfile", value_name = "PATH")]
    pub csv_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database or upgrade its schema
    Init,

    /// Show how many activities are waiting for migration
    Status {
        /// Only count activities whose main library has one of these IDs
        #[arg(short = 't', long = "contenttypes", value_name = "IDS", value_delimiter = ',')]
        content_types: Vec<i64>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["migratehvp"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.migrate.execute);
        assert_eq!(cli.migrate.limit, 100);
        assert_eq!(cli.migrate.keep_original, 1);
        assert_eq!(cli.migrate.copy_to_content_bank, 1);
        assert!(cli.migrate.content_types.is_empty());
    }

    #[test]
    fn test_migration_flags() {
        let cli = Cli::try_parse_from([
            "migratehvp", "-e", "-l", "5", "-k", "0", "-c", "2", "-t", "3,7",
        ])
        .unwrap();
        assert!(cli.migrate.execute);
        assert_eq!(cli.migrate.limit, 5);
        assert_eq!(cli.migrate.keep_original, 0);
        assert_eq!(cli.migrate.copy_to_content_bank, 2);
        assert_eq!(cli.migrate.content_types, vec![3, 7]);
    }

    #[test]
    fn test_long_flags_with_values() {
        let cli = Cli::try_parse_from([
            "migratehvp",
            "--limit=-1",
            "--keeporiginal=2",
            "--csvfile=/tmp/out.csv",
        ])
        .unwrap();
        assert_eq!(cli.migrate.limit, -1);
        assert_eq!(cli.migrate.keep_original, 2);
        assert_eq!(cli.migrate.csv_file, Some(PathBuf::from("/tmp/out.csv")));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = Cli::try_parse_from(["migratehvp", "--limit", "many"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(Cli::try_parse_from(["migratehvp", "-t", "3,x"]).is_err());
        assert!(Cli::try_parse_from(["migratehvp", "-k", "x"]).is_err());
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from([
            "migratehvp", "--config", "/etc/site.toml", "--db-path", "/tmp/x.db", "-v", "init",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Init)));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/site.toml")));
        assert_eq!(cli.db_path.as_deref(), Some("/tmp/x.db"));
        assert!(cli.verbose);

        let cli = Cli::try_parse_from(["migratehvp", "--config", "c.toml", "status"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Status { .. })));
    }

    #[test]
    fn test_status_subcommand() {
        let cli = Cli::try_parse_from(["migratehvp", "status", "-t", "4", "--db-path", "/tmp/x.db"])
            .unwrap();
        assert!(matches!(cli.command, Some(Commands::Status { ref content_types }) if content_types == &[4]));
        assert_eq!(cli.db_path.as_deref(), Some("/tmp/x.db"));
    }
}
