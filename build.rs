// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: database path
fn db_path_arg() -> Arg {
    Arg::new("db_path")
        .long("db-path")
        .value_name("PATH")
        .help("Path to the database file (overrides the config file)")
}

/// Common argument: content type filter
fn content_types_arg() -> Arg {
    Arg::new("contenttypes")
        .short('t')
        .long("contenttypes")
        .value_name("IDS")
        .value_delimiter(',')
        .help("Only migrate activities whose main library has one of these IDs")
}

fn build_cli() -> Command {
    Command::new("migratehvp")
        .version(env!("CARGO_PKG_VERSION"))
        .author("migratehvp contributors")
        .about("Migrate mod_hvp activities to mod_h5pactivity")
        .subcommand_required(false)
        .arg(
            Arg::new("execute")
                .short('e')
                .long("execute")
                .action(ArgAction::SetTrue)
                .help("Run the migration (without this, only list what would be migrated)"),
        )
        .arg(
            Arg::new("limit")
                .short('l')
                .long("limit")
                .default_value("100")
                .help("Maximum number of activities per run; already migrated ones are ignored"),
        )
        .arg(
            Arg::new("keeporiginal")
                .short('k')
                .long("keeporiginal")
                .value_name("N")
                .default_value("1")
                .help("After migration: 0 removes the original, 1 keeps it, 2 hides it"),
        )
        .arg(
            Arg::new("copy2cb")
                .short('c')
                .long("copy2cb")
                .value_name("N")
                .default_value("1")
                .help("Add packages to the content bank: 0 no, 1 with a link, 2 as a copy"),
        )
        .arg(content_types_arg())
        .arg(
            Arg::new("csvfile")
                .short('f')
                .long("csvfile")
                .value_name("PATH")
                .help("Write already migrated pairs to this CSV file instead of migrating"),
        )
        .arg(db_path_arg())
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a TOML config file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("init")
                .about("Create the database or upgrade its schema")
                .arg(db_path_arg()),
        )
        .subcommand(
            Command::new("status")
                .about("Show how many activities are waiting for migration")
                .arg(content_types_arg())
                .arg(db_path_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("migratehvp.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
