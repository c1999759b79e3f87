// src/db/paths.rs
//! Centralized path derivation for migratehvp directories

use std::path::{Path, PathBuf};

/// Default database location
pub const DEFAULT_DB_PATH: &str = "/var/lib/migratehvp/migratehvp.db";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MIGRATEHVP_DATA_DIR";

/// Get the directory containing the database
pub fn db_dir(db_path: &str) -> PathBuf {
    Path::new(db_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf()
}

/// Get the objects (CAS) directory
pub fn objects_dir(db_path: &str) -> PathBuf {
    db_dir(db_path).join("objects")
}

/// Get the data directory holding the maintenance flag
pub fn data_dir(db_path: &str) -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| db_dir(db_path))
}

/// Flag file whose presence puts the tool in maintenance mode
pub fn maintenance_flag(data_dir: &Path) -> PathBuf {
    data_dir.join("climaintenance.html")
}
