// src/config.rs

//! Tool configuration
//!
//! Settings come from an optional TOML file; every field has a default so
//! the tool runs against a fresh `init`ed database with no file at all.
//!
//! ```toml
//! db_path = "/var/lib/migratehvp/migratehvp.db"
//! wwwroot = "https://learn.example.edu"
//! hash_algorithm = "sha256"
//! ```

use crate::db::paths;
use crate::error::{Error, Result};
use crate::hash::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Config file consulted when no `--config` is given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/migratehvp/config.toml";

const DEFAULT_WWWROOT: &str = "http://localhost";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    pub db_path: String,
    /// Object store directory; defaults to `objects/` next to the database
    pub objects_dir: Option<PathBuf>,
    /// Site root used to build embed links
    pub wwwroot: String,
    pub hash_algorithm: HashAlgorithm,
    /// Directory holding the maintenance flag file
    pub data_dir: Option<PathBuf>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            db_path: paths::DEFAULT_DB_PATH.to_string(),
            objects_dir: None,
            wwwroot: DEFAULT_WWWROOT.to_string(),
            hash_algorithm: HashAlgorithm::default(),
            data_dir: None,
        }
    }
}

impl MigrateConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigurationError(format!(
                "Cannot read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded config from {}", path.display());
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        self.site_url()?;
        if self.db_path.trim().is_empty() {
            return Err(Error::ConfigurationError("db_path must not be empty".to_string()));
        }
        Ok(())
    }

    /// The parsed site root URL
    pub fn site_url(&self) -> Result<Url> {
        let url = Url::parse(&self.wwwroot).map_err(|e| {
            Error::ConfigurationError(format!("wwwroot '{}' is not a valid URL: {}", self.wwwroot, e))
        })?;

        if url.cannot_be_a_base() {
            return Err(Error::ConfigurationError(format!(
                "wwwroot '{}' must be an absolute http(s) URL",
                self.wwwroot
            )));
        }
        Ok(url)
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.objects_dir
            .clone()
            .unwrap_or_else(|| paths::objects_dir(&self.db_path))
    }

    /// Data directory; the environment variable wins over the file
    pub fn data_dir(&self) -> PathBuf {
        if std::env::var_os(paths::DATA_DIR_ENV).is_some() {
            return paths::data_dir(&self.db_path);
        }
        self.data_dir
            .clone()
            .unwrap_or_else(|| paths::db_dir(&self.db_path))
    }

    /// Whether the maintenance flag file is present
    pub fn maintenance_enabled(&self) -> bool {
        paths::maintenance_flag(&self.data_dir()).exists()
    }
}
