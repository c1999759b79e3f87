// src/error.rs

//! Error types for the migration library

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the record store, the content store and the migration engine
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid policy code, limit or configuration file; aborts before any record is processed
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A record the migration needs does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The legacy content structure cannot be converted to the new format
    #[error("Transform error: {0}")]
    TransformError(String),

    /// Writing to the content bank failed (non-fatal for the record)
    #[error("Asset write error: {0}")]
    AssetWriteError(String),

    /// The legacy record already has a migrated counterpart
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::ConfigurationError("limit must be positive".to_string());
        assert_eq!(err.to_string(), "Configuration error: limit must be positive");
    }
}
