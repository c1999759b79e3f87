// src/lib.rs

//! migratehvp
//!
//! Migrates legacy `hvp` interactive-content activities to the
//! `h5pactivity` format, one activity at a time and idempotently.
//!
//! # Architecture
//!
//! - Database-first: courses, course modules, contexts, activities, file
//!   areas and the content bank all live in one SQLite store
//! - Content-addressed objects: package bytes are stored once by hash and
//!   referenced from file rows
//! - Reruns are safe: an activity is migrated iff a new-format activity with
//!   the same (name, course, time created) exists

pub mod config;
pub mod db;
mod error;
pub mod filesystem;
pub mod hash;
pub mod migrate;
pub mod progress;

pub use config::MigrateConfig;
pub use error::{Error, Result};
pub use hash::HashAlgorithm;
pub use migrate::{
    BatchDriver, BatchReport, BatchRequest, CopyPolicy, MigrationEngine, MigrationOutcome,
    RetentionPolicy,
};
pub use progress::{CallbackProgress, ProgressEvent, ProgressTracker};
