// src/db/schema.rs

//! Database schema definitions and migrations
//!
//! Defines the SQLite tables behind the legacy and new activity records, the
//! file area and the content bank, and a version table so the schema can
//! evolve without touching existing data.

use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Context level of a course
pub const CONTEXT_COURSE: i64 = 50;

/// Context level of a course module
pub const CONTEXT_MODULE: i64 = 70;

fn init_schema_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    init_schema_version(conn)?;

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Whether the database is behind the schema this build expects
pub fn needs_upgrade(conn: &Connection) -> Result<bool> {
    Ok(get_schema_version(conn)? < SCHEMA_VERSION)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Apply all pending migrations to bring the database up to date
pub fn migrate(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;
    info!("Current schema version: {}", current_version);

    if current_version >= SCHEMA_VERSION {
        info!("Schema is up to date");
        return Ok(());
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        info!("Applying migration to version {}", version);
        apply_migration(conn, version)?;
        set_schema_version(conn, version)?;
    }

    info!("Schema migration complete. Now at version {}", SCHEMA_VERSION);
    Ok(())
}

fn apply_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(Error::InitError(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Initial schema - Version 1
///
/// - courses / contexts / modules / course_modules: the course registry
/// - hvp_libraries / hvp: legacy activities and their main libraries
/// - h5pactivity: migrated activities, indexed on the correlation key
/// - files: file area coordinates pointing into the object store
/// - contentbank_content: shared content bank entries
fn migrate_v1(conn: &Connection) -> Result<()> {
    debug!("Creating schema version 1");

    conn.execute_batch(
        "
        CREATE TABLE courses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            shortname TEXT NOT NULL,
            fullname TEXT NOT NULL
        );

        CREATE TABLE contexts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            context_level INTEGER NOT NULL,
            instance_id INTEGER NOT NULL,
            UNIQUE(context_level, instance_id)
        );

        CREATE TABLE modules (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        INSERT INTO modules (name) VALUES ('hvp'), ('h5pactivity');

        CREATE TABLE course_modules (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_id INTEGER NOT NULL,
            module_id INTEGER NOT NULL,
            instance_id INTEGER NOT NULL,
            section INTEGER NOT NULL DEFAULT 0,
            visible INTEGER NOT NULL DEFAULT 1,
            id_number TEXT,
            deletion_in_progress INTEGER NOT NULL DEFAULT 0,
            added INTEGER NOT NULL DEFAULT 0,
            UNIQUE(module_id, instance_id),
            FOREIGN KEY (course_id) REFERENCES courses(id),
            FOREIGN KEY (module_id) REFERENCES modules(id)
        );

        CREATE INDEX idx_course_modules_course ON course_modules(course_id);

        CREATE TABLE hvp_libraries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            machine_name TEXT NOT NULL,
            major_version INTEGER NOT NULL,
            minor_version INTEGER NOT NULL,
            patch_version INTEGER NOT NULL DEFAULT 0,
            title TEXT NOT NULL DEFAULT '',
            UNIQUE(machine_name, major_version, minor_version)
        );

        CREATE TABLE hvp (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            intro TEXT,
            intro_format INTEGER NOT NULL DEFAULT 1,
            json_content TEXT NOT NULL,
            main_library_id INTEGER NOT NULL,
            disable_options INTEGER NOT NULL DEFAULT 0,
            max_grade REAL NOT NULL DEFAULT 100,
            time_created INTEGER NOT NULL,
            time_modified INTEGER NOT NULL,
            FOREIGN KEY (course_id) REFERENCES courses(id)
        );

        CREATE INDEX idx_hvp_correlation ON hvp(name, course_id, time_created);
        CREATE INDEX idx_hvp_main_library ON hvp(main_library_id);

        CREATE TABLE h5pactivity (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            intro TEXT,
            intro_format INTEGER NOT NULL DEFAULT 1,
            grade INTEGER NOT NULL DEFAULT 0,
            display_options INTEGER NOT NULL DEFAULT 0,
            enable_tracking INTEGER NOT NULL DEFAULT 1,
            time_created INTEGER NOT NULL,
            time_modified INTEGER NOT NULL,
            FOREIGN KEY (course_id) REFERENCES courses(id)
        );

        CREATE INDEX idx_h5pactivity_correlation ON h5pactivity(name, course_id, time_created);

        CREATE TABLE files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content_hash TEXT NOT NULL,
            context_id INTEGER NOT NULL,
            component TEXT NOT NULL,
            file_area TEXT NOT NULL,
            item_id INTEGER NOT NULL,
            file_path TEXT NOT NULL,
            file_name TEXT NOT NULL,
            file_size INTEGER NOT NULL,
            mime_type TEXT,
            reference_file_id INTEGER,
            time_created INTEGER NOT NULL,
            UNIQUE(context_id, component, file_area, item_id, file_path, file_name),
            FOREIGN KEY (reference_file_id) REFERENCES files(id) ON DELETE SET NULL
        );

        CREATE INDEX idx_files_area ON files(context_id, component, file_area, item_id);
        CREATE INDEX idx_files_content_hash ON files(content_hash);

        CREATE TABLE contentbank_content (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            content_type TEXT NOT NULL,
            context_id INTEGER NOT NULL,
            time_created INTEGER NOT NULL,
            time_modified INTEGER NOT NULL
        );

        CREATE INDEX idx_contentbank_context ON contentbank_content(context_id);
        ",
    )?;

    info!("Schema version 1 created successfully");
    Ok(())
}
