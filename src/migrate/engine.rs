// src/migrate/engine.rs

//! Per-activity migration
//!
//! # Lifecycle
//!
//! ```text
//! SELECTED -> CONTENT_TRANSFORMED -> ASSET_LINKED -> RETAINED | DISPOSED -> DONE
//!     \______________\_____________________\________________\______-> FAILED
//! ```
//!
//! The new activity, its course module, its context and its private package
//! copy are committed in one transaction (CONTENT_TRANSFORMED). That commit
//! is the point of no return: content bank and retention failures after it
//! are warnings, never a rollback.

use super::contentbank::{ContentBankLinker, ContentBankReference};
use super::policy::{CopyPolicy, RetentionPolicy};
use super::retention::{Disposition, RetentionManager};
use super::{AREA_PACKAGE, COMPONENT_H5PACTIVITY, COMPONENT_HVP, selector, transform};
use crate::db;
use crate::db::models::{
    Context, CourseModule, FileCoordinates, HvpActivity, HvpLibrary, MODULE_H5PACTIVITY,
    MODULE_HVP, StoredFile,
};
use crate::db::schema::CONTEXT_MODULE;
use crate::error::{Error, Result};
use crate::filesystem::ContentStore;
use rusqlite::Connection;
use std::fmt;
use tracing::{debug, info, warn};

/// Step a migration has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    Selected,
    ContentTransformed,
    AssetLinked,
    Retained,
    Disposed,
    Done,
    Failed,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Selected => "selected",
            Self::ContentTransformed => "content_transformed",
            Self::AssetLinked => "asset_linked",
            Self::Retained => "retained",
            Self::Disposed => "disposed",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Result of migrating one legacy activity
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    pub legacy_id: i64,
    pub success: bool,
    /// Non-fatal problems, in the order they happened; the error message on failure
    pub warnings: Vec<String>,
    pub new_record_id: Option<i64>,
    pub content_bank: Option<ContentBankReference>,
    /// States passed through, ending in `Done` or `Failed`
    pub trail: Vec<MigrationState>,
}

impl MigrationOutcome {
    /// Outcome of a migration stopped by a fatal error
    pub fn failed(legacy_id: i64, err: &Error) -> Self {
        Self {
            legacy_id,
            success: false,
            warnings: vec![err.to_string()],
            new_record_id: None,
            content_bank: None,
            trail: vec![MigrationState::Selected, MigrationState::Failed],
        }
    }

    pub fn state(&self) -> MigrationState {
        self.trail.last().copied().unwrap_or(MigrationState::Selected)
    }

    pub fn passed(&self, state: MigrationState) -> bool {
        self.trail.contains(&state)
    }
}

/// The legacy package: its file row and its bytes
struct LegacyPackage {
    file: StoredFile,
    content: Vec<u8>,
}

/// Migrates legacy activities one at a time
pub struct MigrationEngine<'a> {
    store: &'a dyn ContentStore,
    retention: RetentionManager,
}

impl<'a> MigrationEngine<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self {
            store,
            retention: RetentionManager::new(),
        }
    }

    /// Migrate one legacy activity; fatal errors become a failed outcome
    pub fn migrate(
        &self,
        conn: &mut Connection,
        legacy_id: i64,
        retention: RetentionPolicy,
        copy: CopyPolicy,
    ) -> MigrationOutcome {
        self.try_migrate(conn, legacy_id, retention, copy)
            .unwrap_or_else(|err| {
                warn!("Migration of hvp {} failed: {}", legacy_id, err);
                MigrationOutcome::failed(legacy_id, &err)
            })
    }

    /// Migrate one legacy activity
    ///
    /// Returns `Err` for any failure that leaves no new activity behind:
    /// missing records, an existing migrated counterpart, transform errors,
    /// and store errors while persisting the new activity.
    pub fn try_migrate(
        &self,
        conn: &mut Connection,
        legacy_id: i64,
        retention: RetentionPolicy,
        copy: CopyPolicy,
    ) -> Result<MigrationOutcome> {
        let mut trail = vec![MigrationState::Selected];
        let mut warnings = Vec::new();

        let legacy = HvpActivity::find_by_id(conn, legacy_id)?
            .ok_or_else(|| Error::NotFound(format!("hvp activity {legacy_id}")))?;
        if selector::is_migrated(conn, &legacy)? {
            return Err(Error::AlreadyExists(format!(
                "hvp activity {} ('{}') is already migrated",
                legacy_id, legacy.name
            )));
        }

        let legacy_cm = CourseModule::find_by_instance(conn, MODULE_HVP, legacy_id)?
            .ok_or_else(|| Error::NotFound(format!("course module of hvp activity {legacy_id}")))?;
        let legacy_cmid = legacy_cm
            .id
            .ok_or_else(|| Error::NotFound(format!("course module of hvp activity {legacy_id}")))?;

        let library = HvpLibrary::find_by_id(conn, legacy.main_library_id)?.ok_or_else(|| {
            Error::TransformError(format!(
                "main library {} of '{}' does not exist",
                legacy.main_library_id, legacy.name
            ))
        })?;

        let now = chrono::Utc::now().timestamp();
        let mut activity = transform::transform(&legacy, &library, now)?;
        let package = self.legacy_package(conn, legacy_cmid, &legacy)?;
        let module_id = CourseModule::module_id(conn, MODULE_H5PACTIVITY)?;

        let (new_id, stored) = db::transaction(conn, |tx| {
            let new_id = activity.insert(tx)?;

            let mut cm = CourseModule::new(legacy.course_id, module_id, new_id, now);
            cm.section = legacy_cm.section;
            cm.visible = legacy_cm.visible;
            cm.id_number = legacy_cm.id_number.clone();
            let cmid = cm.insert(tx)?;

            let context = Context::find_or_create(tx, CONTEXT_MODULE, cmid)?;
            let content_hash = self.store.store(&package.content)?;
            let coordinates = FileCoordinates::new(
                context.id,
                COMPONENT_H5PACTIVITY,
                AREA_PACKAGE,
                0,
                "/",
                &package.file.coordinates.file_name,
            );
            let mut stored =
                StoredFile::new(coordinates, content_hash, package.content.len() as i64, now);
            stored.mime_type = package.file.mime_type.clone();
            stored.insert(tx)?;

            Ok((new_id, stored))
        })?;
        trail.push(MigrationState::ContentTransformed);
        info!(
            "Created h5pactivity {} for hvp {} ('{}', {})",
            new_id,
            legacy_id,
            legacy.name,
            library.full_name()
        );

        let linker = ContentBankLinker::new(self.store);
        let content_bank = match linker.attach(conn, &stored, &activity, copy, now) {
            Ok(reference) => reference,
            Err(err) => {
                warn!("Content bank copy of hvp {} failed: {}", legacy_id, err);
                warnings.push(format!("Content bank copy failed: {err}"));
                None
            }
        };
        trail.push(MigrationState::AssetLinked);

        match self.retention.dispose(conn, &legacy, retention) {
            Ok(Disposition::Removed) => trail.push(MigrationState::Disposed),
            Ok(disposition) => {
                debug!("Legacy activity {} {:?}", legacy_id, disposition);
                trail.push(MigrationState::Retained);
            }
            Err(err) => {
                warn!("Retention ({}) of hvp {} failed: {}", retention, legacy_id, err);
                warnings.push(format!("Original activity could not be processed ({retention}): {err}"));
                trail.push(MigrationState::Retained);
            }
        }

        trail.push(MigrationState::Done);
        Ok(MigrationOutcome {
            legacy_id,
            success: true,
            warnings,
            new_record_id: Some(new_id),
            content_bank,
            trail,
        })
    }

    /// Load the legacy package file and its bytes; it must exist and be non-empty
    fn legacy_package(
        &self,
        conn: &Connection,
        legacy_cmid: i64,
        legacy: &HvpActivity,
    ) -> Result<LegacyPackage> {
        let context = Context::find_for_module(conn, legacy_cmid)?.ok_or_else(|| {
            Error::TransformError(format!("'{}' has no module context", legacy.name))
        })?;

        let file = StoredFile::find_area_files(conn, context.id, COMPONENT_HVP, AREA_PACKAGE, Some(0))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::TransformError(format!("'{}' has no package file", legacy.name))
            })?;

        let content = self.store.retrieve(&file.content_hash).map_err(|e| {
            Error::TransformError(format!("package of '{}' is unreadable: {}", legacy.name, e))
        })?;

        if content.is_empty() {
            return Err(Error::TransformError(format!(
                "package of '{}' is empty",
                legacy.name
            )));
        }

        Ok(LegacyPackage { file, content })
    }
}
