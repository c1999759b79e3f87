// src/migrate/contentbank.rs

//! Content bank copies of migrated packages

use super::policy::CopyPolicy;
use super::{AREA_PUBLIC, COMPONENT_CONTENTBANK};
use crate::db;
use crate::db::models::{ContentBankContent, Context, FileCoordinates, H5pActivity, StoredFile};
use crate::error::{Error, Result};
use crate::filesystem::ContentStore;
use rusqlite::Connection;
use tracing::{debug, info};

/// A content bank entry created for a migrated activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBankReference {
    pub content_id: i64,
    /// The content bank's own copy of the package
    pub file_id: i64,
    /// Whether the activity's package is an alias of the content bank copy
    pub linked: bool,
}

/// Adds migrated packages to the content bank of their course
pub struct ContentBankLinker<'a> {
    store: &'a dyn ContentStore,
}

impl<'a> ContentBankLinker<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self { store }
    }

    /// Add `asset` (the new activity's package) to the content bank per `policy`
    ///
    /// Every failure is returned as `AssetWriteError`. The content bank rows
    /// are written in their own transaction, so a failure leaves no entry.
    pub fn attach(
        &self,
        conn: &mut Connection,
        asset: &StoredFile,
        new_record: &H5pActivity,
        policy: CopyPolicy,
        now: i64,
    ) -> Result<Option<ContentBankReference>> {
        if policy == CopyPolicy::None {
            debug!("Content bank copy disabled for '{}'", new_record.name);
            return Ok(None);
        }

        let asset_id = asset
            .id
            .ok_or_else(|| Error::AssetWriteError("package file has no ID".to_string()))?;

        let content = self.store.retrieve(&asset.content_hash).map_err(as_asset_error)?;
        let content_hash = self.store.store(&content).map_err(as_asset_error)?;
        let linked = policy == CopyPolicy::LinkedCopy;

        let reference = db::transaction(conn, |tx| {
            let course_context = Context::for_course(tx, new_record.course_id)?;

            let mut entry =
                ContentBankContent::new(new_record.name.clone(), course_context.id, now);
            let content_id = entry.insert(tx)?;

            let coordinates = FileCoordinates::new(
                course_context.id,
                COMPONENT_CONTENTBANK,
                AREA_PUBLIC,
                content_id,
                "/",
                &asset.coordinates.file_name,
            );
            let mut bank_file =
                StoredFile::new(coordinates, content_hash.clone(), content.len() as i64, now);
            let file_id = bank_file.insert(tx)?;

            if linked {
                StoredFile::set_reference(tx, asset_id, file_id)?;
            }

            Ok(ContentBankReference {
                content_id,
                file_id,
                linked,
            })
        })
        .map_err(as_asset_error)?;

        info!(
            "Added '{}' to content bank as content {} ({})",
            new_record.name, reference.content_id, policy
        );
        Ok(Some(reference))
    }
}

fn as_asset_error(err: Error) -> Error {
    match err {
        Error::AssetWriteError(_) => err,
        other => Error::AssetWriteError(other.to_string()),
    }
}
