// src/migrate/retention.rs

//! Disposal of legacy activities after migration
//!
//! Runs only once the new activity is committed. Failures here never undo
//! the migration.

use super::policy::RetentionPolicy;
use crate::db;
use crate::db::models::{Context, CourseModule, HvpActivity, MODULE_HVP, StoredFile};
use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// What was done to the legacy activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Kept,
    Hidden,
    Removed,
}

/// Applies the retention policy to legacy activities
#[derive(Debug, Default, Clone, Copy)]
pub struct RetentionManager;

impl RetentionManager {
    pub fn new() -> Self {
        Self
    }

    pub fn dispose(
        &self,
        conn: &mut Connection,
        legacy: &HvpActivity,
        policy: RetentionPolicy,
    ) -> Result<Disposition> {
        let hvp_id = legacy
            .id
            .ok_or_else(|| Error::NotFound("legacy activity has no ID".to_string()))?;

        match policy {
            RetentionPolicy::Keep => {
                debug!("Keeping legacy activity {}", hvp_id);
                Ok(Disposition::Kept)
            }
            RetentionPolicy::Hide => {
                let mut cm = CourseModule::find_by_instance(conn, MODULE_HVP, hvp_id)?
                    .ok_or_else(|| {
                        Error::NotFound(format!("course module of hvp {hvp_id}"))
                    })?;
                cm.set_visible(conn, false)?;
                info!("Hid legacy activity {} (cmid {:?})", hvp_id, cm.id);
                Ok(Disposition::Hidden)
            }
            RetentionPolicy::Remove => {
                db::transaction(conn, |tx| {
                    if let Some(cm) = CourseModule::find_by_instance(tx, MODULE_HVP, hvp_id)?
                        && let Some(cmid) = cm.id
                    {
                        if let Some(context) = Context::find_for_module(tx, cmid)? {
                            let removed = StoredFile::delete_by_context(tx, context.id)?;
                            debug!("Removed {} files of legacy context {}", removed, context.id);
                            Context::delete(tx, context.id)?;
                        }
                        CourseModule::delete(tx, cmid)?;
                    }
                    HvpActivity::delete(tx, hvp_id)
                })?;
                info!("Removed legacy activity {}", hvp_id);
                Ok(Disposition::Removed)
            }
        }
    }
}
