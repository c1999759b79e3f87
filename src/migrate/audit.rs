// src/migrate/audit.rs

//! Reconciliation of migrated pairs
//!
//! Pairs legacy and migrated activities on (name, course, time_created) and
//! reports both embed links so external references can be rewritten.
//! Read-only.

use super::links::LinkBuilder;
use super::{AREA_PACKAGE, COMPONENT_H5PACTIVITY};
use crate::db::models::{Context, CourseModule, MODULE_H5PACTIVITY, MODULE_HVP, StoredFile};
use crate::error::Result;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// CSV header, in column order
pub const CSV_HEADER: [&str; 6] = ["oldcmid", "oldname", "oldembed", "newcmid", "newname", "newembed"];

/// One migrated pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRow {
    pub old_cmid: i64,
    pub old_name: String,
    pub old_link: String,
    pub new_cmid: i64,
    pub new_name: String,
    /// Empty when the migrated activity has no package file
    pub new_link: String,
}

impl AuditRow {
    fn fields(&self) -> [String; 6] {
        [
            self.old_cmid.to_string(),
            self.old_name.clone(),
            self.old_link.clone(),
            self.new_cmid.to_string(),
            self.new_name.clone(),
            self.new_link.clone(),
        ]
    }
}

pub struct AuditReporter {
    links: LinkBuilder,
}

impl AuditReporter {
    pub fn new(links: LinkBuilder) -> Self {
        Self { links }
    }

    /// Build one row per migrated pair, ordered by legacy ID
    ///
    /// Pairs whose legacy course module no longer exists (the legacy
    /// activity was removed or is mid-deletion) cannot be linked and are
    /// skipped.
    pub fn reconcile(&self, conn: &Connection) -> Result<Vec<AuditRow>> {
        let mut stmt = conn.prepare(
            "SELECT h.id, h.name, hp.id, hp.name
             FROM hvp h
             JOIN h5pactivity hp
               ON hp.name = h.name
              AND hp.course_id = h.course_id
              AND hp.time_created = h.time_created
             ORDER BY h.id ASC, hp.id ASC",
        )?;
        let pairs = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut rows = Vec::with_capacity(pairs.len());
        for (hvp_id, old_name, new_id, new_name) in pairs {
            let Some(old_cmid) = CourseModule::find_by_instance(conn, MODULE_HVP, hvp_id)?
                .and_then(|cm| cm.id)
            else {
                warn!("Skipping hvp {} ('{}'): course module not found", hvp_id, old_name);
                continue;
            };

            let Some(new_cmid) = CourseModule::find_by_instance(conn, MODULE_H5PACTIVITY, new_id)?
                .and_then(|cm| cm.id)
            else {
                warn!("Skipping h5pactivity {} ('{}'): course module not found", new_id, new_name);
                continue;
            };

            let new_link = match self.package_file(conn, new_cmid)? {
                Some(file) => self.links.package_embed(&file.coordinates),
                None => {
                    debug!("h5pactivity {} has no package file", new_id);
                    String::new()
                }
            };

            rows.push(AuditRow {
                old_cmid,
                old_name,
                old_link: self.links.legacy_embed(old_cmid),
                new_cmid,
                new_name,
                new_link,
            });
        }

        info!("Reconciled {} migrated activities", rows.len());
        Ok(rows)
    }

    fn package_file(&self, conn: &Connection, cmid: i64) -> Result<Option<StoredFile>> {
        let Some(context) = Context::find_for_module(conn, cmid)? else {
            return Ok(None);
        };
        let files = StoredFile::find_area_files(
            conn,
            context.id,
            COMPONENT_H5PACTIVITY,
            AREA_PACKAGE,
            Some(0),
        )?;
        Ok(files.into_iter().next())
    }
}

/// Render rows as CSV, header first
pub fn to_csv(rows: &[AuditRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_HEADER.iter().copied());
    for row in rows {
        let fields = row.fields();
        push_record(&mut out, fields.iter().map(String::as_str));
    }
    out
}

/// Write rows as CSV to `path`, replacing any existing file
pub fn write_csv(rows: &[AuditRow], path: &Path) -> Result<()> {
    fs::write(path, to_csv(rows))?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn push_record<'s>(out: &mut String, fields: impl Iterator<Item = &'s str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        push_field(out, field);
    }
    out.push('\n');
}

/// Quote the way PHP `fputcsv` does
///
/// A field is enclosed when it holds the delimiter, a quote, a backslash or
/// any of space, tab, CR and LF. Inside the quotes a quote is doubled unless
/// it directly follows a backslash.
fn push_field(out: &mut String, field: &str) {
    if !field.contains([',', '"', '\\', '\n', '\r', '\t', ' ']) {
        out.push_str(field);
        return;
    }

    out.push('"');
    let mut escaped = false;
    for ch in field.chars() {
        if ch == '\\' {
            escaped = true;
        } else if !escaped && ch == '"' {
            out.push('"');
        } else {
            escaped = false;
        }
        out.push(ch);
    }
    out.push('"');
}
