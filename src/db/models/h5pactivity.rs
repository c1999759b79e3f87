// src/db/models/h5pactivity.rs

//! Migrated activity model
//!
//! An `h5pactivity` row is created exactly once per legacy activity. Its
//! (name, course, time_created) triple is copied verbatim from the legacy
//! row and is the only link back to it.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

const SELECT_COLUMNS: &str = "SELECT id, course_id, name, intro, intro_format, grade, display_options, enable_tracking, time_created, time_modified FROM h5pactivity";

/// A new-format activity
#[derive(Debug, Clone, PartialEq)]
pub struct H5pActivity {
    pub id: Option<i64>,
    pub course_id: i64,
    pub name: String,
    pub intro: Option<String>,
    pub intro_format: i64,
    /// Maximum grade (0 = not graded)
    pub grade: i64,
    /// Bitmask of disabled display options
    pub display_options: i64,
    pub enable_tracking: bool,
    pub time_created: i64,
    pub time_modified: i64,
}

impl H5pActivity {
    /// Insert this activity into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO h5pactivity (course_id, name, intro, intro_format, grade, display_options, enable_tracking, time_created, time_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                self.course_id,
                &self.name,
                &self.intro,
                self.intro_format,
                self.grade,
                self.display_options,
                self.enable_tracking,
                self.time_created,
                self.time_modified,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find an activity by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let activity = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                Self::from_row,
            )
            .optional()?;

        Ok(activity)
    }

    /// Find all activities sharing a correlation key
    pub fn find_by_correlation(
        conn: &Connection,
        name: &str,
        course_id: i64,
        time_created: i64,
    ) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE name = ?1 AND course_id = ?2 AND time_created = ?3 ORDER BY id"
        ))?;

        let activities = stmt
            .query_map(params![name, course_id, time_created], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(activities)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            course_id: row.get(1)?,
            name: row.get(2)?,
            intro: row.get(3)?,
            intro_format: row.get(4)?,
            grade: row.get(5)?,
            display_options: row.get(6)?,
            enable_tracking: row.get(7)?,
            time_created: row.get(8)?,
            time_modified: row.get(9)?,
        })
    }
}
