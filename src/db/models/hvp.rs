// src/db/models/hvp.rs

//! Legacy activity models
//!
//! An `hvp` row is the legacy interactive content activity. Its main library
//! (the content-type classifier) lives in `hvp_libraries`. Legacy rows are
//! read by the selector and the engine and only ever changed by the
//! retention step.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// A content-type library the legacy activity is authored with
#[derive(Debug, Clone)]
pub struct HvpLibrary {
    pub id: Option<i64>,
    /// Machine name, e.g. "H5P.InteractiveVideo"
    pub machine_name: String,
    pub major_version: i64,
    pub minor_version: i64,
    pub patch_version: i64,
    pub title: String,
}

impl HvpLibrary {
    pub fn new(machine_name: String, major_version: i64, minor_version: i64) -> Self {
        Self {
            id: None,
            machine_name,
            major_version,
            minor_version,
            patch_version: 0,
            title: String::new(),
        }
    }

    /// Insert this library into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO hvp_libraries (machine_name, major_version, minor_version, patch_version, title)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &self.machine_name,
                self.major_version,
                self.minor_version,
                self.patch_version,
                &self.title,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a library by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let library = conn
            .query_row(
                "SELECT id, machine_name, major_version, minor_version, patch_version, title
                 FROM hvp_libraries WHERE id = ?1",
                [id],
                Self::from_row,
            )
            .optional()?;

        Ok(library)
    }

    /// "H5P.InteractiveVideo 1.22"
    pub fn full_name(&self) -> String {
        format!(
            "{} {}.{}",
            self.machine_name, self.major_version, self.minor_version
        )
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            machine_name: row.get(1)?,
            major_version: row.get(2)?,
            minor_version: row.get(3)?,
            patch_version: row.get(4)?,
            title: row.get(5)?,
        })
    }
}

/// A legacy interactive content activity
#[derive(Debug, Clone)]
pub struct HvpActivity {
    pub id: Option<i64>,
    pub course_id: i64,
    pub name: String,
    pub intro: Option<String>,
    pub intro_format: i64,
    /// Content parameters as authored in the legacy editor (JSON object)
    pub json_content: String,
    pub main_library_id: i64,
    /// Bitmask of disabled display options (frame, download, embed, copyright, about)
    pub disable_options: i64,
    pub max_grade: f64,
    /// Unix timestamp; part of the correlation key
    pub time_created: i64,
    pub time_modified: i64,
}

impl HvpActivity {
    pub fn new(
        course_id: i64,
        name: String,
        json_content: String,
        main_library_id: i64,
        time_created: i64,
    ) -> Self {
        Self {
            id: None,
            course_id,
            name,
            intro: None,
            intro_format: 1,
            json_content,
            main_library_id,
            disable_options: 0,
            max_grade: 100.0,
            time_created,
            time_modified: time_created,
        }
    }

    /// Insert this activity into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO hvp (course_id, name, intro, intro_format, json_content, main_library_id, disable_options, max_grade, time_created, time_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                self.course_id,
                &self.name,
                &self.intro,
                self.intro_format,
                &self.json_content,
                self.main_library_id,
                self.disable_options,
                self.max_grade,
                self.time_created,
                self.time_modified,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a legacy activity by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let activity = conn
            .query_row(
                "SELECT id, course_id, name, intro, intro_format, json_content, main_library_id, disable_options, max_grade, time_created, time_modified
                 FROM hvp WHERE id = ?1",
                [id],
                Self::from_row,
            )
            .optional()?;

        Ok(activity)
    }

    /// Delete a legacy activity row by ID
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("DELETE FROM hvp WHERE id = ?1", [id])?;
        Ok(())
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            course_id: row.get(1)?,
            name: row.get(2)?,
            intro: row.get(3)?,
            intro_format: row.get(4)?,
            json_content: row.get(5)?,
            main_library_id: row.get(6)?,
            disable_options: row.get(7)?,
            max_grade: row.get(8)?,
            time_created: row.get(9)?,
            time_modified: row.get(10)?,
        })
    }
}
