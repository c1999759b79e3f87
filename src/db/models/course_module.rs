// src/db/models/course_module.rs

//! Course module model - places an activity instance inside a course

use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Module name of legacy activities
pub const MODULE_HVP: &str = "hvp";

/// Module name of migrated activities
pub const MODULE_H5PACTIVITY: &str = "h5pactivity";

/// A course module: one activity instance of one module type in one course
#[derive(Debug, Clone)]
pub struct CourseModule {
    pub id: Option<i64>,
    pub course_id: i64,
    pub module_id: i64,
    pub instance_id: i64,
    pub section: i64,
    pub visible: bool,
    pub id_number: Option<String>,
    pub deletion_in_progress: bool,
    /// Unix timestamp the module was added to the course
    pub added: i64,
}

impl CourseModule {
    pub fn new(course_id: i64, module_id: i64, instance_id: i64, added: i64) -> Self {
        Self {
            id: None,
            course_id,
            module_id,
            instance_id,
            section: 0,
            visible: true,
            id_number: None,
            deletion_in_progress: false,
            added,
        }
    }

    /// Resolve a module name ("hvp", "h5pactivity") to its ID
    pub fn module_id(conn: &Connection, module_name: &str) -> Result<i64> {
        conn.query_row(
            "SELECT id FROM modules WHERE name = ?1",
            [module_name],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Module '{module_name}' is not installed")))
    }

    /// Insert this course module into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO course_modules (course_id, module_id, instance_id, section, visible, id_number, deletion_in_progress, added)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.course_id,
                self.module_id,
                self.instance_id,
                self.section,
                self.visible,
                &self.id_number,
                self.deletion_in_progress,
                self.added,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a course module by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let cm = conn
            .query_row(
                "SELECT id, course_id, module_id, instance_id, section, visible, id_number, deletion_in_progress, added
                 FROM course_modules WHERE id = ?1",
                [id],
                Self::from_row,
            )
            .optional()?;

        Ok(cm)
    }

    /// Find the course module of an activity instance
    pub fn find_by_instance(
        conn: &Connection,
        module_name: &str,
        instance_id: i64,
    ) -> Result<Option<Self>> {
        let cm = conn
            .query_row(
                "SELECT cm.id, cm.course_id, cm.module_id, cm.instance_id, cm.section, cm.visible, cm.id_number, cm.deletion_in_progress, cm.added
                 FROM course_modules cm
                 JOIN modules m ON m.id = cm.module_id
                 WHERE m.name = ?1 AND cm.instance_id = ?2",
                params![module_name, instance_id],
                Self::from_row,
            )
            .optional()?;

        Ok(cm)
    }

    /// Show or hide this course module
    pub fn set_visible(&mut self, conn: &Connection, visible: bool) -> Result<()> {
        let id = self.id.ok_or_else(|| {
            Error::InitError("Cannot update course module without ID".to_string())
        })?;

        conn.execute(
            "UPDATE course_modules SET visible = ?1 WHERE id = ?2",
            params![visible, id],
        )?;

        self.visible = visible;
        Ok(())
    }

    /// Delete a course module by ID
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("DELETE FROM course_modules WHERE id = ?1", [id])?;
        Ok(())
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            course_id: row.get(1)?,
            module_id: row.get(2)?,
            instance_id: row.get(3)?,
            section: row.get(4)?,
            visible: row.get(5)?,
            id_number: row.get(6)?,
            deletion_in_progress: row.get(7)?,
            added: row.get(8)?,
        })
    }
}
