// src/db/models/course.rs

//! Course registry and context models
//!
//! Courses own activities. Contexts give courses and course modules the
//! numeric identity that file areas and the content bank are keyed on.

use crate::db::schema::{CONTEXT_COURSE, CONTEXT_MODULE};
use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// A course (the container that owns activities)
#[derive(Debug, Clone)]
pub struct Course {
    pub id: Option<i64>,
    pub shortname: String,
    pub fullname: String,
}

impl Course {
    pub fn new(shortname: String, fullname: String) -> Self {
        Self {
            id: None,
            shortname,
            fullname,
        }
    }

    /// Insert this course into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO courses (shortname, fullname) VALUES (?1, ?2)",
            params![&self.shortname, &self.fullname],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a course by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let course = conn
            .query_row(
                "SELECT id, shortname, fullname FROM courses WHERE id = ?1",
                [id],
                Self::from_row,
            )
            .optional()?;

        Ok(course)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            shortname: row.get(1)?,
            fullname: row.get(2)?,
        })
    }
}

/// A context (course or course module level)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub id: i64,
    pub context_level: i64,
    pub instance_id: i64,
}

impl Context {
    /// Find the context for a given level and instance
    pub fn find(conn: &Connection, context_level: i64, instance_id: i64) -> Result<Option<Self>> {
        let context = conn
            .query_row(
                "SELECT id, context_level, instance_id FROM contexts
                 WHERE context_level = ?1 AND instance_id = ?2",
                params![context_level, instance_id],
                Self::from_row,
            )
            .optional()?;

        Ok(context)
    }

    /// Find the context for a level and instance, creating it if missing
    pub fn find_or_create(conn: &Connection, context_level: i64, instance_id: i64) -> Result<Self> {
        if let Some(context) = Self::find(conn, context_level, instance_id)? {
            return Ok(context);
        }

        conn.execute(
            "INSERT INTO contexts (context_level, instance_id) VALUES (?1, ?2)",
            params![context_level, instance_id],
        )?;

        Ok(Self {
            id: conn.last_insert_rowid(),
            context_level,
            instance_id,
        })
    }

    /// Context of a course
    pub fn for_course(conn: &Connection, course_id: i64) -> Result<Self> {
        Self::find_or_create(conn, CONTEXT_COURSE, course_id)
    }

    /// Context of a course module, if one was ever created
    pub fn find_for_module(conn: &Connection, cmid: i64) -> Result<Option<Self>> {
        Self::find(conn, CONTEXT_MODULE, cmid)
    }

    /// Delete a context row by ID
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("DELETE FROM contexts WHERE id = ?1", [id])?;
        Ok(())
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            context_level: row.get(1)?,
            instance_id: row.get(2)?,
        })
    }
}
