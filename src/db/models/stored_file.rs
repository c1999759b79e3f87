// src/db/models/stored_file.rs

//! File area model
//!
//! A stored file is addressed by (context, component, area, item, path, name)
//! and points at its bytes in the object store by content hash. Rows are
//! never rewritten in place; copying a file means inserting a new row.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

const SELECT_COLUMNS: &str = "SELECT id, content_hash, context_id, component, file_area, item_id, file_path, file_name, file_size, mime_type, reference_file_id, time_created FROM files";

/// Mime type of an H5P package
pub const H5P_MIME_TYPE: &str = "application/zip.h5p";

/// Where a file lives, independent of its bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoordinates {
    pub context_id: i64,
    pub component: String,
    pub file_area: String,
    pub item_id: i64,
    pub file_path: String,
    pub file_name: String,
}

impl FileCoordinates {
    pub fn new(
        context_id: i64,
        component: &str,
        file_area: &str,
        item_id: i64,
        file_path: &str,
        file_name: &str,
    ) -> Self {
        Self {
            context_id,
            component: component.to_string(),
            file_area: file_area.to_string(),
            item_id,
            file_path: file_path.to_string(),
            file_name: file_name.to_string(),
        }
    }
}

/// A file row
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: Option<i64>,
    pub content_hash: String,
    pub coordinates: FileCoordinates,
    pub file_size: i64,
    pub mime_type: Option<String>,
    /// Set when this file is an alias of another file (content bank link)
    pub reference_file_id: Option<i64>,
    pub time_created: i64,
}

impl StoredFile {
    pub fn new(
        coordinates: FileCoordinates,
        content_hash: String,
        file_size: i64,
        time_created: i64,
    ) -> Self {
        Self {
            id: None,
            content_hash,
            coordinates,
            file_size,
            mime_type: Some(H5P_MIME_TYPE.to_string()),
            reference_file_id: None,
            time_created,
        }
    }

    /// Insert this file into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        let c = &self.coordinates;
        conn.execute(
            "INSERT INTO files (content_hash, context_id, component, file_area, item_id, file_path, file_name, file_size, mime_type, reference_file_id, time_created)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                &self.content_hash,
                c.context_id,
                &c.component,
                &c.file_area,
                c.item_id,
                &c.file_path,
                &c.file_name,
                self.file_size,
                &self.mime_type,
                self.reference_file_id,
                self.time_created,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a file by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let file = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                Self::from_row,
            )
            .optional()?;

        Ok(file)
    }

    /// List the files of an area, ordered by item and ID
    ///
    /// `item_id = None` lists every item of the area.
    pub fn find_area_files(
        conn: &Connection,
        context_id: i64,
        component: &str,
        file_area: &str,
        item_id: Option<i64>,
    ) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS}
             WHERE context_id = ?1 AND component = ?2 AND file_area = ?3
               AND (?4 IS NULL OR item_id = ?4)
             ORDER BY item_id, id"
        ))?;

        let files = stmt
            .query_map(
                params![context_id, component, file_area, item_id],
                Self::from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(files)
    }

    /// Point this file at another file (make it an alias)
    pub fn set_reference(conn: &Connection, id: i64, reference_file_id: i64) -> Result<()> {
        conn.execute(
            "UPDATE files SET reference_file_id = ?1 WHERE id = ?2",
            params![reference_file_id, id],
        )?;
        Ok(())
    }

    /// Delete every file of a context; returns the number of rows removed
    pub fn delete_by_context(conn: &Connection, context_id: i64) -> Result<usize> {
        let removed = conn.execute("DELETE FROM files WHERE context_id = ?1", [context_id])?;
        Ok(removed)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            content_hash: row.get(1)?,
            coordinates: FileCoordinates {
                context_id: row.get(2)?,
                component: row.get(3)?,
                file_area: row.get(4)?,
                item_id: row.get(5)?,
                file_path: row.get(6)?,
                file_name: row.get(7)?,
            },
            file_size: row.get(8)?,
            mime_type: row.get(9)?,
            reference_file_id: row.get(10)?,
            time_created: row.get(11)?,
        })
    }
}
