// src/db/models/contentbank.rs

//! Content bank entry model

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Content type of H5P packages in the content bank
pub const CONTENT_TYPE_H5P: &str = "contenttype_h5p";

/// An entry in the shared content bank
#[derive(Debug, Clone)]
pub struct ContentBankContent {
    pub id: Option<i64>,
    pub name: String,
    pub content_type: String,
    /// Course context the entry is shared in
    pub context_id: i64,
    pub time_created: i64,
    pub time_modified: i64,
}

impl ContentBankContent {
    pub fn new(name: String, context_id: i64, time_created: i64) -> Self {
        Self {
            id: None,
            name,
            content_type: CONTENT_TYPE_H5P.to_string(),
            context_id,
            time_created,
            time_modified: time_created,
        }
    }

    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO contentbank_content (name, content_type, context_id, time_created, time_modified)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &self.name,
                &self.content_type,
                self.context_id,
                self.time_created,
                self.time_modified,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let content = conn
            .query_row(
                "SELECT id, name, content_type, context_id, time_created, time_modified
                 FROM contentbank_content WHERE id = ?1",
                [id],
                Self::from_row,
            )
            .optional()?;

        Ok(content)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            content_type: row.get(2)?,
            context_id: row.get(3)?,
            time_created: row.get(4)?,
            time_modified: row.get(5)?,
        })
    }
}
