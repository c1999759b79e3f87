// src/migrate/selector.rs

//! Selection of legacy activities that still need migrating
//!
//! A legacy activity is migrated iff an `h5pactivity` row shares its
//! (name, course, time_created). Selection is the negation of that, so a
//! repeated run never picks up an activity it already migrated.

use crate::db::models::{H5pActivity, HvpActivity, MODULE_HVP};
use crate::error::{Error, Result};
use rusqlite::{Connection, Row, params_from_iter, types::Value};
use tracing::debug;

/// A legacy activity picked for migration, with the course details used in logs
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleActivity {
    pub hvp_id: i64,
    pub name: String,
    pub course_id: i64,
    pub course_name: String,
    pub main_library_id: i64,
}

impl EligibleActivity {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            hvp_id: row.get(0)?,
            name: row.get(1)?,
            course_id: row.get(2)?,
            course_name: row.get(3)?,
            main_library_id: row.get(4)?,
        })
    }
}

/// Build the FROM/WHERE part shared by the select and count queries
fn eligibility_clause(content_types: &[i64]) -> (String, Vec<Value>) {
    let mut sql = String::from(
        "FROM hvp h
         JOIN courses c ON c.id = h.course_id
         JOIN course_modules cm ON cm.instance_id = h.id
         JOIN modules m ON m.id = cm.module_id AND m.name = ?1
         WHERE cm.deletion_in_progress = 0
           AND NOT EXISTS (
               SELECT 1 FROM h5pactivity hp
               WHERE hp.name = h.name
                 AND hp.course_id = h.course_id
                 AND hp.time_created = h.time_created
           )",
    );
    let mut values = vec![Value::Text(MODULE_HVP.to_string())];

    if !content_types.is_empty() {
        let placeholders: Vec<String> = (0..content_types.len())
            .map(|i| format!("?{}", i + 2))
            .collect();
        sql.push_str(&format!(
            " AND h.main_library_id IN ({})",
            placeholders.join(", ")
        ));
        values.extend(content_types.iter().map(|id| Value::Integer(*id)));
    }

    (sql, values)
}

/// Find up to `limit` legacy activities that have not been migrated yet
///
/// An empty `content_types` means every main library. Results are in
/// ascending legacy ID order.
pub fn find_eligible(
    conn: &Connection,
    content_types: &[i64],
    limit: i64,
) -> Result<Vec<EligibleActivity>> {
    if limit <= 0 {
        return Err(Error::ConfigurationError(format!(
            "limit must be a positive integer (got {limit})"
        )));
    }

    let (clause, mut values) = eligibility_clause(content_types);
    let limit_param = values.len() + 1;
    values.push(Value::Integer(limit));

    let sql = format!(
        "SELECT h.id, h.name, h.course_id, c.fullname, h.main_library_id
         {clause}
         ORDER BY h.id ASC
         LIMIT ?{limit_param}"
    );

    let mut stmt = conn.prepare(&sql)?;
    let activities = stmt
        .query_map(params_from_iter(values), EligibleActivity::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!(
        "Selected {} eligible activities (limit {}, {} content type filters)",
        activities.len(),
        limit,
        content_types.len()
    );
    Ok(activities)
}

/// Count the legacy activities that have not been migrated yet
pub fn count_eligible(conn: &Connection, content_types: &[i64]) -> Result<i64> {
    let (clause, values) = eligibility_clause(content_types);
    let sql = format!("SELECT COUNT(*) {clause}");

    let count = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
    Ok(count)
}

/// Whether a legacy activity already has a migrated counterpart
pub fn is_migrated(conn: &Connection, legacy: &HvpActivity) -> Result<bool> {
    let matches =
        H5pActivity::find_by_correlation(conn, &legacy.name, legacy.course_id, legacy.time_created)?;
    Ok(!matches.is_empty())
}
