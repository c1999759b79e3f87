// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use migratehvp::db;
use migratehvp::db::models::{
    Context, Course, CourseModule, FileCoordinates, HvpActivity, HvpLibrary, MODULE_HVP,
    StoredFile,
};
use migratehvp::db::schema::CONTEXT_MODULE;
use migratehvp::filesystem::{CasStore, ContentStore};
use migratehvp::{Error, Result};
use rusqlite::Connection;
use std::cell::Cell;
use tempfile::TempDir;

/// Creation time given to seeded legacy activities
pub const SEED_TIME: i64 = 1_600_000_000;

/// A database and object store in a temp directory
///
/// Keep the struct alive for the duration of the test to prevent cleanup.
pub struct TestSite {
    pub dir: TempDir,
    pub db_path: String,
    pub conn: Connection,
    pub store: CasStore,
}

pub fn setup_site() -> TestSite {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir
        .path()
        .join("migratehvp.db")
        .to_str()
        .unwrap()
        .to_string();

    db::init(&db_path).unwrap();
    let conn = db::open(&db_path).unwrap();
    let store = CasStore::new(dir.path().join("objects")).unwrap();

    TestSite {
        dir,
        db_path,
        conn,
        store,
    }
}

pub fn add_course(conn: &Connection, fullname: &str) -> i64 {
    let shortname: String = fullname.split_whitespace().collect();
    Course::new(shortname, fullname.to_string())
        .insert(conn)
        .unwrap()
}

pub fn add_library(conn: &Connection, machine_name: &str) -> i64 {
    HvpLibrary::new(machine_name.to_string(), 1, 22)
        .insert(conn)
        .unwrap()
}

/// IDs of everything `seed_hvp` created
#[derive(Debug, Clone, Copy)]
pub struct SeededActivity {
    pub hvp_id: i64,
    pub cmid: i64,
    pub context_id: i64,
    pub package_file_id: i64,
}

/// Seed a legacy activity with its course module, module context and package
pub fn seed_hvp(
    site: &TestSite,
    course_id: i64,
    library_id: i64,
    name: &str,
    json_content: &str,
) -> SeededActivity {
    seed_hvp_at(site, course_id, library_id, name, json_content, SEED_TIME)
}

pub fn seed_hvp_at(
    site: &TestSite,
    course_id: i64,
    library_id: i64,
    name: &str,
    json_content: &str,
    time_created: i64,
) -> SeededActivity {
    let conn = &site.conn;

    let mut hvp = HvpActivity::new(
        course_id,
        name.to_string(),
        json_content.to_string(),
        library_id,
        time_created,
    );
    let hvp_id = hvp.insert(conn).unwrap();

    let module_id = CourseModule::module_id(conn, MODULE_HVP).unwrap();
    let mut cm = CourseModule::new(course_id, module_id, hvp_id, time_created);
    cm.section = 2;
    cm.id_number = Some(format!("hvp-{hvp_id}"));
    let cmid = cm.insert(conn).unwrap();

    let context = Context::find_or_create(conn, CONTEXT_MODULE, cmid).unwrap();
    let content = package_bytes(name);
    let hash = site.store.store(&content).unwrap();

    let file_name = format!("{}.h5p", name.to_lowercase().replace(' ', "-"));
    let coordinates =
        FileCoordinates::new(context.id, "mod_hvp", "package", 0, "/", &file_name);
    let mut file = StoredFile::new(coordinates, hash, content.len() as i64, time_created);
    let package_file_id = file.insert(conn).unwrap();

    SeededActivity {
        hvp_id,
        cmid,
        context_id: context.id,
        package_file_id,
    }
}

/// Fake package content, unique per activity name
pub fn package_bytes(name: &str) -> Vec<u8> {
    format!("PK\x03\x04 h5p package for {name}").into_bytes()
}

/// Insert a placeholder course module so the next one gets `next_cmid`
pub fn reserve_cmid(conn: &Connection, course_id: i64, next_cmid: i64) {
    let module_id = CourseModule::module_id(conn, MODULE_HVP).unwrap();
    conn.execute(
        "INSERT INTO course_modules (id, course_id, module_id, instance_id, section, visible, deletion_in_progress, added)
         VALUES (?1, ?2, ?3, ?4, 0, 1, 0, 0)",
        rusqlite::params![next_cmid - 1, course_id, module_id, 1_000_000 + next_cmid],
    )
    .unwrap();
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

/// A store that accepts a fixed number of writes, then reports it is full
pub struct QuotaStore<'a> {
    pub inner: &'a CasStore,
    pub remaining_writes: Cell<usize>,
}

impl<'a> QuotaStore<'a> {
    pub fn new(inner: &'a CasStore, writes: usize) -> Self {
        Self {
            inner,
            remaining_writes: Cell::new(writes),
        }
    }
}

impl ContentStore for QuotaStore<'_> {
    fn store(&self, content: &[u8]) -> Result<String> {
        let remaining = self.remaining_writes.get();
        if remaining == 0 {
            return Err(Error::IoError("object store quota exceeded".to_string()));
        }
        self.remaining_writes.set(remaining - 1);
        self.inner.store(content)
    }

    fn retrieve(&self, hash: &str) -> Result<Vec<u8>> {
        self.inner.retrieve(hash)
    }

    fn exists(&self, hash: &str) -> bool {
        self.inner.exists(hash)
    }
}
