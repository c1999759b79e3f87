// src/filesystem/mod.rs

//! Package byte storage
//!
//! The `files` table records where a package lives (context, component,
//! area, item, path, name); the bytes themselves live in a content-addressable
//! object store, similar to git's object storage.

mod cas;

pub use cas::{CasStore, ContentStore};
