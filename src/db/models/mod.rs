// src/db/models/mod.rs

//! Data models for migratehvp database entities
//!
//! This module defines Rust structs that correspond to database tables
//! and provides methods for creating, reading, updating, and deleting records.

mod contentbank;
mod course;
mod course_module;
mod h5pactivity;
mod hvp;
mod stored_file;

pub use contentbank::{CONTENT_TYPE_H5P, ContentBankContent};
pub use course::{Context, Course};
pub use course_module::{CourseModule, MODULE_H5PACTIVITY, MODULE_HVP};
pub use h5pactivity::H5pActivity;
pub use hvp::{HvpActivity, HvpLibrary};
pub use stored_file::{FileCoordinates, H5P_MIME_TYPE, StoredFile};
