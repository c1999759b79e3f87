// src/migrate/mod.rs

//! Migration of legacy `hvp` activities to `h5pactivity`
//!
//! The pieces run in a fixed order per activity: select, transform and
//! persist the new activity, add its package to the content bank, then
//! dispose of the legacy activity. [`BatchDriver`] runs that sequence over
//! a selection; [`AuditReporter`] reconciles what earlier runs produced.

pub mod audit;
pub mod batch;
pub mod contentbank;
pub mod engine;
pub mod links;
pub mod policy;
pub mod retention;
pub mod selector;
pub mod transform;

pub use audit::{AuditReporter, AuditRow, to_csv, write_csv};
pub use batch::{BatchDriver, BatchEntry, BatchReport, BatchRequest, RecordOutcome};
pub use contentbank::{ContentBankLinker, ContentBankReference};
pub use engine::{MigrationEngine, MigrationOutcome, MigrationState};
pub use links::LinkBuilder;
pub use policy::{CopyPolicy, RetentionPolicy};
pub use retention::{Disposition, RetentionManager};
pub use selector::{EligibleActivity, count_eligible, find_eligible, is_migrated};

/// File component of legacy activity packages
pub const COMPONENT_HVP: &str = "mod_hvp";
/// File component of migrated activity packages
pub const COMPONENT_H5PACTIVITY: &str = "mod_h5pactivity";
/// File component of content bank entries
pub const COMPONENT_CONTENTBANK: &str = "contenttype_h5p";
/// Activity package file area, item 0
pub const AREA_PACKAGE: &str = "package";
/// Content bank file area, item = content id
pub const AREA_PUBLIC: &str = "public";
