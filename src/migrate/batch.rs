// src/migrate/batch.rs

//! Batch migration over a selection of legacy activities
//!
//! Records are processed one after another, each end to end. A failing
//! record becomes a failed entry in the report; the loop always moves on.

use super::engine::{MigrationEngine, MigrationOutcome};
use super::policy::{CopyPolicy, RetentionPolicy};
use super::selector::{self, EligibleActivity};
use crate::error::Result;
use crate::filesystem::ContentStore;
use crate::progress::ProgressTracker;
use rusqlite::Connection;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Default number of activities selected per run
pub const DEFAULT_LIMIT: i64 = 100;

/// What a batch run should do
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    /// Main library IDs to restrict the selection to; empty means all
    pub content_types: Vec<i64>,
    pub limit: i64,
    pub retention: RetentionPolicy,
    pub copy: CopyPolicy,
    /// Select and report only
    pub dry_run: bool,
}

impl Default for BatchRequest {
    fn default() -> Self {
        Self {
            content_types: Vec::new(),
            limit: DEFAULT_LIMIT,
            retention: RetentionPolicy::default(),
            copy: CopyPolicy::default(),
            dry_run: true,
        }
    }
}

/// Per-record result of a batch run
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Migrated(MigrationOutcome),
    /// Dry run; the engine was not called
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub activity: EligibleActivity,
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// One entry per processed record, in selection order
    pub entries: Vec<BatchEntry>,
    /// Selected records never started because the run was cancelled
    pub not_started: Vec<EligibleActivity>,
    pub cancelled: bool,
}

impl BatchReport {
    /// Whether the selection found nothing to do
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.not_started.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.entries.len()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Migrated(m) if m.success))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Migrated(m) if !m.success))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Skipped))
    }

    fn count(&self, pred: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Runs the migration engine over a selection
pub struct BatchDriver<'a> {
    engine: MigrationEngine<'a>,
    progress: Option<&'a dyn ProgressTracker>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> BatchDriver<'a> {
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self {
            engine: MigrationEngine::new(store),
            progress: None,
            cancel: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressTracker) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Stop before the next record once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Select eligible activities once and process each of them
    ///
    /// Only selection errors (including an invalid limit) are returned as
    /// `Err`; per-record failures are recorded in the report.
    pub fn run(&self, conn: &mut Connection, request: &BatchRequest) -> Result<BatchReport> {
        let selection = selector::find_eligible(conn, &request.content_types, request.limit)?;
        info!(
            "Selected {} activities (dry run: {}, retention: {}, copy: {})",
            selection.len(),
            request.dry_run,
            request.retention,
            request.copy
        );

        if let Some(progress) = self.progress {
            progress.set_length(selection.len() as u64);
        }

        let mut report = BatchReport::default();

        for (index, activity) in selection.iter().enumerate() {
            if self.cancelled() {
                warn!("Batch cancelled before hvp {}", activity.hvp_id);
                report.cancelled = true;
                report.not_started = selection[index..].to_vec();
                break;
            }

            if let Some(progress) = self.progress {
                progress.record_started(activity);
            }

            let outcome = if request.dry_run {
                RecordOutcome::Skipped
            } else {
                let outcome = self
                    .engine
                    .try_migrate(conn, activity.hvp_id, request.retention, request.copy)
                    .unwrap_or_else(|err| {
                        warn!("hvp {} failed: {}", activity.hvp_id, err);
                        MigrationOutcome::failed(activity.hvp_id, &err)
                    });
                RecordOutcome::Migrated(outcome)
            };

            if let Some(progress) = self.progress {
                progress.record_finished(activity, &outcome);
            }
            report.entries.push(BatchEntry {
                activity: activity.clone(),
                outcome,
            });
        }

        let summary = format!(
            "{} processed, {} succeeded, {} failed, {} skipped",
            report.processed(),
            report.succeeded(),
            report.failed(),
            report.skipped()
        );
        info!("Batch finished: {}", summary);
        if let Some(progress) = self.progress {
            progress.finish_with_message(&summary);
        }

        Ok(report)
    }
}
