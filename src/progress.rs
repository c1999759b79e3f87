// src/progress.rs

//! Batch progress reporting
//!
//! The `ProgressTracker` trait is the hook the batch driver notifies as it
//! works through a selection. `CallbackProgress` forwards events to a
//! closure; the CLI's terminal progress bar lives in the command layer.

use crate::migrate::{EligibleActivity, RecordOutcome};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Core trait for batch progress
///
/// Implementations should be thread-safe (Send + Sync) so a tracker can be
/// shared with a signal handler or another reporting thread.
pub trait ProgressTracker: Send + Sync {
    /// Number of records the batch selected
    fn set_length(&self, length: u64);

    /// A record is about to be processed
    fn record_started(&self, activity: &EligibleActivity);

    /// A record has been processed; advances the position by one
    fn record_finished(&self, activity: &EligibleActivity, outcome: &RecordOutcome);

    /// The batch is over (completed or cancelled)
    fn finish_with_message(&self, message: &str);

    fn position(&self) -> u64;

    fn length(&self) -> u64;

    fn is_finished(&self) -> bool;
}

/// Events emitted by the callback progress tracker
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Started { hvp_id: i64, position: u64, total: u64 },
    Finished { hvp_id: i64, outcome: RecordOutcome },
    Done(String),
}

/// Callback-based progress tracker
pub struct CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    callback: F,
    position: AtomicU64,
    length: AtomicU64,
    finished: AtomicBool,
}

impl<F> CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            position: AtomicU64::new(0),
            length: AtomicU64::new(0),
            finished: AtomicBool::new(false),
        }
    }
}

impl<F> ProgressTracker for CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn set_length(&self, length: u64) {
        self.length.store(length, Ordering::Relaxed);
    }

    fn record_started(&self, activity: &EligibleActivity) {
        (self.callback)(ProgressEvent::Started {
            hvp_id: activity.hvp_id,
            position: self.position.load(Ordering::Relaxed),
            total: self.length.load(Ordering::Relaxed),
        });
    }

    fn record_finished(&self, activity: &EligibleActivity, outcome: &RecordOutcome) {
        self.position.fetch_add(1, Ordering::Relaxed);
        (self.callback)(ProgressEvent::Finished {
            hvp_id: activity.hvp_id,
            outcome: outcome.clone(),
        });
    }

    fn finish_with_message(&self, message: &str) {
        self.finished.store(true, Ordering::Relaxed);
        (self.callback)(ProgressEvent::Done(message.to_string()));
    }

    fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn length(&self) -> u64 {
        self.length.load(Ordering::Relaxed)
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}
