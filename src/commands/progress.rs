// src/commands/progress.rs
//! Terminal output for batch migrations
//!
//! Prints one block per activity and keeps an overall progress bar below
//! the output. Lines are printed with the bar suspended so they still reach
//! stdout when the bar is hidden (no terminal, e.g. under cron).

use indicatif::{ProgressBar, ProgressStyle};
use migratehvp::migrate::{EligibleActivity, RecordOutcome};
use migratehvp::progress::ProgressTracker;

pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{msg} ({pos}/{len}) [{bar:40.green/dim}] {percent}%")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.set_message("Migrating");
        Self { bar }
    }

    fn print(&self, line: &str) {
        self.bar.suspend(|| println!("{line}"));
    }
}

impl ProgressTracker for BatchProgress {
    fn set_length(&self, length: u64) {
        self.bar.set_length(length);
    }

    fn record_started(&self, activity: &EligibleActivity) {
        self.print(&format!(
            "Migrating ID:{}\t{}\t course:{}\t{}",
            activity.hvp_id, activity.name, activity.course_id, activity.course_name
        ));
    }

    fn record_finished(&self, _activity: &EligibleActivity, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Skipped => self.print("\t ...Skipping\n"),
            RecordOutcome::Migrated(result) if !result.success => {
                for message in &result.warnings {
                    self.print(&format!("\tException: {message}\n"));
                }
                self.print("\t ...Failed!\n");
            }
            RecordOutcome::Migrated(result) if result.warnings.is_empty() => {
                self.print("\t ...Successful\n");
            }
            RecordOutcome::Migrated(result) => {
                for message in &result.warnings {
                    self.print(&format!("\t ...{message}\n"));
                }
            }
        }
        self.bar.inc(1);
    }

    fn finish_with_message(&self, message: &str) {
        self.bar.finish_and_clear();
        self.print(message);
    }

    fn position(&self) -> u64 {
        self.bar.position()
    }

    fn length(&self) -> u64 {
        self.bar.length().unwrap_or(0)
    }

    fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}
