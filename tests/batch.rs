// tests/batch.rs

//! Batch driver tests: isolation, dry runs, cancellation and selection.

mod common;

use common::{SEED_TIME, add_course, add_library, count_rows, seed_hvp, setup_site};
use migratehvp::migrate::{BatchEntry, RecordOutcome, count_eligible, find_eligible};
use migratehvp::progress::{CallbackProgress, ProgressEvent, ProgressTracker};
use migratehvp::{BatchDriver, BatchRequest, CopyPolicy, Error, RetentionPolicy};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const PARAMS: &str = r#"{"text":"Hello"}"#;

fn execute_request() -> BatchRequest {
    BatchRequest {
        retention: RetentionPolicy::Keep,
        copy: CopyPolicy::LinkedCopy,
        dry_run: false,
        ..BatchRequest::default()
    }
}

fn is_success(entry: &BatchEntry) -> bool {
    matches!(&entry.outcome, RecordOutcome::Migrated(o) if o.success)
}

#[test]
fn test_failure_at_position_three_is_isolated() {
    let mut site = setup_site();
    let course = add_course(&site.conn, "History 200");
    let library = add_library(&site.conn, "H5P.InteractiveVideo");
    for i in 1..=5 {
        let params = if i == 3 { "{\"broken\": " } else { PARAMS };
        seed_hvp(&site, course, library, &format!("Lesson {i}"), params);
    }

    let driver = BatchDriver::new(&site.store);
    let report = driver.run(&mut site.conn, &execute_request()).unwrap();

    assert_eq!(report.processed(), 5);
    assert_eq!(report.succeeded(), 4);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 0);
    assert!(!report.cancelled);

    let successes: Vec<bool> = report.entries.iter().map(is_success).collect();
    assert_eq!(successes, vec![true, true, false, true, true]);
    assert_eq!(report.entries[2].activity.name, "Lesson 3");

    let RecordOutcome::Migrated(failed) = &report.entries[2].outcome else {
        panic!("expected a migration outcome");
    };
    assert!(failed.warnings[0].contains("not valid JSON"));
    assert_eq!(count_rows(&site.conn, "h5pactivity"), 4);

    // The failed activity is still eligible next time
    let remaining = find_eligible(&site.conn, &[], 100).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Lesson 3");
}

#[test]
fn test_dry_run_has_no_effect() {
    let mut site = setup_site();
    let course = add_course(&site.conn, "History 200");
    let library = add_library(&site.conn, "H5P.InteractiveVideo");
    for i in 1..=3 {
        seed_hvp(&site, course, library, &format!("Lesson {i}"), PARAMS);
    }

    let tables = [
        "hvp",
        "h5pactivity",
        "course_modules",
        "contexts",
        "files",
        "contentbank_content",
    ];
    let before: Vec<i64> = tables.iter().map(|t| count_rows(&site.conn, t)).collect();

    let request = BatchRequest {
        dry_run: true,
        retention: RetentionPolicy::Remove,
        copy: CopyPolicy::Copy,
        ..BatchRequest::default()
    };
    let driver = BatchDriver::new(&site.store);
    let report = driver.run(&mut site.conn, &request).unwrap();

    assert_eq!(report.processed(), 3);
    assert_eq!(report.skipped(), 3);
    assert!(report.entries.iter().all(|e| e.outcome == RecordOutcome::Skipped));

    let after: Vec<i64> = tables.iter().map(|t| count_rows(&site.conn, t)).collect();
    assert_eq!(before, after);
    assert_eq!(count_eligible(&site.conn, &[]).unwrap(), 3);
}

#[test]
fn test_empty_selection_is_not_an_error() {
    let mut site = setup_site();
    let driver = BatchDriver::new(&site.store);
    let report = driver.run(&mut site.conn, &execute_request()).unwrap();
    assert!(report.is_empty());
    assert_eq!(report.processed(), 0);
}

#[test]
fn test_invalid_limit_rejected() {
    let mut site = setup_site();
    let driver = BatchDriver::new(&site.store);

    for limit in [0, -3] {
        let request = BatchRequest {
            limit,
            ..execute_request()
        };
        let err = driver.run(&mut site.conn, &request).unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }
}

#[test]
fn test_limit_and_order() {
    let mut site = setup_site();
    let course = add_course(&site.conn, "History 200");
    let library = add_library(&site.conn, "H5P.InteractiveVideo");
    let ids: Vec<i64> = (1..=4)
        .map(|i| seed_hvp(&site, course, library, &format!("Lesson {i}"), PARAMS).hvp_id)
        .collect();

    let request = BatchRequest {
        limit: 2,
        ..execute_request()
    };
    let driver = BatchDriver::new(&site.store);
    let first = driver.run(&mut site.conn, &request).unwrap();
    let first_ids: Vec<i64> = first.entries.iter().map(|e| e.activity.hvp_id).collect();
    assert_eq!(first_ids, ids[..2]);

    let second = driver.run(&mut site.conn, &request).unwrap();
    let second_ids: Vec<i64> = second.entries.iter().map(|e| e.activity.hvp_id).collect();
    assert_eq!(second_ids, ids[2..]);

    assert!(driver.run(&mut site.conn, &request).unwrap().is_empty());
}

#[test]
fn test_content_type_filter() {
    let mut site = setup_site();
    let course = add_course(&site.conn, "History 200");
    let video = add_library(&site.conn, "H5P.InteractiveVideo");
    let quiz = add_library(&site.conn, "H5P.QuestionSet");
    let slides = add_library(&site.conn, "H5P.CoursePresentation");
    seed_hvp(&site, course, video, "Video", PARAMS);
    seed_hvp(&site, course, quiz, "Quiz", PARAMS);
    seed_hvp(&site, course, slides, "Slides", PARAMS);

    assert_eq!(count_eligible(&site.conn, &[quiz, slides]).unwrap(), 2);

    let request = BatchRequest {
        content_types: vec![quiz],
        ..execute_request()
    };
    let driver = BatchDriver::new(&site.store);
    let report = driver.run(&mut site.conn, &request).unwrap();

    assert_eq!(report.processed(), 1);
    assert_eq!(report.entries[0].activity.name, "Quiz");
    assert_eq!(report.entries[0].activity.course_name, "History 200");
}

#[test]
fn test_deletion_in_progress_not_selected() {
    let mut site = setup_site();
    let course = add_course(&site.conn, "History 200");
    let library = add_library(&site.conn, "H5P.InteractiveVideo");
    let doomed = seed_hvp(&site, course, library, "Doomed", PARAMS);
    seed_hvp(&site, course, library, "Kept", PARAMS);

    site.conn
        .execute(
            "UPDATE course_modules SET deletion_in_progress = 1 WHERE id = ?1",
            [doomed.cmid],
        )
        .unwrap();

    let eligible = find_eligible(&site.conn, &[], 100).unwrap();
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].name, "Kept");
}

#[test]
fn test_same_name_different_time_is_distinct() {
    let site = setup_site();
    let course = add_course(&site.conn, "History 200");
    let library = add_library(&site.conn, "H5P.InteractiveVideo");
    seed_hvp(&site, course, library, "Lesson", PARAMS);
    common::seed_hvp_at(&site, course, library, "Lesson", PARAMS, SEED_TIME + 60);

    assert_eq!(count_eligible(&site.conn, &[]).unwrap(), 2);
}

#[test]
fn test_cancellation_between_records() {
    let mut site = setup_site();
    let course = add_course(&site.conn, "History 200");
    let library = add_library(&site.conn, "H5P.InteractiveVideo");
    for i in 1..=4 {
        seed_hvp(&site, course, library, &format!("Lesson {i}"), PARAMS);
    }

    // Request cancellation as soon as the second record finishes
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let finished = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&finished);
    let progress = CallbackProgress::new(move |event| {
        if let ProgressEvent::Finished { .. } = event {
            let mut done = counter.lock().unwrap();
            *done += 1;
            if *done == 2 {
                flag.store(true, Ordering::SeqCst);
            }
        }
    });

    let driver = BatchDriver::new(&site.store)
        .with_progress(&progress)
        .with_cancel_flag(Arc::clone(&cancel));
    let report = driver.run(&mut site.conn, &execute_request()).unwrap();

    assert!(report.cancelled);
    assert_eq!(report.processed(), 2);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.not_started.len(), 2);
    assert!(!report.is_empty());
    assert!(progress.is_finished());

    // Committed records stay committed
    assert_eq!(count_rows(&site.conn, "h5pactivity"), 2);
}

#[test]
fn test_progress_sees_every_record() {
    let mut site = setup_site();
    let course = add_course(&site.conn, "History 200");
    let library = add_library(&site.conn, "H5P.InteractiveVideo");
    for i in 1..=3 {
        seed_hvp(&site, course, library, &format!("Lesson {i}"), PARAMS);
    }

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let progress = CallbackProgress::new(move |event| sink.lock().unwrap().push(event));

    let driver = BatchDriver::new(&site.store).with_progress(&progress);
    driver.run(&mut site.conn, &execute_request()).unwrap();

    assert_eq!(progress.length(), 3);
    assert_eq!(progress.position(), 3);

    let events = events.lock().unwrap();
    // started + finished per record, then done
    assert_eq!(events.len(), 7);
    assert!(matches!(&events[0], ProgressEvent::Started { position: 0, total: 3, .. }));
    assert!(matches!(&events[6], ProgressEvent::Done(summary) if summary.contains("3 succeeded")));
}
