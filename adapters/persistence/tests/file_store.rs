use std::fs;

use tempfile::TempDir;
use tron_rider_core::ScoreStore;
use tron_rider_persistence::{FileScoreStore, PersistenceError};

fn store_in(dir: &TempDir) -> FileScoreStore {
    FileScoreStore::new(dir.path().join("highscore.txt"))
}

#[test]
fn missing_record_reads_as_zero() {
    let dir = TempDir::new().expect("temp dir");
    let store = store_in(&dir);
    assert_eq!(store.load_best_score(), 0);
}

#[test]
fn corrupt_record_reads_as_zero_and_is_replaced() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = store_in(&dir);
    fs::write(store.path(), "not a number").expect("seed corrupt record");

    assert_eq!(store.load_best_score(), 0);
    assert!(store.save_best_score(3).expect("save should succeed"));
    assert_eq!(fs::read_to_string(store.path()).expect("record"), "3");
}

#[test]
fn only_improvements_are_written() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = store_in(&dir);

    assert!(store.save_best_score(50).expect("first save"));
    assert!(!store.save_best_score(30).expect("lower score"));
    assert_eq!(store.load_best_score(), 50);
    assert!(store.save_best_score(80).expect("higher score"));
    assert_eq!(store.load_best_score(), 80);
    assert!(!store.save_best_score(80).expect("equal score"));
}

#[test]
fn save_rereads_record_written_elsewhere() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = store_in(&dir);
    assert!(store.save_best_score(10).expect("initial save"));

    fs::write(store.path(), "  95\n").expect("external update");
    assert!(!store.save_best_score(60).expect("stale candidate"));
    assert_eq!(store.load_best_score(), 95);
}

#[test]
fn no_staging_file_is_left_behind() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = store_in(&dir);
    assert!(store.save_best_score(7).expect("save"));

    let entries: Vec<_> = fs::read_dir(dir.path())
        .expect("list dir")
        .map(|entry| entry.expect("entry").file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("highscore.txt")]);
}

#[test]
fn unwritable_location_reports_error() {
    let dir = TempDir::new().expect("temp dir");
    let mut store = FileScoreStore::new(dir.path().join("missing").join("highscore.txt"));

    let error = store
        .save_best_score(5)
        .expect_err("parent directory does not exist");
    assert!(matches!(error, PersistenceError::Write { .. }));
    assert_eq!(store.load_best_score(), 0);
}
