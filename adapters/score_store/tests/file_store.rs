use std::fs;

use asteroids_score_store::{FileScoreStore, ScoreStore, ScoreStoreError};

#[test]
fn missing_file_reads_as_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = FileScoreStore::new(dir.path().join("scores.toml"));

    assert_eq!(store.read_high_score(), 0);
    assert_eq!(store.load().expect("missing file is not an error"), 0);
}

#[test]
fn written_scores_survive_a_new_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("scores.toml");

    FileScoreStore::new(&path).write_high_score(1_250);

    let contents = fs::read_to_string(&path).expect("file written");
    assert_eq!(contents.trim(), "high_score = 1250");
    assert_eq!(FileScoreStore::new(&path).read_high_score(), 1_250);
}

#[test]
fn malformed_file_is_reported_and_read_as_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scores.toml");
    fs::write(&path, "high_score = \"lots\"").expect("seed file");
    let mut store = FileScoreStore::new(&path);

    assert!(matches!(store.load(), Err(ScoreStoreError::Parse { .. })));
    assert_eq!(store.read_high_score(), 0);
}

#[test]
fn failed_writes_are_swallowed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = FileScoreStore::new(dir.path());

    store.write_high_score(10);

    assert!(matches!(store.save(10), Err(ScoreStoreError::Io { .. })));
    assert!(dir.path().is_dir());
}
