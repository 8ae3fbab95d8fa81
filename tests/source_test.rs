use std::io::Write;
use tempfile::NamedTempFile;

use actigram::source::{FollowSource, load_file};

#[test]
fn test_load_file_parses_fixture() {
    let batch = load_file("testdata/sample_events.jsonl").unwrap();
    assert_eq!(batch.records.len(), 6);
    assert_eq!(batch.skipped, 2);
    assert!(batch.records.iter().all(|r| r.timestamp > 0.0));
}

#[test]
fn test_load_missing_file_errors() {
    assert!(load_file("nonexistent.jsonl").is_err());
}

#[test]
fn test_load_empty_file() {
    let file = NamedTempFile::new().unwrap();
    let batch = load_file(file.path()).unwrap();
    assert!(batch.records.is_empty());
    assert_eq!(batch.skipped, 0);
}

#[test]
fn test_load_large_file() {
    let mut file = NamedTempFile::new().unwrap();
    for i in 0..10_000 {
        writeln!(file, r#"{{"timestamp":{},"message":"event {}"}}"#, 1_700_000_000 + i, i).unwrap();
    }
    let batch = load_file(file.path()).unwrap();
    assert_eq!(batch.records.len(), 10_000);
}

#[test]
fn test_follow_source_reads_appended_records() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"timestamp":1700000000}}"#).unwrap();
    file.flush().unwrap();

    let initial = std::fs::metadata(file.path()).unwrap().len();
    let mut follow = FollowSource::new(file.path(), initial);

    assert!(follow.read_new().unwrap().records.is_empty());

    writeln!(file, r#"{{"timestamp":1700000100}}"#).unwrap();
    writeln!(file, "garbage line").unwrap();
    file.flush().unwrap();

    let batch = follow.read_new().unwrap();
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].timestamp, 1_700_000_100.0);
    assert_eq!(batch.skipped, 1);

    // Nothing new: empty batch.
    assert!(follow.read_new().unwrap().records.is_empty());
}

#[test]
fn test_follow_source_waits_for_complete_lines() {
    let mut file = NamedTempFile::new().unwrap();
    let mut follow = FollowSource::new(file.path(), 0);

    // A writer caught mid-record: no trailing newline yet.
    write!(file, r#"{{"timestamp":17000"#).unwrap();
    file.flush().unwrap();
    assert!(follow.read_new().unwrap().records.is_empty());

    // Once the line completes it is consumed whole.
    writeln!(file, r#"00200}}"#).unwrap();
    file.flush().unwrap();
    let batch = follow.read_new().unwrap();
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].timestamp, 1_700_000_200.0);
}
