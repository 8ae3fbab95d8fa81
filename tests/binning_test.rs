
use std::collections::HashSet;

use actigram::binning::{DayBucket, bin_by_day, day_key_ms};
use test_helpers::*;

#[test]
fn test_counts_sum_to_record_count() {
    let records = records(&[
        local_secs(2024, 1, 15, 8, 30, 0),
        local_secs(2024, 1, 15, 9, 30, 0),
        local_secs(2024, 1, 16, 8, 30, 0),
        local_secs(2024, 2, 1, 23, 59, 59),
    ]);
    let buckets = bin_by_day(&records);
    let total: u64 = buckets.iter().map(|b| b.count_day).sum();
    assert_eq!(total, 4);
}

#[test]
fn test_same_day_records_share_a_bucket() {
    // Two records an hour apart on the same local calendar day, one the
    // day after.
    let records = records(&[
        local_secs(2024, 1, 15, 8, 0, 0),
        local_secs(2024, 1, 15, 9, 0, 0),
        local_secs(2024, 1, 16, 9, 0, 0),
    ]);
    let mut buckets = bin_by_day(&records);
    buckets.sort_by_key(|b| b.day);

    assert_eq!(
        buckets,
        vec![
            DayBucket {
                day: local_midnight_ms(2024, 1, 15),
                count_day: 2
            },
            DayBucket {
                day: local_midnight_ms(2024, 1, 16),
                count_day: 1
            },
        ]
    );
}

#[test]
fn test_bucket_key_is_local_midnight() {
    let key = day_key_ms(local_secs(2024, 3, 10, 15, 45, 30)).unwrap();
    assert_eq!(key, local_midnight_ms(2024, 3, 10));
}

#[test]
fn test_binning_is_idempotent() {
    let records = records(&[
        local_secs(2024, 1, 15, 8, 0, 0),
        local_secs(2024, 1, 15, 20, 0, 0),
        local_secs(2024, 1, 17, 3, 0, 0),
        local_secs(2024, 1, 18, 3, 0, 0),
    ]);
    // Order is unspecified, so compare as unordered sets.
    let first: HashSet<DayBucket> = bin_by_day(&records).into_iter().collect();
    let second: HashSet<DayBucket> = bin_by_day(&records).into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_unseen_days_are_absent_not_zero() {
    let records = records(&[
        local_secs(2024, 1, 15, 12, 0, 0),
        local_secs(2024, 1, 20, 12, 0, 0),
    ]);
    let buckets = bin_by_day(&records);
    assert_eq!(buckets.len(), 2);
    assert!(buckets.iter().all(|b| b.count_day >= 1));
}

#[test]
fn test_empty_records_yield_empty_buckets() {
    assert!(bin_by_day(&[]).is_empty());
}

#[test]
fn test_malformed_timestamps_are_skipped() {
    let mut batch = records(&[local_secs(2024, 1, 15, 12, 0, 0)]);
    batch.push(record(f64::NAN));
    batch.push(record(f64::NEG_INFINITY));
    let buckets = bin_by_day(&batch);
    let total: u64 = buckets.iter().map(|b| b.count_day).sum();
    assert_eq!(total, 1);
}

#[test]
fn test_fractional_seconds_stay_on_their_day() {
    let base = local_secs(2024, 1, 15, 12, 0, 0);
    let buckets = bin_by_day(&records(&[base, base + 0.25, base + 0.75]));
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].count_day, 3);
}
