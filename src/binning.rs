use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::record::EventRecord;

/// Number of milliseconds in one day, for widening degenerate domains.
pub const DAY_MS: i64 = 86_400_000;

/// One calendar day's worth of activity. `day` is the epoch-millis instant
/// of local midnight; `count_day` is how many records fell on that day.
/// Field names are part of the chart data contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayBucket {
    pub day: i64,
    pub count_day: u64,
}

/// Truncate an epoch-seconds timestamp to its local midnight, as epoch
/// millis. Non-finite timestamps (and timestamps outside chrono's range)
/// have no day.
pub fn day_key_ms(timestamp_secs: f64) -> Option<i64> {
    if !timestamp_secs.is_finite() {
        return None;
    }
    let secs = timestamp_secs.floor() as i64;
    let nanos = ((timestamp_secs - secs as f64) * 1e9) as u32;
    let utc = DateTime::from_timestamp(secs, nanos)?;
    let midnight = utc.with_timezone(&Local).date_naive().and_hms_opt(0, 0, 0)?;
    // DST shifts can make local midnight ambiguous or skip it entirely;
    // take the earliest instant that exists on that date.
    let day = Local.from_local_datetime(&midnight).earliest()?;
    Some(day.timestamp_millis())
}

/// Aggregate records into per-day counts. The mapping is rebuilt from
/// scratch on every call and never merged with a prior cycle, so keys are
/// unique and absent days simply do not appear. Bucket order is
/// unspecified. Records without a resolvable day are skipped.
pub fn bin_by_day(records: &[EventRecord]) -> Vec<DayBucket> {
    let mut bins: HashMap<i64, u64> = HashMap::new();
    for record in records {
        if let Some(day) = day_key_ms(record.timestamp) {
            *bins.entry(day).or_insert(0) += 1;
        }
    }
    bins.into_iter()
        .map(|(day, count_day)| DayBucket { day, count_day })
        .collect()
}
