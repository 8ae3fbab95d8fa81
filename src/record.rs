use chrono::{DateTime, Local};
use serde_json::{Map, Value};

/// A single timestamped event. `timestamp` is Unix epoch seconds
/// (fractional allowed). Everything else the line carried rides along as
/// opaque payload; nothing in the pipeline interprets it beyond display.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub timestamp: f64,
    pub payload: Map<String, Value>,
}

impl EventRecord {
    /// One-line summary for the event list pane. Prefers a `message`-like
    /// payload field, falls back to compact JSON.
    pub fn summary(&self) -> String {
        for key in ["message", "msg", "name", "user"] {
            if let Some(Value::String(s)) = self.payload.get(key) {
                return s.clone();
            }
        }
        Value::Object(self.payload.clone()).to_string()
    }
}

/// Result of parsing a batch of raw lines: the records that made it, and
/// how many lines were dropped (not JSON, or no usable timestamp).
#[derive(Debug, Default)]
pub struct ParsedBatch {
    pub records: Vec<EventRecord>,
    pub skipped: usize,
}

/// Parse JSON-lines input into event records. A malformed line never
/// aborts the batch; it is counted and skipped.
pub fn parse_batch<I, S>(lines: I) -> ParsedBatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = ParsedBatch::default();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        match parse_record(line) {
            Some(record) => batch.records.push(record),
            None => batch.skipped += 1,
        }
    }
    batch
}

/// Parse one JSON object into an event record. The timestamp is looked up
/// under `properties._timestamp` (the upstream feature shape), then
/// top-level `_timestamp`, then `timestamp`. Returns `None` when the line
/// is not a JSON object or no finite numeric timestamp is found.
pub fn parse_record(raw: &str) -> Option<EventRecord> {
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(raw) else {
        return None;
    };
    let timestamp = extract_timestamp(&obj)?;
    Some(EventRecord {
        timestamp,
        payload: obj,
    })
}

fn extract_timestamp(obj: &Map<String, Value>) -> Option<f64> {
    if let Some(Value::Object(props)) = obj.get("properties")
        && let Some(ts) = props.get("_timestamp").and_then(numeric)
    {
        return Some(ts);
    }
    obj.get("_timestamp")
        .or_else(|| obj.get("timestamp"))
        .and_then(numeric)
}

fn numeric(value: &Value) -> Option<f64> {
    value.as_f64().filter(|ts| ts.is_finite())
}

/// Format an epoch-seconds timestamp for display, in local time.
pub fn format_timestamp(timestamp_secs: f64) -> String {
    let secs = timestamp_secs.floor() as i64;
    match DateTime::from_timestamp(secs, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => format!("@{timestamp_secs}"),
    }
}
