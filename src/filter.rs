use crate::brush::BrushOutcome;
use crate::record::EventRecord;

/// An inclusive time window in epoch seconds, always ordered ascending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeFilter {
    pub from: f64,
    pub to: f64,
}

impl TimeFilter {
    /// Build from the two brush endpoints (epoch millis, either order).
    pub fn from_brush_millis(a_ms: f64, b_ms: f64) -> Self {
        Self {
            from: a_ms.min(b_ms) / 1000.0,
            to: a_ms.max(b_ms) / 1000.0,
        }
    }

    pub fn contains(&self, timestamp_secs: f64) -> bool {
        timestamp_secs >= self.from && timestamp_secs <= self.to
    }
}

/// The shared-state seam the histogram publishes into. The widget only
/// ever writes; whoever owns the store decides what the filter means.
pub trait FilterSink {
    /// Replace the active time filter wholesale. `None` clears it. Calls
    /// never merge with the previous filter.
    fn set_time_filter(&mut self, filter: Option<TimeFilter>);
}

/// Forward a resolved brush outcome to the store as a single
/// filter-replacement command.
pub fn publish(outcome: BrushOutcome, sink: &mut dyn FilterSink) {
    match outcome {
        BrushOutcome::Reset => sink.set_time_filter(None),
        BrushOutcome::Selected(filter) => sink.set_time_filter(Some(filter)),
    }
}

/// The dashboard's store for the active time filter.
#[derive(Debug, Default)]
pub struct FilterStore {
    time_filter: Option<TimeFilter>,
}

impl FilterStore {
    pub fn time_filter(&self) -> Option<TimeFilter> {
        self.time_filter
    }
}

impl FilterSink for FilterStore {
    fn set_time_filter(&mut self, filter: Option<TimeFilter>) {
        self.time_filter = filter;
    }
}

/// Indices of records inside the filter window; every record when no
/// filter is active.
pub fn filter_records(records: &[EventRecord], filter: Option<TimeFilter>) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.is_none_or(|f| f.contains(record.timestamp)))
        .map(|(i, _)| i)
        .collect()
}
