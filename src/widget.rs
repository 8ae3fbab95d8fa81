use std::time::{Duration, Instant};

use anyhow::Result;

use crate::binning::bin_by_day;
use crate::brush::{BrushInterpreter, BrushOutcome};
use crate::chart::{ACTIVITY, ChartHandle, ChartSpec, Gesture, SignalName, TermChart};
use crate::debounce::Debouncer;
use crate::record::EventRecord;

/// Quiet window for `brush_start`: short, so the press registers while the
/// hand is still moving.
pub const START_DEBOUNCE: Duration = Duration::from_millis(10);
/// Quiet window for `brush_end`: long enough to coalesce a burst of
/// drag-move updates into one filter dispatch.
pub const END_DEBOUNCE: Duration = Duration::from_millis(200);

/// Owns the chart instance for the widget's lifetime and keeps what it
/// renders in sync with externally supplied data. Interaction signals flow
/// through per-class debouncers into the brush interpreter; the resolved
/// outcome is handed back to the caller to publish.
pub struct HistogramWidget<C: ChartHandle = TermChart> {
    chart: Option<C>,
    start_debounce: Debouncer<f64>,
    end_debounce: Debouncer<f64>,
    brush: BrushInterpreter,
}

impl HistogramWidget<TermChart> {
    /// Build the chart from the standard layout. The data source is seeded
    /// empty; real rows always arrive asynchronously after the chart
    /// geometry exists.
    pub fn mount() -> Result<Self> {
        Self::mount_with(TermChart::create(ChartSpec::activity_histogram())?)
    }
}

impl<C: ChartHandle> HistogramWidget<C> {
    pub fn mount_with(mut chart: C) -> Result<Self> {
        chart.replace_data(ACTIVITY, Vec::new())?;
        chart.request_redraw();
        Ok(Self {
            chart: Some(chart),
            start_debounce: Debouncer::new(START_DEBOUNCE),
            end_debounce: Debouncer::new(END_DEBOUNCE),
            brush: BrushInterpreter::new(),
        })
    }

    pub fn chart(&self) -> Option<&C> {
        self.chart.as_ref()
    }

    pub fn chart_mut(&mut self) -> Option<&mut C> {
        self.chart.as_mut()
    }

    pub fn is_mounted(&self) -> bool {
        self.chart.is_some()
    }

    /// Rebin the records and replace the chart's entire `activity` source,
    /// then request a redraw. Not a diff: every row is removed and the new
    /// set inserted. Without a mounted chart this is a silent no-op; the
    /// next update simply uses the latest data.
    pub fn update(&mut self, records: &[EventRecord]) -> Result<()> {
        let Some(chart) = self.chart.as_mut() else {
            return Ok(());
        };
        chart.replace_data(ACTIVITY, bin_by_day(records))?;
        chart.request_redraw();
        Ok(())
    }

    /// Route one raw mouse gesture: the chart projects the column through
    /// its inverse x scale and reports which signals fire; the raw values
    /// are recorded on the chart (for draw-time highlighting) and fed to
    /// the per-class debouncers.
    pub fn on_gesture(&mut self, gesture: Gesture, column: u16, now: Instant) {
        let Some(chart) = self.chart.as_mut() else {
            return;
        };
        for (signal, value_ms) in chart.signals_for(gesture, column) {
            chart.set_signal(signal, value_ms);
            chart.request_redraw();
            match signal {
                SignalName::BrushStart => self.start_debounce.signal(value_ms, now),
                SignalName::BrushEnd => self.end_debounce.signal(value_ms, now),
            }
        }
    }

    /// Fire any debouncer whose quiet window has elapsed and run the brush
    /// interpreter on the result. Start is drained before end so a click's
    /// two signals resolve in order even when both are due.
    pub fn poll(&mut self, now: Instant) -> Option<BrushOutcome> {
        if let Some(start_ms) = self.start_debounce.poll(now) {
            self.brush.on_start(start_ms);
        }
        self.end_debounce
            .poll(now)
            .and_then(|end_ms| self.brush.on_end(end_ms))
    }

    /// Earliest pending debounce deadline, for sizing the event-loop wait.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.start_debounce.deadline(), self.end_debounce.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Forget the brush signal values so highlighting returns to the
    /// no-selection state. Used when the filter is cleared from outside.
    pub fn reset_brush(&mut self) {
        if let Some(chart) = self.chart.as_mut() {
            chart.clear_signals();
            chart.request_redraw();
        }
    }

    /// Tear the widget down: cancel pending debounce timers and drop the
    /// chart handle so no timer fires into a disposed instance.
    pub fn unmount(&mut self) {
        self.start_debounce.cancel();
        self.end_debounce.cancel();
        self.chart = None;
    }
}
