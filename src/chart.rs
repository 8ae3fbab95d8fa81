use anyhow::{Result, ensure};
use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};
use serde::{Deserialize, Serialize};

use crate::binning::{DAY_MS, DayBucket};

/// Name of the data source the bar marks draw from. Part of the layout
/// contract shared with the host dashboard.
pub const ACTIVITY: &str = "activity";

/// The two interaction signals the layout binds to mouse gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalName {
    BrushStart,
    BrushEnd,
}

impl SignalName {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalName::BrushStart => "brush_start",
            SignalName::BrushEnd => "brush_end",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "brush_start" => Some(SignalName::BrushStart),
            "brush_end" => Some(SignalName::BrushEnd),
            _ => None,
        }
    }
}

/// Mouse gesture classes the signal streams can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    MouseDown,
    MouseDrag,
}

/// Declarative layout for the activity histogram. This document is
/// configuration, not behavior: the renderer honors the names it declares
/// and the synchronizer consumes it verbatim. Signal names
/// `brush_start`/`brush_end`, the `activity` source, and the
/// `day`/`count_day` fields are a fixed contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Preferred height of the chart pane, in terminal rows (borders and
    /// axis row included).
    pub height: u16,
    /// Horizontal padding inside the plot, in columns (left, right).
    pub padding: (u16, u16),
    /// Interaction signals and the gesture streams that feed them.
    pub signals: Vec<SignalSpec>,
    /// Named data sources the marks draw from.
    pub data: Vec<DataSpec>,
    /// X axis time scale.
    pub x_scale: ScaleSpec,
    /// Mark styling for the two layers.
    pub marks: MarkSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSpec {
    pub name: String,
    pub on: Vec<Gesture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSpec {
    pub name: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScaleSpec {
    /// Fixed domain in epoch millis. `None` fits the domain to the data.
    pub domain: Option<(i64, i64)>,
}

/// Colors for the selection band and the bars. Bar fill is conditional:
/// `bar_highlight` when the bucket's day is inside the brush (or no brush
/// span is active), `bar_fill` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkSpec {
    pub band_fill: String,
    pub bar_fill: String,
    pub bar_highlight: String,
}

impl ChartSpec {
    /// The layout the dashboard embeds: a 10-row pane, both brush signals
    /// wired the way the gesture streams demand (`brush_end` also fires on
    /// the press, so a motionless click yields equal endpoints), and a
    /// data-fitted time domain.
    pub fn activity_histogram() -> Self {
        Self {
            height: 10,
            padding: (1, 1),
            signals: vec![
                SignalSpec {
                    name: SignalName::BrushStart.as_str().to_string(),
                    on: vec![Gesture::MouseDown],
                },
                SignalSpec {
                    name: SignalName::BrushEnd.as_str().to_string(),
                    on: vec![Gesture::MouseDown, Gesture::MouseDrag],
                },
            ],
            data: vec![DataSpec {
                name: ACTIVITY.to_string(),
                fields: vec!["day".to_string(), "count_day".to_string()],
            }],
            x_scale: ScaleSpec { domain: None },
            marks: MarkSpec {
                band_fill: "green".to_string(),
                bar_fill: "steelblue".to_string(),
                bar_highlight: "red".to_string(),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.data.iter().any(|d| d.name == ACTIVITY),
            "chart layout is missing the '{ACTIVITY}' data source"
        );
        for signal in [SignalName::BrushStart, SignalName::BrushEnd] {
            ensure!(
                self.signals.iter().any(|s| s.name == signal.as_str()),
                "chart layout is missing the '{}' signal",
                signal.as_str()
            );
        }
        ensure!(self.height >= 4, "chart pane too short to draw bars");
        Ok(())
    }
}

/// Linear mapping between an epoch-millis domain and a column range.
#[derive(Debug, Clone, Copy)]
pub struct TimeScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl TimeScale {
    /// A degenerate domain (single day, or inverted) is widened to one day
    /// so the inverse transform stays defined.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let domain = if domain.1 > domain.0 {
            domain
        } else {
            (domain.0, domain.0 + DAY_MS as f64)
        };
        Self { domain, range }
    }

    /// Project an epoch-millis instant onto the column range.
    pub fn project(&self, ms: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        let t = (ms - self.domain.0) / span;
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Inverse transform: a column back to epoch millis, with the column
    /// clamped to the range first.
    pub fn invert(&self, column: f64) -> f64 {
        let width = self.range.1 - self.range.0;
        if width <= 0.0 {
            return self.domain.0;
        }
        let clamped = column.clamp(self.range.0, self.range.1);
        let t = (clamped - self.range.0) / width;
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

/// Raw values of the two brush signals, epoch millis. Updated on every
/// mouse event, before any debouncing, and re-read at draw time to decide
/// bar highlighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalValues {
    pub brush_start: Option<f64>,
    pub brush_end: Option<f64>,
}

/// The narrow seam between the render synchronizer and whatever engine
/// draws the chart. Only the data and signal surface crosses it; rendering
/// internals stay behind it.
pub trait ChartHandle {
    /// Remove every row of the named source and insert `rows` in its
    /// place. No partial diffing.
    fn replace_data(&mut self, source: &str, rows: Vec<DayBucket>) -> Result<()>;

    /// Ask for a redraw without tearing the chart down.
    fn request_redraw(&mut self);

    /// Record a raw signal value; drives draw-time highlighting.
    fn set_signal(&mut self, signal: SignalName, value_ms: f64);

    /// Forget recorded signal values (e.g. when the host clears the
    /// filter from outside the brush).
    fn clear_signals(&mut self);

    /// Which signals a gesture at `column` produces, with the column
    /// already projected through the inverse x scale. Invoked once per raw
    /// mouse event, before any debouncing.
    fn signals_for(&self, gesture: Gesture, column: u16) -> Vec<(SignalName, f64)>;
}

/// Terminal renderer for the activity histogram: day bars, a selection
/// band while a brush span is active, and an x axis of local dates.
pub struct TermChart {
    spec: ChartSpec,
    rows: Vec<DayBucket>,
    signals: SignalValues,
    scale: TimeScale,
    plot: Rect,
    dirty: bool,
}

impl TermChart {
    pub fn create(spec: ChartSpec) -> Result<Self> {
        spec.validate()?;
        let domain = initial_domain(&spec);
        Ok(Self {
            spec,
            rows: Vec::new(),
            signals: SignalValues::default(),
            scale: TimeScale::new(domain, (0.0, 0.0)),
            plot: Rect::ZERO,
            dirty: true,
        })
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn signals(&self) -> SignalValues {
        self.signals
    }

    pub fn preferred_height(&self) -> u16 {
        self.spec.height
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    /// True when the position lies inside the last drawn plot region.
    /// Before the first draw the plot is empty and nothing hits.
    pub fn hit(&self, column: u16, row: u16) -> bool {
        self.plot.contains(Position::new(column, row))
    }

    fn domain(&self) -> (f64, f64) {
        if let Some((from, to)) = self.spec.x_scale.domain {
            return (from as f64, to as f64);
        }
        let min = self.rows.iter().map(|b| b.day).min();
        let max = self.rows.iter().map(|b| b.day).max();
        match (min, max) {
            // Extend past the last midnight so the final day has width.
            (Some(min), Some(max)) => (min as f64, (max + DAY_MS) as f64),
            _ => {
                let now = Utc::now().timestamp_millis();
                ((now - 30 * DAY_MS) as f64, now as f64)
            }
        }
    }

    /// The conditional-fill test for one bar: inside the brush span, or no
    /// span is active (equal or unset endpoints highlight everything).
    fn bar_highlighted(&self, day_ms: f64) -> bool {
        match (self.signals.brush_start, self.signals.brush_end) {
            (Some(start), Some(end)) if start != end => {
                day_ms >= start.min(end) && day_ms <= start.max(end)
            }
            _ => true,
        }
    }

    /// Draw into `area` and remember the plot geometry for hit-testing and
    /// the inverse transform. Re-reads the signal values, so highlighting
    /// is always current without the synchronizer recomputing anything.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("activity");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.dirty = false;
        if inner.height < 2 || inner.width <= self.spec.padding.0 + self.spec.padding.1 {
            self.plot = Rect::ZERO;
            return;
        }

        // Bottom row of the pane is the x axis; the rest is the plot.
        let plot = Rect {
            x: inner.x + self.spec.padding.0,
            y: inner.y,
            width: inner.width - self.spec.padding.0 - self.spec.padding.1,
            height: inner.height - 1,
        };
        self.plot = plot;
        self.scale = TimeScale::new(
            self.domain(),
            (plot.x as f64, (plot.x + plot.width - 1) as f64),
        );

        let band = resolve_color(&self.spec.marks.band_fill);
        let fill = resolve_color(&self.spec.marks.bar_fill);
        let highlight = resolve_color(&self.spec.marks.bar_highlight);
        let buf = frame.buffer_mut();

        // Selection band behind the bars, only while a span is active.
        if let (Some(start), Some(end)) = (self.signals.brush_start, self.signals.brush_end)
            && start != end
        {
            let a = self.scale.project(start.min(end)).round() as i64;
            let b = self.scale.project(start.max(end)).round() as i64;
            for col in a.max(plot.x as i64)..=b.min((plot.x + plot.width - 1) as i64) {
                for row in plot.y..plot.y + plot.height {
                    buf[(col as u16, row)].set_bg(band);
                }
            }
        }

        // Fold buckets onto columns; narrow panes can map several days to
        // one column.
        let mut columns: Vec<(u64, bool)> = vec![(0, false); plot.width as usize];
        for bucket in &self.rows {
            let col = self.scale.project(bucket.day as f64).round();
            let idx = (col - plot.x as f64) as i64;
            if let Some(slot) = usize::try_from(idx).ok().and_then(|i| columns.get_mut(i)) {
                slot.0 += bucket.count_day;
                slot.1 |= self.bar_highlighted(bucket.day as f64);
            }
        }

        let peak = columns.iter().map(|(count, _)| *count).max().unwrap_or(0);
        if peak > 0 {
            for (i, &(count, highlighted)) in columns.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let full = plot.height as u64;
                let cells = ((count * full).div_ceil(peak)).clamp(1, full) as u16;
                let color = if highlighted { highlight } else { fill };
                let col = plot.x + i as u16;
                for dy in 0..cells {
                    buf[(col, plot.y + plot.height - 1 - dy)]
                        .set_symbol("█")
                        .set_fg(color);
                }
            }
        }

        self.render_axis(frame, inner);
    }

    fn render_axis(&self, frame: &mut Frame, inner: Rect) {
        let axis_y = inner.y + inner.height - 1;
        let (from, to) = self.scale.domain();
        let style = Style::default().fg(Color::DarkGray);
        let left = format_axis_day(from);
        let right = format_axis_day(to);
        let buf = frame.buffer_mut();
        buf.set_string(inner.x, axis_y, &left, style);
        if inner.width as usize > left.len() + right.len() + 1 {
            buf.set_string(
                inner.x + inner.width - right.len() as u16,
                axis_y,
                &right,
                style,
            );
        }
    }
}

impl ChartHandle for TermChart {
    fn replace_data(&mut self, source: &str, rows: Vec<DayBucket>) -> Result<()> {
        ensure!(
            self.spec.data.iter().any(|d| d.name == source),
            "unknown data source '{source}'"
        );
        self.rows = rows;
        Ok(())
    }

    fn request_redraw(&mut self) {
        self.dirty = true;
    }

    fn set_signal(&mut self, signal: SignalName, value_ms: f64) {
        match signal {
            SignalName::BrushStart => self.signals.brush_start = Some(value_ms),
            SignalName::BrushEnd => self.signals.brush_end = Some(value_ms),
        }
    }

    fn clear_signals(&mut self) {
        self.signals = SignalValues::default();
    }

    fn signals_for(&self, gesture: Gesture, column: u16) -> Vec<(SignalName, f64)> {
        if self.plot.width == 0 {
            return Vec::new();
        }
        let value_ms = self.scale.invert(column as f64);
        self.spec
            .signals
            .iter()
            .filter(|s| s.on.contains(&gesture))
            .filter_map(|s| SignalName::from_name(&s.name))
            .map(|name| (name, value_ms))
            .collect()
    }
}

fn initial_domain(spec: &ChartSpec) -> (f64, f64) {
    match spec.x_scale.domain {
        Some((from, to)) => (from as f64, to as f64),
        None => {
            let now = Utc::now().timestamp_millis();
            ((now - 30 * DAY_MS) as f64, now as f64)
        }
    }
}

fn format_axis_day(ms: f64) -> String {
    match DateTime::from_timestamp_millis(ms as i64) {
        Some(utc) => utc.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

fn resolve_color(name: &str) -> Color {
    match name {
        "red" => Color::Red,
        "green" => Color::Green,
        "steelblue" => Color::Blue,
        "yellow" => Color::Yellow,
        _ => Color::Gray,
    }
}
