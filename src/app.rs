use std::time::Instant;

use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::chart::Gesture;
use crate::filter::{FilterSink, FilterStore, TimeFilter, filter_records, publish};
use crate::record::{EventRecord, ParsedBatch};
use crate::widget::HistogramWidget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
}

/// Dashboard state: the record set, the shared filter store, the histogram
/// widget, and the event-list viewport. The widget writes the time filter
/// through the store; the list reads it back to decide what is visible.
pub struct App {
    records: Vec<EventRecord>,
    skipped: usize,
    visible: Vec<usize>,
    store: FilterStore,
    histogram: HistogramWidget,
    scroll_offset: usize,
    viewport_height: usize,
    mode: AppMode,
    source_name: String,
    follow_mode: bool,
    follow_paused: bool,
    brush_held: bool,
    quit: bool,
}

impl App {
    pub fn new(batch: ParsedBatch) -> Result<Self> {
        let mut histogram = HistogramWidget::mount()?;
        histogram.update(&batch.records)?;
        let visible = (0..batch.records.len()).collect();
        Ok(Self {
            records: batch.records,
            skipped: batch.skipped,
            visible,
            store: FilterStore::default(),
            histogram,
            scroll_offset: 0,
            viewport_height: 24,
            mode: AppMode::Normal,
            source_name: String::from("stdin"),
            follow_mode: false,
            follow_paused: false,
            brush_held: false,
            quit: false,
        })
    }

    // Record access

    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// `(original_index, record)` pairs for the current viewport window.
    pub fn visible_records_numbered(&self) -> Vec<(usize, &EventRecord)> {
        let start = self.scroll_offset.min(self.visible.len());
        let end = (start + self.viewport_height).min(self.visible.len());
        self.visible[start..end]
            .iter()
            .map(|&i| (i + 1, &self.records[i]))
            .collect()
    }

    /// Append freshly tailed records and push the grown set into the
    /// chart. The whole data source is replaced; there is no incremental
    /// bucket merge.
    pub fn append_records(&mut self, batch: ParsedBatch) -> Result<()> {
        if batch.records.is_empty() && batch.skipped == 0 {
            return Ok(());
        }
        let was_at_bottom = self.is_at_bottom();
        self.records.extend(batch.records);
        self.skipped += batch.skipped;
        self.recompute_visible();
        self.histogram.update(&self.records)?;
        if was_at_bottom {
            self.scroll_to_bottom();
        }
        Ok(())
    }

    // Filter plumbing

    pub fn time_filter(&self) -> Option<TimeFilter> {
        self.store.time_filter()
    }

    /// Replace the active time filter (from a key binding or a test) and
    /// recompute the visible set.
    pub fn apply_time_filter(&mut self, filter: Option<TimeFilter>) {
        self.store.set_time_filter(filter);
        self.recompute_visible();
    }

    pub fn clear_time_filter(&mut self) {
        self.apply_time_filter(None);
        self.histogram.reset_brush();
    }

    fn recompute_visible(&mut self) {
        self.visible = filter_records(&self.records, self.store.time_filter());
        self.clamp_scroll();
    }

    // Histogram / interaction

    pub fn histogram(&self) -> &HistogramWidget {
        &self.histogram
    }

    pub fn histogram_mut(&mut self) -> &mut HistogramWidget {
        &mut self.histogram
    }

    /// Translate a terminal mouse event into the chart's gesture streams.
    /// A press only arms the brush inside the plot region; once armed,
    /// drag updates keep flowing even if the pointer wanders out (the
    /// scale clamps the column), until release.
    pub fn on_mouse(&mut self, event: MouseEvent, now: Instant) {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let inside = self
                    .histogram
                    .chart()
                    .is_some_and(|c| c.hit(event.column, event.row));
                if inside {
                    self.brush_held = true;
                    self.histogram
                        .on_gesture(Gesture::MouseDown, event.column, now);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.brush_held => {
                self.histogram
                    .on_gesture(Gesture::MouseDrag, event.column, now);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.brush_held = false;
            }
            MouseEventKind::ScrollDown => self.scroll_down(3),
            MouseEventKind::ScrollUp => self.scroll_up(3),
            _ => {}
        }
    }

    /// Drain due debounce timers; a resolved brush is published into the
    /// store as one replacement command and the visible set recomputed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(outcome) = self.histogram.poll(now) {
            publish(outcome, &mut self.store);
            self.recompute_visible();
        }
    }

    /// Earliest instant at which `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.histogram.next_deadline()
    }

    // Scrolling (event list)

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.clamp_scroll();
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(n);
        self.clamp_scroll();
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.saturating_sub(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.saturating_sub(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.visible.len().saturating_sub(self.viewport_height);
    }

    fn is_at_bottom(&self) -> bool {
        self.scroll_offset >= self.visible.len().saturating_sub(self.viewport_height)
    }

    fn clamp_scroll(&mut self) {
        let max = self.visible.len().saturating_sub(self.viewport_height);
        if self.scroll_offset > max {
            self.scroll_offset = max;
        }
    }

    // Mode / lifecycle

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Normal => AppMode::Help,
            AppMode::Help => AppMode::Normal,
        };
    }

    pub fn set_source_name(&mut self, name: String) {
        self.source_name = name;
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn set_follow_mode(&mut self, enabled: bool) {
        self.follow_mode = enabled;
    }

    pub fn is_follow_mode(&self) -> bool {
        self.follow_mode
    }

    pub fn toggle_follow_pause(&mut self) {
        self.follow_paused = !self.follow_paused;
    }

    pub fn is_follow_paused(&self) -> bool {
        self.follow_paused
    }

    /// Quit also unmounts the widget, cancelling pending debounce timers
    /// so nothing fires into a torn-down chart.
    pub fn quit(&mut self) {
        self.histogram.unmount();
        self.quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
