use crate::filter::TimeFilter;

/// One drag gesture's transient state. `Dragging` holds the scaled time
/// (epoch millis) where the press landed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Phase {
    #[default]
    Idle,
    Dragging { start_ms: f64 },
}

/// What a resolved gesture asks the filter layer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushOutcome {
    /// Zero-width drag: a plain click clears the active filter.
    Reset,
    Selected(TimeFilter),
}

/// Turns debounced `brush_start` / `brush_end` signal values into filter
/// outcomes. Values arrive already projected through the chart's inverse
/// x scale; this type only decides what a gesture meant.
#[derive(Debug, Default)]
pub struct BrushInterpreter {
    phase: Phase,
}

impl BrushInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A drag began at `start_ms`. Nothing is emitted yet; a new start
    /// supersedes any earlier unresolved one.
    pub fn on_start(&mut self, start_ms: f64) {
        self.phase = Phase::Dragging { start_ms };
    }

    /// A drag settled at `end_ms`. Equal endpoints mean the pointer never
    /// moved, which is a deliberate reset; otherwise the span is ordered
    /// ascending and converted from millis to seconds. Resolving returns
    /// the interpreter to `Idle`, so a repeated end signal without a fresh
    /// start is ignored rather than replayed against a stale start.
    pub fn on_end(&mut self, end_ms: f64) -> Option<BrushOutcome> {
        let Phase::Dragging { start_ms } = self.phase else {
            return None;
        };
        self.phase = Phase::Idle;
        if start_ms == end_ms {
            Some(BrushOutcome::Reset)
        } else {
            Some(BrushOutcome::Selected(TimeFilter::from_brush_millis(
                start_ms, end_ms,
            )))
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }
}
