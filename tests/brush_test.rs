
use actigram::brush::{BrushInterpreter, BrushOutcome};
use actigram::filter::{TimeFilter, publish};
use test_helpers::RecordingSink;

#[test]
fn test_zero_width_drag_resets() {
    let mut brush = BrushInterpreter::new();
    brush.on_start(5000.0);
    assert_eq!(brush.on_end(5000.0), Some(BrushOutcome::Reset));
}

#[test]
fn test_forward_drag_orders_and_scales() {
    let mut brush = BrushInterpreter::new();
    brush.on_start(2000.0);
    assert_eq!(
        brush.on_end(5000.0),
        Some(BrushOutcome::Selected(TimeFilter { from: 2.0, to: 5.0 }))
    );
}

#[test]
fn test_backward_drag_orders_and_scales() {
    let mut brush = BrushInterpreter::new();
    brush.on_start(5000.0);
    assert_eq!(
        brush.on_end(2000.0),
        Some(BrushOutcome::Selected(TimeFilter { from: 2.0, to: 5.0 }))
    );
}

#[test]
fn test_end_without_start_is_ignored() {
    let mut brush = BrushInterpreter::new();
    assert_eq!(brush.on_end(3000.0), None);
}

#[test]
fn test_resolution_clears_pending_start() {
    let mut brush = BrushInterpreter::new();
    brush.on_start(5000.0);
    assert!(brush.on_end(2000.0).is_some());
    // No intervening start: the stale value must not be replayed.
    assert_eq!(brush.on_end(7000.0), None);
}

#[test]
fn test_new_start_supersedes_old() {
    let mut brush = BrushInterpreter::new();
    brush.on_start(1000.0);
    brush.on_start(4000.0);
    assert_eq!(
        brush.on_end(6000.0),
        Some(BrushOutcome::Selected(TimeFilter { from: 4.0, to: 6.0 }))
    );
}

#[test]
fn test_publish_reset_clears_filter() {
    let mut sink = RecordingSink::default();
    publish(BrushOutcome::Reset, &mut sink);
    assert_eq!(sink.calls, vec![None]);
}

#[test]
fn test_publish_selection_replaces_filter() {
    let mut sink = RecordingSink::default();
    publish(
        BrushOutcome::Selected(TimeFilter { from: 2.0, to: 5.0 }),
        &mut sink,
    );
    publish(
        BrushOutcome::Selected(TimeFilter { from: 7.0, to: 9.0 }),
        &mut sink,
    );
    // Each publication is a full replacement, not a merge.
    assert_eq!(
        sink.calls,
        vec![
            Some(TimeFilter { from: 2.0, to: 5.0 }),
            Some(TimeFilter { from: 7.0, to: 9.0 }),
        ]
    );
}
