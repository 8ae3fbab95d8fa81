
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use actigram::binning::DayBucket;
use actigram::chart::{ACTIVITY, ChartHandle, ChartSpec, Gesture, SignalName, TermChart};
use test_helpers::local_midnight_ms;

fn draw(chart: &mut TermChart, width: u16, height: u16) {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            chart.render(frame, area);
        })
        .unwrap();
}

#[test]
fn test_empty_data_still_renders() {
    let mut chart = TermChart::create(ChartSpec::activity_histogram()).unwrap();
    assert!(chart.needs_redraw());
    draw(&mut chart, 60, 10);
    assert!(!chart.needs_redraw());
    // The plot region exists even with nothing to draw in it.
    assert!(chart.hit(30, 4));
}

#[test]
fn test_nothing_hits_before_first_draw() {
    let chart = TermChart::create(ChartSpec::activity_histogram()).unwrap();
    assert!(!chart.hit(5, 5));
    // Without drawn geometry there is no scale to invert either.
    assert!(chart.signals_for(Gesture::MouseDown, 5).is_empty());
}

#[test]
fn test_gesture_projects_into_time_domain() {
    let mut chart = TermChart::create(ChartSpec::activity_histogram()).unwrap();
    let d1 = local_midnight_ms(2024, 1, 10);
    let d2 = local_midnight_ms(2024, 1, 20);
    chart
        .replace_data(
            ACTIVITY,
            vec![
                DayBucket {
                    day: d1,
                    count_day: 3,
                },
                DayBucket {
                    day: d2,
                    count_day: 5,
                },
            ],
        )
        .unwrap();
    draw(&mut chart, 80, 10);

    // A press produces both signal streams with one shared scaled value.
    let signals = chart.signals_for(Gesture::MouseDown, 40);
    let names: Vec<SignalName> = signals.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec![SignalName::BrushStart, SignalName::BrushEnd]);

    // Drag updates only the end stream.
    let drags = chart.signals_for(Gesture::MouseDrag, 41);
    assert_eq!(drags.len(), 1);
    assert_eq!(drags[0].0, SignalName::BrushEnd);

    // The scaled value stays inside the data-fitted domain, even for a
    // column far outside the plot (the inverse transform clamps).
    let domain_end = (d2 + actigram::binning::DAY_MS) as f64;
    for column in [0u16, 40, 200] {
        let (_, value) = chart.signals_for(Gesture::MouseDown, column)[0];
        assert!(value >= d1 as f64 && value <= domain_end);
    }
}

#[test]
fn test_render_is_stable_across_updates() {
    let mut chart = TermChart::create(ChartSpec::activity_histogram()).unwrap();
    let day = local_midnight_ms(2024, 1, 10);
    for count in 1..=3 {
        chart
            .replace_data(
                ACTIVITY,
                vec![DayBucket {
                    day,
                    count_day: count,
                }],
            )
            .unwrap();
        chart.request_redraw();
        // Redraw rebinds data without tearing the chart down.
        draw(&mut chart, 60, 10);
    }
    assert!(chart.hit(30, 4));
}
