use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{App, AppMode};
use crate::record::format_timestamp;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chart_height = app
        .histogram()
        .chart()
        .map_or(0, |c| c.preferred_height());

    let [chart_area, list_area, status_area] = Layout::vertical([
        Constraint::Length(chart_height),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    if let Some(chart) = app.histogram_mut().chart_mut() {
        chart.render(frame, chart_area);
    }

    render_event_list(frame, app, list_area);
    render_status_bar(frame, app, status_area);

    if app.mode() == AppMode::Help {
        render_help(frame, area);
    }
}

fn render_event_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let content_height = area.height.saturating_sub(2) as usize;
    app.set_viewport_height(content_height);

    let index_width = format!("{}", app.total_records()).len().max(3);
    let lines: Vec<Line> = app
        .visible_records_numbered()
        .iter()
        .map(|(index, record)| {
            Line::from(vec![
                Span::styled(
                    format!("{index:>index_width$} "),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format_timestamp(record.timestamp),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(" "),
                Span::raw(record.summary()),
            ])
        })
        .collect();

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("events [{}]", app.source_name())),
    );
    frame.render_widget(list, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut parts = vec![
        format!(" {}", app.source_name()),
        format!("{} events", app.total_records()),
    ];

    if let Some(filter) = app.time_filter() {
        parts.push(format!(
            "{} shown | {} .. {}",
            app.visible_count(),
            format_timestamp(filter.from),
            format_timestamp(filter.to),
        ));
    }

    if app.skipped_count() > 0 {
        parts.push(format!("{} skipped", app.skipped_count()));
    }

    if app.is_follow_mode() {
        parts.push(if app.is_follow_paused() {
            "PAUSED".to_string()
        } else {
            "FOLLOWING".to_string()
        });
    }

    let status = Paragraph::new(parts.join(" | "))
        .style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Keybindings",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  q / Esc      Quit (Esc clears an active filter first)"),
        Line::from("  mouse drag   Brush a time range on the chart"),
        Line::from("  click        Clear the brush (zero-width selection)"),
        Line::from("  c            Clear the time filter"),
        Line::from("  j / k        Scroll events down/up"),
        Line::from("  PgUp / PgDn  Page up/down"),
        Line::from("  g / G        Top / Bottom"),
        Line::from("  Space        Pause/resume (-f mode)"),
        Line::from("  ?            Toggle this help"),
        Line::from(""),
    ];

    let help_width = 58u16;
    let help_height = help_text.len() as u16 + 2;
    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width.min(area.width), help_height.min(area.height));

    let help_block = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, help_area);
    frame.render_widget(help_block, help_area);
}
