use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use actigram::app::{App, AppMode};
use actigram::source::{self, FollowSource};
use actigram::ui;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
};
use crossterm::execute;

/// Idle tick when no debounce deadline is pending.
const IDLE_POLL: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(
    name = "actigram",
    version,
    about = "A terminal activity histogram with mouse-brush time filtering"
)]
struct Cli {
    /// Events file (JSON lines). Omit to read from stdin.
    file: Option<PathBuf>,

    /// Follow the file for new events (like tail -f). Requires a file.
    #[arg(short, long)]
    follow: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.follow && cli.file.is_none() {
        eprintln!("Error: --follow requires a file argument");
        std::process::exit(1);
    }

    let batch = match &cli.file {
        Some(path) => {
            if !path.exists() {
                eprintln!("Error: file not found: {}", path.display());
                std::process::exit(1);
            }
            source::load_file(path)?
        }
        None => {
            if std::io::stdin().is_terminal() {
                eprintln!("Usage: actigram <file> or pipe input via stdin");
                eprintln!("Example: cat events.jsonl | actigram");
                std::process::exit(1);
            }
            source::load_stdin()?
        }
    };

    let mut follow_source = if cli.follow {
        let path = cli.file.as_ref().expect("--follow checked above");
        let initial_offset = std::fs::metadata(path)?.len();
        Some(FollowSource::new(path, initial_offset))
    } else {
        None
    };

    let mut app = App::new(batch)?;
    app.set_follow_mode(cli.follow);
    if let Some(ref path) = cli.file {
        app.set_source_name(
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        );
    }

    let mut terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Restore the terminal even on panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Wait until input arrives or the nearest debounce deadline is due.
        let timeout = app
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .map_or(IDLE_POLL, |until| until.min(IDLE_POLL));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.mode() == AppMode::Help {
                        match key.code {
                            KeyCode::Char('q') => app.quit(),
                            _ => app.toggle_help(),
                        }
                    } else {
                        match key.code {
                            KeyCode::Char('q') => app.quit(),
                            KeyCode::Esc => {
                                if app.time_filter().is_some() {
                                    app.clear_time_filter();
                                } else {
                                    app.quit();
                                }
                            }
                            KeyCode::Char('c') => app.clear_time_filter(),
                            KeyCode::Down | KeyCode::Char('j') => app.scroll_down(1),
                            KeyCode::Up | KeyCode::Char('k') => app.scroll_up(1),
                            KeyCode::Char(' ') if app.is_follow_mode() => {
                                app.toggle_follow_pause()
                            }
                            KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(),
                            KeyCode::PageUp => app.page_up(),
                            KeyCode::Char('g') => app.scroll_to_top(),
                            KeyCode::Char('G') => app.scroll_to_bottom(),
                            KeyCode::Char('?') => app.toggle_help(),
                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => app.on_mouse(mouse, Instant::now()),
                _ => {}
            }
        }

        // Fire due debouncers; a resolved brush becomes a filter update.
        app.tick(Instant::now());

        // Poll for new events in follow mode (unless paused).
        if !app.is_follow_paused()
            && let Some(ref mut source) = follow_source
        {
            app.append_records(source.read_new()?)?;
        }

        if app.should_quit() {
            break;
        }
    }

    execute!(std::io::stdout(), DisableMouseCapture)?;
    ratatui::restore();
    Ok(())
}
