//! # studyblock CLI Entry Point
//!
//! This is the main entry point for the studyblock day calendar.
//!
//! ## Overview
//!
//! studyblock reads a JSON export of study blocks, lays out one day of them
//! so that overlapping blocks sit in separate lanes, and draws the result as
//! a scrollable time grid with a live current-time line.
//!
//! ## Usage
//!
//! ```bash
//! # Show today's blocks
//! studyblock --file blocks.json
//!
//! # Show a specific day at 2x zoom
//! studyblock --file blocks.json --date 2024-05-01 --zoom 2
//!
//! # Track a goal of five 45 minute blocks
//! studyblock --file blocks.json --goal 5x45
//!
//! # Print the computed layout as JSON and exit
//! studyblock --file blocks.json --dump
//! ```
//!
//! ## Logging
//!
//! Interactive runs log to `studyblock.log` in the platform data directory
//! (the terminal belongs to the UI). `--dump` logs to stderr. The level is
//! taken from `RUST_LOG`.
//!
//! ## Key Bindings
//!
//! - `q` / `Esc` / `Ctrl+c` - Quit (`Esc` first clears a selection)
//! - `j` / `Down`, `k` / `Up` - Scroll by one row
//! - `Ctrl+d` / `PageDown`, `Ctrl+u` / `PageUp` - Scroll by half a page
//! - `g` / `Home`, `G` / `End` - Jump to the start / end of the day
//! - `+` / `-` - Zoom in / out (1x to 4x)
//! - `Tab` / `Shift+Tab` - Select next / previous block
//! - `[` / `Left`, `]` / `Right` - Previous / next day
//! - `t` - Jump to today and scroll to the current time
//! - `r` - Reload the blocks file

use studyblock::clock::{delay_until_next_minute, Clock, RefreshTicker, SystemClock};
use studyblock::layout::{Placement, RoundingPolicy, StudyBlock, ZoomLevel};
use studyblock::source::{self, DailyGoal};
use studyblock::ui;
use studyblock::ui::config::Config;
use studyblock::ui::render::calendar_rows;
use studyblock::ui::theme::Theme;
use studyblock::ui::App;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// How long to wait for input before redrawing.
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(
                event::read().context("Failed to read keyboard event")?,
            ))
        } else {
            Ok(None)
        }
    }
}

/// studyblock - a terminal day calendar for study sessions
#[derive(Parser, Debug)]
#[command(name = "studyblock")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lay out a day of study blocks in the terminal", long_about = None)]
struct Args {
    /// JSON file with the study blocks to show
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Day to show (YYYY-MM-DD); defaults to today
    #[arg(short, long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Zoom level, 1 to 4 in steps of 0.5
    #[arg(short, long, value_name = "LEVEL")]
    zoom: Option<f64>,

    /// How grid positions are rounded: round or truncate
    #[arg(long, value_name = "POLICY")]
    rounding: Option<RoundingPolicy>,

    /// Daily goal as BLOCKSxMINUTES, e.g. 7x60
    #[arg(long, value_name = "GOAL")]
    goal: Option<DailyGoal>,

    /// Name of a built-in color theme
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Print the computed layout as JSON and exit
    #[arg(long)]
    dump: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    init_logging(args.dump);

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);

        original_hook(panic_info);
    }));

    let result = run_application(args).await;

    // Restore panic hook
    let _ = panic::take_hook();

    if let Err(ref e) = result {
        tracing::error!("{:#}", e);
    }
    result
}

/// Install the tracing subscriber. Logging problems never stop the app.
fn init_logging(to_stderr: bool) {
    let default_level = if to_stderr { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if to_stderr {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
        return;
    }

    match open_log_file() {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
    }
}

fn open_log_file() -> Result<std::fs::File> {
    let dirs = directories::ProjectDirs::from("", "", "studyblock")
        .context("Could not determine data directory")?;
    let dir = dirs.data_dir();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;

    let path = dir.join("studyblock.log");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

async fn run_application(args: Args) -> Result<()> {
    let config = Config::load();
    let clock = SystemClock;

    let blocks = source::load_blocks(&args.file)?;
    info!(count = blocks.len(), file = %args.file.display(), "loaded study blocks");

    let mut app = build_app(&args, &config, blocks, clock.now());

    if args.dump {
        println!("{}", dump_layout(&app)?);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run the app and ensure cleanup happens even on error
    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(
        &mut terminal,
        &mut app,
        &mut event_reader,
        &clock,
        &args.file,
        config.refresh_interval(),
    )
    .await;

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    run_result?;
    cleanup_result?;

    Ok(())
}

/// Combine command-line flags with the saved config; flags win.
fn build_app(args: &Args, config: &Config, blocks: Vec<StudyBlock>, now: DateTime<Utc>) -> App {
    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    let theme = match Theme::by_name(theme_name) {
        Some(theme) => theme.clone(),
        None => {
            warn!("Unknown theme '{}', using default", theme_name);
            Theme::default_theme().clone()
        }
    };

    let zoom = args.zoom.map_or(config.zoom, ZoomLevel::new);
    let rounding = args.rounding.unwrap_or(config.rounding);
    let goal = args.goal.unwrap_or(config.daily_goal);
    let day = args
        .date
        .unwrap_or_else(|| now.with_timezone(&Local).date_naive());

    App::new(blocks, day, now, theme)
        .with_scale(zoom, rounding)
        .with_goal(goal)
}

#[derive(Serialize)]
struct LayoutDump {
    day: NaiveDate,
    zoom: f64,
    rounding: RoundingPolicy,
    groups: Vec<GroupDump>,
}

#[derive(Serialize)]
struct GroupDump {
    grid_row: String,
    blocks: Vec<StudyBlock>,
    placements: Vec<Placement>,
}

fn dump_layout(app: &App) -> Result<String> {
    let groups = app
        .groups()
        .into_iter()
        .map(|group| GroupDump {
            grid_row: group.grid_row.to_string(),
            placements: group.placements(),
            blocks: group.blocks,
        })
        .collect();

    let dump = LayoutDump {
        day: app.day,
        zoom: app.zoom.value(),
        rounding: app.rounding,
        groups,
    };
    serde_json::to_string_pretty(&dump).context("Failed to serialize layout")
}

/// Wait for input no longer than the time left in the current minute, so the
/// first redraw of a new minute is not held back by a full poll.
fn poll_timeout(now: DateTime<Utc>) -> Duration {
    POLL_TIMEOUT.min(delay_until_next_minute(now))
}

async fn run_app<B>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_reader: &mut dyn EventReader,
    clock: &dyn Clock,
    blocks_path: &Path,
    refresh: Duration,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut ticker = RefreshTicker::new(clock.now(), refresh);

    let size = terminal.size().context("Failed to read terminal size")?;
    app.set_viewport_rows(calendar_rows(size.height));
    app.scroll_to_now();

    loop {
        let now = clock.now();
        if ticker.should_refresh(now) {
            debug!(%now, "refreshing current time");
            app.refresh_now(now);
        }

        terminal
            .draw(|f| ui::render(f, app))
            .context("Failed to draw terminal UI")?;

        let event = match event_reader.read_event(poll_timeout(now))? {
            Some(e) => e,
            None => continue,
        };

        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(app, key) == KeyOutcome::Reload {
                    reload_blocks(app, blocks_path);
                }
            }
            Event::Resize(_, height) => app.set_viewport_rows(calendar_rows(height)),
            _ => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Reload,
}

fn handle_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    let has_ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let half_page = (app.viewport_rows / 2).max(1);
    app.status = None;

    match key.code {
        KeyCode::Char('c') if has_ctrl => app.should_quit = true,
        KeyCode::Char('d') if has_ctrl => app.scroll_down(half_page),
        KeyCode::Char('u') if has_ctrl => app.scroll_up(half_page),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Esc => {
            if app.selected.is_some() {
                app.clear_selection();
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(half_page),
        KeyCode::PageUp => app.scroll_up(half_page),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_up(usize::MAX),
        KeyCode::Char('G') | KeyCode::End => app.scroll_down(usize::MAX),
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') => app.zoom_out(),
        KeyCode::Tab => app.select_next(),
        KeyCode::BackTab => app.select_previous(),
        KeyCode::Char('[') | KeyCode::Left => app.previous_day(),
        KeyCode::Char(']') | KeyCode::Right => app.next_day(),
        KeyCode::Char('t') => app.go_to_today(),
        KeyCode::Char('r') => return KeyOutcome::Reload,
        _ => {}
    }

    KeyOutcome::Continue
}

fn reload_blocks(app: &mut App, path: &Path) {
    match source::load_blocks(path) {
        Ok(blocks) => {
            info!(count = blocks.len(), "reloaded study blocks");
            app.reload(blocks);
        }
        Err(e) => {
            warn!("Reload failed: {:#}", e);
            app.status = Some(format!("Reload failed: {:#}", e));
        }
    }
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use studyblock::clock::FixedClock;
    use ratatui::backend::TestBackend;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::fs;
    use tempfile::TempDir;

    /// Mock event reader for testing that returns a predetermined sequence of events
    struct MockEventReader {
        events: VecDeque<Event>,
    }

    impl MockEventReader {
        fn new(events: Vec<Event>) -> Self {
            Self {
                events: VecDeque::from(events),
            }
        }
    }

    impl EventReader for MockEventReader {
        fn read_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
            Ok(self.events.pop_front())
        }
    }

    /// Clock that moves forward by `step` every time it is read
    struct SteppingClock {
        current: Cell<DateTime<Utc>>,
        step: chrono::Duration,
    }

    impl SteppingClock {
        fn new(start: DateTime<Utc>, step: chrono::Duration) -> Self {
            Self {
                current: Cell::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let now = self.current.get();
            self.current.set(now + self.step);
            now
        }
    }

    fn test_terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(80, 40)).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn local(h: u32, m: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2024, 5, 1, h, m, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn test_app() -> App {
        let blocks = vec![
            StudyBlock::new(1, local(9, 0), Some(local(10, 0))),
            StudyBlock::new(2, local(9, 30), Some(local(10, 30))),
            StudyBlock::new(3, local(11, 0), Some(local(12, 0))),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut app = App::new(blocks, day, local(12, 30), Theme::default_theme().clone());
        app.set_viewport_rows(20);
        app
    }

    fn base_args(file: PathBuf) -> Args {
        Args {
            file,
            date: None,
            zoom: None,
            rounding: None,
            goal: None,
            theme: None,
            dump: false,
        }
    }

    #[test]
    fn test_mock_event_reader() {
        let mut reader = MockEventReader::new(vec![
            Event::Key(key(KeyCode::Char('q'))),
            Event::Resize(80, 24),
        ]);

        assert!(matches!(
            reader.read_event(Duration::from_millis(10)).unwrap(),
            Some(Event::Key(KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }))
        ));
        assert!(matches!(
            reader.read_event(Duration::from_millis(10)).unwrap(),
            Some(Event::Resize(80, 24))
        ));
        assert!(reader
            .read_event(Duration::from_millis(10))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_crossterm_event_reader_type() {
        let _reader: Box<dyn EventReader> = Box::new(CrosstermEventReader);
    }

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from([
            "studyblock",
            "--file",
            "blocks.json",
            "--date",
            "2024-05-01",
            "--zoom",
            "2.5",
            "--rounding",
            "truncate",
            "--goal",
            "5x45",
            "--dump",
        ])
        .unwrap();

        assert_eq!(args.file, PathBuf::from("blocks.json"));
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(args.zoom, Some(2.5));
        assert_eq!(args.rounding, Some(RoundingPolicy::Truncate));
        assert_eq!(args.goal.map(|g| g.total_minutes()), Some(225));
        assert!(args.dump);
    }

    #[test]
    fn test_args_require_file() {
        assert!(Args::try_parse_from(["studyblock"]).is_err());
    }

    #[test]
    fn test_args_reject_bad_rounding() {
        let result =
            Args::try_parse_from(["studyblock", "-f", "b.json", "--rounding", "ceil"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_app_flags_override_config() {
        let mut args = base_args(PathBuf::from("b.json"));
        args.zoom = Some(3.0);
        args.theme = Some("nord".to_string());
        args.date = NaiveDate::from_ymd_opt(2024, 5, 1);

        let config = Config {
            rounding: RoundingPolicy::Truncate,
            ..Config::default()
        };
        let app = build_app(&args, &config, Vec::new(), local(8, 0));

        assert_eq!(app.zoom.value(), 3.0);
        assert_eq!(app.rounding, RoundingPolicy::Truncate);
        assert_eq!(app.theme.name, "Nord");
        assert_eq!(app.day, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_build_app_goal_flag_overrides_config() {
        let config = Config {
            daily_goal: DailyGoal {
                quantity: 3,
                block_size: 90,
            },
            ..Config::default()
        };

        let app = build_app(&base_args(PathBuf::from("b.json")), &config, Vec::new(), local(8, 0));
        assert_eq!(app.goal, config.daily_goal);

        let mut args = base_args(PathBuf::from("b.json"));
        args.goal = Some("5x45".parse().unwrap());
        let app = build_app(&args, &config, Vec::new(), local(8, 0));
        assert_eq!(app.goal.quantity, 5);
        assert_eq!(app.goal.block_size, 45);
    }

    #[test]
    fn test_args_reject_bad_goal() {
        let result = Args::try_parse_from(["studyblock", "-f", "b.json", "--goal", "lots"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_app_unknown_theme_falls_back() {
        let mut args = base_args(PathBuf::from("b.json"));
        args.theme = Some("Hot Pink".to_string());
        let app = build_app(&args, &Config::default(), Vec::new(), local(8, 0));
        assert_eq!(app.theme.name, Theme::default_theme().name);
    }

    #[test]
    fn test_dump_layout() {
        let app = test_app();
        let json = dump_layout(&app).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let groups = value["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["grid_row"], "540 / 720");
        assert_eq!(groups[0]["blocks"].as_array().unwrap().len(), 2);
        assert_eq!(groups[1]["grid_row"], "570 / 630");
        assert_eq!(groups[0]["placements"][1]["left"], 50.0);
        assert_eq!(value["rounding"], "round");
    }

    #[test]
    fn test_handle_key_quit() {
        let mut app = test_app();
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('q'))),
            KeyOutcome::Continue
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_handle_key_ctrl_c_quits() {
        let mut app = test_app();
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_handle_key_esc_clears_selection_first() {
        let mut app = test_app();
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.selected, Some(0));

        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.selected, None);
        assert!(!app.should_quit);

        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_handle_key_zoom() {
        let mut app = test_app();
        handle_key(&mut app, key(KeyCode::Char('+')));
        assert_eq!(app.zoom.value(), 1.5);
        handle_key(&mut app, key(KeyCode::Char('-')));
        handle_key(&mut app, key(KeyCode::Char('-')));
        assert_eq!(app.zoom.value(), 1.0);
    }

    #[test]
    fn test_handle_key_scroll() {
        let mut app = test_app();
        app.scroll = 10;
        handle_key(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.scroll, 11);
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.scroll, 10);
        handle_key(&mut app, key(KeyCode::Home));
        assert_eq!(app.scroll, 0);
        handle_key(&mut app, key(KeyCode::End));
        assert_eq!(app.scroll, app.total_rows() - 20);
    }

    #[test]
    fn test_handle_key_day_navigation() {
        let mut app = test_app();
        handle_key(&mut app, key(KeyCode::Char(']')));
        assert_eq!(app.day, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        handle_key(&mut app, key(KeyCode::Left));
        assert_eq!(app.day, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_handle_key_reload() {
        let mut app = test_app();
        app.status = Some("old".to_string());
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('r'))),
            KeyOutcome::Reload
        );
        assert!(app.status.is_none());
    }

    #[test]
    fn test_reload_blocks_reports_failure() {
        let mut app = test_app();
        reload_blocks(&mut app, Path::new("/nonexistent/blocks.json"));
        let status = app.status.unwrap();
        assert!(status.contains("Reload failed"));
        assert_eq!(app.blocks.len(), 3);
    }

    #[test]
    fn test_reload_blocks_replaces_list() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blocks.json");
        fs::write(
            &path,
            r#"[{"id": 9, "start_time": "2024-05-01T09:00:00Z", "end_time": null}]"#,
        )
        .unwrap();

        let mut app = test_app();
        reload_blocks(&mut app, &path);
        assert_eq!(app.blocks.len(), 1);
        assert_eq!(app.status.as_deref(), Some("Reloaded 1 blocks"));
    }

    #[test]
    fn test_poll_timeout_stops_at_minute_boundary() {
        let almost = Utc.with_ymd_and_hms(2024, 5, 1, 8, 59, 59).unwrap()
            + chrono::Duration::milliseconds(900);
        assert_eq!(poll_timeout(almost), Duration::from_millis(100));

        let early = Utc.with_ymd_and_hms(2024, 5, 1, 8, 59, 10).unwrap();
        assert_eq!(poll_timeout(early), POLL_TIMEOUT);
    }

    #[tokio::test]
    async fn test_run_app_quits_on_q() {
        let mut terminal = test_terminal();
        let mut app = test_app();
        let mut reader = MockEventReader::new(vec![Event::Key(key(KeyCode::Char('q')))]);
        let clock = FixedClock(local(12, 30));

        run_app(
            &mut terminal,
            &mut app,
            &mut reader,
            &clock,
            Path::new("unused.json"),
            Duration::from_secs(60),
        )
        .await
        .unwrap();

        assert!(app.should_quit);
        assert_eq!(app.viewport_rows, calendar_rows(40));
        assert_eq!(app.now, local(12, 30));
    }

    #[tokio::test]
    async fn test_run_app_refreshes_now_once_per_minute() {
        let start = local(8, 59) + chrono::Duration::seconds(30);
        let clock = SteppingClock::new(start, chrono::Duration::seconds(20));
        let mut terminal = test_terminal();
        let mut app = test_app();
        app.refresh_now(start);

        // the clock is read once by the ticker and once per loop pass:
        // 8:59:50, 9:00:10, 9:00:30, 9:00:50, 9:01:10, 9:01:30
        let mut reader = MockEventReader::new(vec![
            Event::Resize(80, 30),
            Event::FocusGained,
            Event::FocusGained,
            Event::FocusGained,
            Event::FocusGained,
            Event::Key(key(KeyCode::Char('q'))),
        ]);

        run_app(
            &mut terminal,
            &mut app,
            &mut reader,
            &clock,
            Path::new("unused.json"),
            Duration::from_secs(60),
        )
        .await
        .unwrap();

        assert!(app.should_quit);
        assert_eq!(app.viewport_rows, calendar_rows(30));
        // refreshed at 9:00:10 and 9:01:10, not on the final 9:01:30 pass
        assert_eq!(app.now, local(9, 1) + chrono::Duration::seconds(10));
    }

    #[tokio::test]
    async fn test_run_app_reloads_on_r() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blocks.json");
        fs::write(
            &path,
            r#"[{"id": 9, "start_time": "2024-05-01T09:00:00Z", "end_time": null}]"#,
        )
        .unwrap();

        let mut terminal = test_terminal();
        let mut app = test_app();
        let mut reader = MockEventReader::new(vec![
            Event::Key(key(KeyCode::Char('r'))),
            Event::Key(key(KeyCode::Char('q'))),
        ]);

        run_app(
            &mut terminal,
            &mut app,
            &mut reader,
            &FixedClock(local(12, 30)),
            &path,
            Duration::from_secs(60),
        )
        .await
        .unwrap();

        assert_eq!(app.blocks.len(), 1);
        assert_eq!(app.blocks[0].id, 9);
    }

    #[tokio::test]
    async fn test_run_application_missing_file() {
        let args = base_args(PathBuf::from("/nonexistent/blocks.json"));
        let result = run_application(args).await;
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Failed to read blocks file"));
    }

    #[tokio::test]
    async fn test_run_application_malformed_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blocks.json");
        fs::write(&path, r#"[{"id": 1, "start_time": "soon"}]"#).unwrap();

        let result = run_application(base_args(path)).await;
        let err_msg = format!("{:#}", result.unwrap_err());
        assert!(err_msg.contains("invalid timestamp"), "got: {}", err_msg);
    }

    #[tokio::test]
    async fn test_run_application_dump_mode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blocks.json");
        fs::write(&path, "[]").unwrap();

        let mut args = base_args(path);
        args.dump = true;
        assert!(run_application(args).await.is_ok());
    }
}
