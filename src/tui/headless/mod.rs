//! Headless mode for scripted testing and automation.
//!
//! Runs the application against a `TestBackend`, executing scripted events
//! and capturing output for verification. Time is virtual: `wait:` advances
//! the clock the debounce timer sees, and any fetch that becomes due is
//! resolved against the geocoder before the next event runs.

mod events;
mod output;

pub use events::{Assertion, Event, EventParser};
pub use output::{HeadlessOutput, ScreenRenderer};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::{GeoSearchError, Result};
use crate::geocoding::Geocoder;
use crate::tui::app::{App, Focus};
use crate::tui::ui;
use crate::tui::Event as AppEvent;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    /// Output format.
    pub output_format: OutputFormat,
    /// Whether to stop on first assertion failure.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<PathBuf>,
    /// Debounce quiet period.
    pub debounce: Duration,
}

impl HeadlessConfig {
    /// Creates a HeadlessConfig from CLI arguments and the resolved config.
    pub fn from_cli(cli: &Cli, config: &Config) -> Result<Self> {
        let (width, height) = cli.parse_screen_size().map_err(GeoSearchError::config)?;
        let output_format = cli.parse_output_format().map_err(GeoSearchError::config)?;

        Ok(Self {
            width,
            height,
            output_format,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
            debounce: config.search.debounce(),
        })
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen content as text.
    pub screen: String,
    /// Screen lines for JSON output.
    pub screen_lines: Vec<String>,
    /// Number of events executed.
    pub events_executed: usize,
    /// Wall-clock execution duration.
    pub duration: Duration,
    /// Number of assertions passed.
    pub assertions_passed: usize,
    /// Number of assertions failed.
    pub assertions_failed: usize,
    /// Description of each failed assertion.
    pub failures: Vec<String>,
    /// Application state snapshot.
    pub state: HeadlessState,
    /// Frame captures (for frames output mode).
    pub frames: Vec<Frame>,
}

/// Snapshot of application state for JSON output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HeadlessState {
    /// Current query text.
    pub query: String,
    /// Focused panel ("search" or "place").
    pub focus: String,
    /// Selection cursor.
    pub selected: Option<usize>,
    /// Number of suggestions held.
    pub suggestion_count: usize,
    /// Whether the suggestion list is showing.
    pub list_visible: bool,
    /// Number of fetches issued.
    pub fetch_count: u64,
    /// Query of the most recent fetch.
    pub last_fetch: Option<String>,
    /// Id of the chosen place.
    pub chosen: Option<String>,
    /// Whether the app is still running.
    pub running: bool,
}

impl HeadlessState {
    fn from_app(app: &App) -> Self {
        let search = &app.search;
        Self {
            query: app.input.text.clone(),
            focus: app.focus.as_str().to_string(),
            selected: search.selected_index(),
            suggestion_count: search.suggestions().len(),
            list_visible: search.is_open(),
            fetch_count: search.requests_issued(),
            last_fetch: search.last_query().map(String::from),
            chosen: app.chosen.as_ref().map(|p| p.id.clone()),
            running: app.running,
        }
    }
}

/// A captured frame (screen state after an event).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0 = initial state).
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    /// Screen content.
    pub screen: String,
}

/// Runs the application in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    geocoder: Arc<dyn Geocoder>,
    events: Vec<Event>,
    frames: Vec<Frame>,
    /// Virtual clock.
    now: Instant,
    assertions_passed: usize,
    assertions_failed: usize,
    failures: Vec<String>,
}

impl HeadlessRunner {
    /// Creates a new headless runner with the given configuration.
    pub fn new(config: HeadlessConfig, geocoder: Arc<dyn Geocoder>) -> Result<Self> {
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend).map_err(|e| {
            GeoSearchError::internal(format!("Failed to create test terminal: {e}"))
        })?;

        let provider_info = format!("{} (headless)", geocoder.name());
        let mut app = App::new(provider_info, config.debounce);
        app.resize(Rect::new(0, 0, config.width, config.height));

        Ok(Self {
            config,
            terminal,
            app,
            geocoder,
            events: Vec::new(),
            frames: Vec::new(),
            now: Instant::now(),
            assertions_passed: 0,
            assertions_failed: 0,
            failures: Vec::new(),
        })
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.events = EventParser::new().parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file ("-" reads stdin).
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| GeoSearchError::internal(format!("Failed to read stdin: {e}")))?;
            buffer
        } else {
            std::fs::read_to_string(path).map_err(|e| {
                GeoSearchError::internal(format!("Failed to read script file: {e}"))
            })?
        };

        self.load_events(&content)
    }

    /// Runs the headless execution and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        let started = Instant::now();

        self.capture_frame(None)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in events {
            let event_str = event.to_string();

            match &event {
                Event::Key(key) => {
                    self.app.handle_event(AppEvent::Key(*key), self.now);
                }
                Event::Type(text) => {
                    for c in text.chars() {
                        let key = crossterm::event::KeyEvent::new(
                            crossterm::event::KeyCode::Char(c),
                            crossterm::event::KeyModifiers::NONE,
                        );
                        self.app.handle_event(AppEvent::Key(key), self.now);
                    }
                }
                Event::Wait(duration) => {
                    self.now += *duration;
                }
                // A pointer can only reach rows while the list is on screen.
                Event::Hover(_) | Event::Leave(_) | Event::Click(_)
                    if !self.app.search.is_open() =>
                {
                    debug!(event = %event_str, "Suggestion list hidden, ignoring pointer event");
                }
                Event::Hover(index) => self.app.search.hover(*index),
                Event::Leave(index) => self.app.search.leave(*index),
                Event::Click(index) => {
                    if let Some(action) = self.app.search.click(*index) {
                        self.app.apply_action(action, self.now);
                    }
                }
                Event::Focus => self.app.set_focus(Focus::Search),
                Event::Blur => self.app.set_focus(Focus::Place),
                Event::Resize(w, h) => {
                    self.terminal
                        .resize(Rect::new(0, 0, *w, *h))
                        .map_err(|e| GeoSearchError::internal(format!("Resize failed: {e}")))?;
                    self.app.handle_event(AppEvent::Resize(*w, *h), self.now);
                }
                Event::Snapshot(_) => {
                    // Snapshots are captured as frames
                }
                Event::Assert(assertion) => {
                    self.draw()?;
                    let screen = self.render_screen();
                    if assertion.check(&screen, &self.app) {
                        self.assertions_passed += 1;
                    } else {
                        self.record_failure(assertion, &event_str);
                        if self.config.fail_fast {
                            events_executed += 1;
                            break;
                        }
                    }
                }
            }

            self.settle().await;
            events_executed += 1;

            if self.config.output_format == OutputFormat::Frames {
                self.capture_frame(Some(event_str))?;
            } else {
                self.draw()?;
            }

            if !self.app.running {
                break;
            }
        }

        self.draw()?;
        let screen = self.render_screen();
        let screen_lines = screen.lines().map(String::from).collect();

        Ok(HeadlessResult {
            screen,
            screen_lines,
            events_executed,
            duration: started.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.assertions_failed,
            failures: self.failures,
            state: HeadlessState::from_app(&self.app),
            frames: self.frames,
        })
    }

    /// Resolves every fetch that is due at the current virtual time.
    async fn settle(&mut self) {
        while let Some(request) = self.app.poll_search(self.now) {
            debug!(seq = request.seq, query = %request.query, "Resolving fetch");
            let result = self.geocoder.search(&request.query).await;
            self.app.apply_search_results(request.seq, result, self.now);
        }
        self.app.clear_expired_toast(self.now);
    }

    fn record_failure(&mut self, assertion: &Assertion, event_str: &str) {
        self.assertions_failed += 1;
        let detail = match assertion {
            Assertion::StateEquals { field, .. } | Assertion::StateCompare { field, .. } => {
                let actual = events::get_state_field(&self.app, field)
                    .unwrap_or_else(|| "unknown field".to_string());
                format!("{event_str} (actual: {actual})")
            }
            _ => event_str.to_string(),
        };
        self.failures.push(detail);
    }

    fn draw(&mut self) -> Result<()> {
        let app = &self.app;
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| GeoSearchError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    /// Renders the current screen to a string.
    fn render_screen(&self) -> String {
        ScreenRenderer::render(self.terminal.backend().buffer())
    }

    /// Captures the current frame.
    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;
        let screen = self.render_screen();
        let number = self.frames.len();

        self.frames.push(Frame {
            number,
            event,
            screen,
        });

        Ok(())
    }
}

/// Runs headless mode from CLI arguments; returns the process exit code.
pub async fn run_headless(cli: &Cli, config: &Config, geocoder: Arc<dyn Geocoder>) -> Result<i32> {
    cli.validate_headless().map_err(GeoSearchError::config)?;

    let headless_config = HeadlessConfig::from_cli(cli, config)?;
    let mut runner = HeadlessRunner::new(headless_config.clone(), geocoder)?;

    if let Some(ref events_str) = cli.events {
        runner.load_events(events_str)?;
    } else if let Some(ref script_path) = cli.script {
        runner.load_script(script_path)?;
    }

    let result = runner.run().await?;

    let output_str = HeadlessOutput::new(headless_config.output_format).format(&result);

    if let Some(ref path) = headless_config.output_file {
        std::fs::write(path, &output_str)
            .map_err(|e| GeoSearchError::internal(format!("Failed to write output file: {e}")))?;
    } else {
        print!("{}", output_str);
    }

    Ok(if result.assertions_failed > 0 { 1 } else { 0 })
}
