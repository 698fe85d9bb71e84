//! Terminal User Interface for geosearch.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod events;
pub mod fetcher;
pub mod headless;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};
pub use fetcher::{FetchOutcome, SuggestionFetcher};

use crate::error::{GeoSearchError, Result};
use crate::geocoding::Geocoder;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;

        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| GeoSearchError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|e| {
            GeoSearchError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
            .map_err(|e| GeoSearchError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| GeoSearchError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| GeoSearchError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| GeoSearchError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main event loop until the user quits.
    pub async fn run(&mut self, mut app: App, geocoder: Arc<dyn Geocoder>) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let size = self
            .terminal
            .size()
            .map_err(|e| GeoSearchError::internal(format!("Failed to read terminal size: {e}")))?;
        app.resize(Rect::new(0, 0, size.width, size.height));

        let (fetcher, mut outcomes) = SuggestionFetcher::new(geocoder);
        let result = self.run_event_loop(&mut app, &fetcher, &mut outcomes).await;

        // Late completions are dropped with the receiver; in-flight lookups
        // are cancelled before the runtime goes away.
        drop(outcomes);
        debug!(in_flight = fetcher.in_flight(), "Shutting down suggestion fetcher");
        fetcher.shutdown().await;

        let _ = panic::take_hook();

        result
    }

    /// The main event loop, separated for cleaner error handling.
    async fn run_event_loop(
        &mut self,
        app: &mut App,
        fetcher: &SuggestionFetcher,
        outcomes: &mut mpsc::Receiver<FetchOutcome>,
    ) -> Result<()> {
        loop {
            let now = Instant::now();
            app.clear_expired_toast(now);
            if let Some(request) = app.poll_search(now) {
                fetcher.dispatch(request);
            }

            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| GeoSearchError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            let deadline = app.search.next_deadline();

            tokio::select! {
                event = self.event_handler.next() => match event {
                    Some(event) => app.handle_event(event, Instant::now()),
                    None => {
                        debug!("Terminal event reader stopped");
                        break;
                    }
                },

                Some(outcome) = outcomes.recv() => {
                    debug!(seq = outcome.seq, query = %outcome.query, "Suggestions received");
                    app.apply_search_results(outcome.seq, outcome.result, Instant::now());
                }

                _ = async {
                    match deadline {
                        Some(at) => tokio::time::sleep_until(at.into()).await,
                        None => std::future::pending().await,
                    }
                } => {}
            }
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive TUI with `app` as the initial state.
pub async fn run(app: App, geocoder: Arc<dyn Geocoder>) -> Result<()> {
    info!(provider = geocoder.name(), "Starting TUI");
    let mut tui = Tui::new()?;
    tui.run(app, geocoder).await
}
