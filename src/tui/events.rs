//! Event handling for the TUI.
//!
//! Terminal input is read on a dedicated thread and forwarded over a channel,
//! so the async loop can wait on input, fetch completions and the debounce
//! deadline at the same time without dropping keystrokes.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The mouse moved or a button was used.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick (spinner animation, toast expiry).
    Tick,
}

impl Event {
    /// Converts a crossterm event, dropping the kinds we do not handle.
    pub fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(Self::Mouse(mouse)),
            CrosstermEvent::Resize(width, height) => Some(Self::Resize(width, height)),
            _ => None,
        }
    }
}

/// Reads terminal events on a background thread.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
    stop: Arc<AtomicBool>,
}

impl EventHandler {
    /// Creates a new event handler with the default tick rate.
    pub fn new() -> Self {
        Self::with_tick_rate(Duration::from_millis(100))
    }

    /// Creates a new event handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        thread::spawn(move || {
            while !thread_stop.load(Ordering::SeqCst) {
                let next = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(event) => Event::from_crossterm(event),
                        Err(e) => {
                            warn!("Failed to read terminal event: {e}");
                            break;
                        }
                    },
                    Ok(false) => Some(Event::Tick),
                    Err(e) => {
                        warn!("Failed to poll terminal events: {e}");
                        break;
                    }
                };

                if let Some(event) = next {
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, stop }
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the reader thread has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}
