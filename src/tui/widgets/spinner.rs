//! Spinner shown while a suggestion request is outstanding.

use std::time::{Duration, Instant};

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Animation speed in milliseconds per frame.
const FRAME_DURATION_MS: u128 = 100;

/// Spinner state for animated indicators.
#[derive(Debug, Clone)]
pub struct Spinner {
    start_time: Instant,
    label: String,
}

impl Spinner {
    /// Creates a new spinner with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            label: label.into(),
        }
    }

    /// Creates the spinner used for place lookups.
    pub fn searching() -> Self {
        Self::new("Searching")
    }

    /// Returns the frame for a given elapsed time.
    pub fn frame_at(elapsed: Duration) -> &'static str {
        let index = (elapsed.as_millis() / FRAME_DURATION_MS) as usize;
        FRAMES[index % FRAMES.len()]
    }

    /// Returns the display string for the spinner.
    pub fn display(&self) -> String {
        format!("{} {}", Self::frame_at(self.start_time.elapsed()), self.label)
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }
}
