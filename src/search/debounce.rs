//! Quiet-period debouncing for the search text.
//!
//! The debouncer holds no timers of its own. Callers feed it the current
//! value and the current instant, and poll it when its deadline passes, which
//! keeps it deterministic under test and usable from both the live event loop
//! and the headless runner's virtual clock.

use std::time::{Duration, Instant};

/// A value waiting for its quiet period to elapse.
#[derive(Debug, Clone)]
struct Pending {
    value: String,
    deadline: Instant,
}

/// Publishes a value only after it has stopped changing for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    /// Most recent value observed through `update`.
    latest: String,
    /// Value still inside its quiet period.
    pending: Option<Pending>,
    /// Last value handed out by `poll` or `flush`.
    published: String,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: String::new(),
            pending: None,
            published: String::new(),
        }
    }

    /// Returns the quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a new input value observed at `now`.
    ///
    /// A changed value restarts the quiet period and supersedes whatever was
    /// pending. Repeating the current value leaves the timer alone.
    pub fn update(&mut self, value: &str, now: Instant) {
        if value == self.latest {
            return;
        }
        self.latest = value.to_string();
        self.pending = Some(Pending {
            value: value.to_string(),
            deadline: now + self.delay,
        });
    }

    /// Publishes the pending value if its quiet period has elapsed by `now`.
    ///
    /// Returns the newly published value, or `None` if nothing is due or the
    /// value settled back to what was already published.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.deadline);
        if !due {
            return None;
        }

        let pending = self.pending.take()?;
        if pending.value == self.published {
            return None;
        }
        self.published = pending.value.clone();
        Some(pending.value)
    }

    /// Publishes `value` immediately, discarding anything pending.
    pub fn flush(&mut self, value: &str) {
        self.latest = value.to_string();
        self.published = value.to_string();
        self.pending = None;
    }

    /// Returns when the pending value becomes due, if anything is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Returns true if a value is waiting out its quiet period.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the last published value.
    pub fn published(&self) -> &str {
        &self.published
    }
}
