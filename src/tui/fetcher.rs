//! Background suggestion fetching.
//!
//! Each `FetchRequest` runs on its own task and reports back over a channel
//! tagged with its sequence number, leaving the search state to decide whether
//! the outcome is still wanted. Shutting down cancels whatever is in flight;
//! a task finishing after the receiver is gone is silently discarded.

use crate::error::Result;
use crate::geocoding::{Geocoder, Suggestion};
use crate::search::FetchRequest;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

/// Outcome of one suggestion lookup.
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<Suggestion>>,
}

/// Runs geocoder lookups off the UI loop.
pub struct SuggestionFetcher {
    geocoder: Arc<dyn Geocoder>,
    tx: mpsc::Sender<FetchOutcome>,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl SuggestionFetcher {
    /// Creates a fetcher and the receiver its outcomes arrive on.
    pub fn new(geocoder: Arc<dyn Geocoder>) -> (Self, mpsc::Receiver<FetchOutcome>) {
        let (tx, rx) = mpsc::channel(32);
        let fetcher = Self {
            geocoder,
            tx,
            cancel: CancellationToken::new(),
            tasks: TaskTracker::new(),
        };
        (fetcher, rx)
    }

    /// Starts a lookup for `request`.
    pub fn dispatch(&self, request: FetchRequest) {
        let geocoder = Arc::clone(&self.geocoder);
        let tx = self.tx.clone();
        let cancel = self.cancel.clone();

        self.tasks.spawn(async move {
            let FetchRequest { seq, query } = request;
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!(seq, "Suggestion fetch cancelled");
                }
                result = geocoder.search(&query) => {
                    let outcome = FetchOutcome { seq, query, result };
                    if tx.send(outcome).await.is_err() {
                        debug!(seq, "Receiver gone, dropping suggestions");
                    }
                }
            }
        });
    }

    /// Number of lookups still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Cancels outstanding lookups and waits for their tasks to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        self.tasks.close();
        self.tasks.wait().await;
    }
}
