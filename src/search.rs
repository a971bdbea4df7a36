//! City search
//!
//! [`filter_cities`] is the pure, synchronous filter used by every caller.
//! [`IncrementalSearch`] wraps it for text-field style input: edits are
//! debounced and a settled query identical to the previous one is skipped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace};

use crate::models::City;

/// Quiet period used when the configuration does not override it
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

const CHANNEL_CAPACITY: usize = 64;

/// Cities whose name, kana or prefecture contains `query`, ignoring case.
///
/// An empty query returns every city. Input order is preserved and the input
/// slice is never modified.
#[must_use]
pub fn filter_cities(cities: &[City], query: &str) -> Vec<City> {
    if query.is_empty() {
        return cities.to_vec();
    }
    let needle = query.to_lowercase();
    cities
        .iter()
        .filter(|city| city.contains_lowercase(&needle))
        .cloned()
        .collect()
}

/// Debounced, de-duplicated search over a fixed city list
pub struct IncrementalSearch {
    queries: mpsc::Sender<String>,
    results: mpsc::Receiver<Vec<City>>,
    task: JoinHandle<()>,
}

impl IncrementalSearch {
    /// Start the search task on the current tokio runtime.
    pub fn spawn(cities: Arc<[City]>, quiet_period: Duration) -> Self {
        let (queries, query_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (result_tx, results) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(run_search(cities, quiet_period, query_rx, result_tx));
        Self {
            queries,
            results,
            task,
        }
    }

    /// Submit the current text of the search field.
    ///
    /// Returns `false` once the search task has stopped.
    pub async fn submit(&self, query: impl Into<String>) -> bool {
        self.queries.send(query.into()).await.is_ok()
    }

    /// Next settled result list; `None` after the task ended.
    pub async fn next(&mut self) -> Option<Vec<City>> {
        self.results.recv().await
    }

    /// Split into the query sender, the result receiver and the task handle.
    ///
    /// Dropping every sender flushes a pending query and ends the task.
    pub fn into_parts(
        self,
    ) -> (
        mpsc::Sender<String>,
        mpsc::Receiver<Vec<City>>,
        JoinHandle<()>,
    ) {
        (self.queries, self.results, self.task)
    }
}

#[instrument(name = "incremental_search", level = "debug", skip_all, fields(cities = cities.len()))]
async fn run_search(
    cities: Arc<[City]>,
    quiet_period: Duration,
    mut queries: mpsc::Receiver<String>,
    results: mpsc::Sender<Vec<City>>,
) {
    let mut last_evaluated: Option<String> = None;

    while let Some(first) = queries.recv().await {
        let mut current = first;
        let mut closed = false;

        // Restart the quiet period on every edit.
        loop {
            match tokio::time::timeout(quiet_period, queries.recv()).await {
                Ok(Some(newer)) => {
                    trace!(query = %newer, "debounce restarted");
                    current = newer;
                }
                Ok(None) => {
                    closed = true;
                    break;
                }
                Err(_) => break,
            }
        }

        if last_evaluated.as_deref() == Some(current.as_str()) {
            debug!(query = %current, "query unchanged, skipping");
        } else {
            let hits = filter_cities(&cities, &current);
            debug!(query = %current, hits = hits.len(), "query settled");
            if results.send(hits).await.is_err() {
                return;
            }
            last_evaluated = Some(current);
        }

        if closed {
            break;
        }
    }
    debug!("query stream closed");
}
