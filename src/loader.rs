//! Data loader
//!
//! Runs the initial and full dataset fetches on two independent worker
//! threads. Each worker fetches, parses and reports exactly one [`Action`]:
//! `DatasetLoaded` on success or `LoadFailed` on any error. Errors are
//! logged here and go no further.
//!
//! The two workers are not ordered against each other. Results are delivered
//! in completion order, so the last one to finish decides the dataset.

use crate::error::Result;
use crate::record::parse_csv;
use crate::source::{CsvSource, ALL_DATA_PATH, INITIAL_DATA_PATH};
use crate::view::{Action, DatasetKind};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Starts the two dataset fetches
pub struct Loader {
    source: Arc<dyn CsvSource>,
    initial_path: String,
    all_path: String,
}

impl Loader {
    pub fn new(source: Arc<dyn CsvSource>) -> Self {
        Self {
            source,
            initial_path: INITIAL_DATA_PATH.to_string(),
            all_path: ALL_DATA_PATH.to_string(),
        }
    }

    /// Override the dataset paths
    pub fn with_paths(mut self, initial_path: impl Into<String>, all_path: impl Into<String>) -> Self {
        self.initial_path = initial_path.into();
        self.all_path = all_path.into();
        self
    }

    /// Start both fetches. Neither waits for the other.
    pub fn spawn(&self) -> Result<LoaderHandle> {
        let (tx, rx) = unbounded();
        let cancelled = Arc::new(AtomicBool::new(false));

        let jobs = [
            (DatasetKind::Initial, self.initial_path.clone()),
            (DatasetKind::All, self.all_path.clone()),
        ];

        let mut workers = Vec::with_capacity(jobs.len());
        for (kind, path) in jobs {
            let source = Arc::clone(&self.source);
            let tx = tx.clone();
            let cancelled = Arc::clone(&cancelled);

            let worker = thread::Builder::new()
                .name(format!("load-{}", kind.as_str()))
                .spawn(move || run_worker(source.as_ref(), kind, &path, &cancelled, &tx))?;
            workers.push(worker);
        }

        Ok(LoaderHandle {
            rx,
            cancelled,
            workers,
        })
    }
}

fn run_worker(
    source: &dyn CsvSource,
    kind: DatasetKind,
    path: &str,
    cancelled: &AtomicBool,
    tx: &Sender<Action>,
) {
    let action = load_dataset(source, kind, path);

    if cancelled.load(Ordering::SeqCst) {
        debug!(kind = kind.as_str(), "loader cancelled, discarding result");
        return;
    }

    // Receiver gone means the view was torn down
    let _ = tx.send(action);
}

/// Fetch and parse one dataset, turning the outcome into an action.
///
/// Never fails: any error is logged and reported as `LoadFailed`.
pub fn load_dataset(source: &dyn CsvSource, kind: DatasetKind, path: &str) -> Action {
    let started = Instant::now();
    let location = source.locate(path);
    debug!(kind = kind.as_str(), %location, "fetching dataset");

    match source.fetch(path).and_then(|text| parse_csv(&text)) {
        Ok(records) => {
            info!(
                kind = kind.as_str(),
                rows = records.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "dataset loaded"
            );
            Action::DatasetLoaded {
                kind,
                records: Arc::new(records),
            }
        }
        Err(e) => {
            error!(kind = kind.as_str(), %location, error = %e, "error fetching {} data", kind.as_str());
            Action::LoadFailed { kind }
        }
    }
}

/// Owns the running fetches.
///
/// Dropping the handle cancels it. After cancellation no further action is
/// delivered, even from a fetch that was already in flight.
pub struct LoaderHandle {
    rx: Receiver<Action>,
    cancelled: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl LoaderHandle {
    /// Stop delivering results
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Actions that are ready now, without blocking
    pub fn try_actions(&self) -> Vec<Action> {
        if self.is_cancelled() {
            return Vec::new();
        }
        self.rx.try_iter().collect()
    }

    /// Block until the next action. `None` once both fetches have reported
    /// or the handle was cancelled.
    pub fn next_action(&self) -> Option<Action> {
        if self.is_cancelled() {
            return None;
        }
        let action = self.rx.recv().ok()?;
        if self.is_cancelled() {
            return None;
        }
        Some(action)
    }

    /// Wait for both workers to exit
    pub fn join(mut self) {
        for worker in std::mem::take(&mut self.workers) {
            let name = worker.thread().name().unwrap_or("loader").to_string();
            if worker.join().is_err() {
                warn!(thread = %name, "loader thread panicked");
            }
        }
    }
}

impl Drop for LoaderHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
