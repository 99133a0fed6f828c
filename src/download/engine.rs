//! Download engine for concurrent, single-attempt asset downloads.
//!
//! The engine drains a fixed list of [`DownloadItem`]s using a
//! semaphore-bounded pool of Tokio tasks. Each item ends in exactly one
//! [`DownloadOutcome`]:
//!
//! - `Skipped` when the destination already exists (no request is sent)
//! - `Written` when the asset was fetched with HTTP 200 and stored
//! - `Failed` for anything else; the batch keeps going
//!
//! The existence check and the write are not atomic. Two runs racing on the
//! same path may both fetch it, but each write truncates its own file.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::HttpClient;
use super::constants::MAX_CONCURRENCY;

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Default worker count: host parallelism minus one, never below one.
#[must_use]
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map_or(MIN_CONCURRENCY, |n| n.get().saturating_sub(1))
        .clamp(MIN_CONCURRENCY, MAX_CONCURRENCY)
}

/// Error type for download engine operations.
///
/// Individual download failures are not errors; see [`DownloadOutcome::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// One asset to fetch: source URL and destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    /// Source URL.
    pub url: String,
    /// Destination file path.
    pub destination: PathBuf,
    /// Why the item cannot be attempted, if it was rejected while planning.
    pub rejected: Option<String>,
}

impl DownloadItem {
    /// Creates an item to fetch `url` into `destination`.
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            rejected: None,
        }
    }

    /// Creates an item that will be reported as failed without being attempted.
    pub fn rejected(
        url: impl Into<String>,
        destination: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            rejected: Some(reason.into()),
        }
    }
}

/// Terminal state of one download item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The asset was fetched and written.
    Written(PathBuf),
    /// The destination already existed; nothing was requested.
    Skipped(PathBuf),
    /// The item could not be completed.
    Failed {
        /// Source URL.
        url: String,
        /// Intended destination.
        path: PathBuf,
        /// Status or error description.
        reason: String,
    },
}

impl DownloadOutcome {
    /// Returns true for [`DownloadOutcome::Failed`].
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Counters for a download batch.
///
/// Shared through an `Arc` so progress displays can poll while the batch runs.
#[derive(Debug, Default)]
pub struct DownloadStats {
    queued: AtomicUsize,
    written: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items handed to the current batch.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    /// Returns the number of assets written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }

    /// Returns the number of assets skipped because they already existed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Returns the number of failed items.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the number of items that reached a terminal state.
    #[must_use]
    pub fn total(&self) -> usize {
        self.written() + self.skipped() + self.failed()
    }

    fn record(&self, outcome: &DownloadOutcome) {
        let counter = match outcome {
            DownloadOutcome::Written(_) => &self.written,
            DownloadOutcome::Skipped(_) => &self.skipped,
            DownloadOutcome::Failed { .. } => &self.failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// Download engine for concurrent, single-attempt downloads.
///
/// # Concurrency Model
///
/// - Each item runs in its own Tokio task
/// - A semaphore permit is acquired before each task is spawned
/// - Permits are released automatically when a task finishes (RAII)
/// - Outcomes are returned in input order; completion order is unspecified
#[derive(Debug)]
pub struct DownloadEngine {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
    stats: Arc<DownloadStats>,
}

impl DownloadEngine {
    /// Creates a new engine with the given worker count.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// 1..=[`MAX_CONCURRENCY`].
    ///
    /// # Example
    ///
    /// ```
    /// use harvester_core::download::DownloadEngine;
    ///
    /// let engine = DownloadEngine::new(4).unwrap();
    /// assert_eq!(engine.concurrency(), 4);
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            stats: Arc::new(DownloadStats::new()),
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns a handle to the live batch counters.
    #[must_use]
    pub fn stats(&self) -> Arc<DownloadStats> {
        Arc::clone(&self.stats)
    }

    /// Downloads every item, at most `concurrency` at a time.
    ///
    /// Returns one outcome per item, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    /// Individual download failures do NOT cause this method to error.
    #[instrument(skip(self, client, items), fields(items = items.len()))]
    pub async fn download_all(
        &self,
        client: &HttpClient,
        items: Vec<DownloadItem>,
    ) -> Result<Vec<DownloadOutcome>, EngineError> {
        info!(concurrency = self.concurrency, "starting downloads");
        self.stats.queued.fetch_add(items.len(), Ordering::SeqCst);

        let mut handles = Vec::with_capacity(items.len());
        for item in items {
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let client = client.clone();
            let stats = Arc::clone(&self.stats);
            let fallback = (item.url.clone(), item.destination.clone());

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let outcome = download_one(&client, item).await;
                stats.record(&outcome);
                outcome
            });
            handles.push((handle, fallback));
        }

        debug!(task_count = handles.len(), "waiting for downloads to complete");

        let mut outcomes = Vec::with_capacity(handles.len());
        for (handle, (url, path)) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(url = %url, error = %e, "download task panicked");
                    let outcome = DownloadOutcome::Failed {
                        url,
                        path,
                        reason: format!("download task failed: {e}"),
                    };
                    self.stats.record(&outcome);
                    outcome
                }
            };
            outcomes.push(outcome);
        }

        info!(
            written = self.stats.written(),
            skipped = self.stats.skipped(),
            failed = self.stats.failed(),
            "downloads complete"
        );

        Ok(outcomes)
    }
}

/// Runs one item through `Pending -> {Skipped | Written | Failed}`.
#[instrument(skip(client, item), fields(url = %item.url, path = %item.destination.display()))]
async fn download_one(client: &HttpClient, item: DownloadItem) -> DownloadOutcome {
    let DownloadItem {
        url,
        destination,
        rejected,
    } = item;

    if let Some(reason) = rejected {
        warn!(%reason, "download item rejected");
        return DownloadOutcome::Failed {
            url,
            path: destination,
            reason,
        };
    }

    if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
        debug!("destination exists, skipping");
        return DownloadOutcome::Skipped(destination);
    }

    match client.download_to_path(&url, &destination).await {
        Ok(bytes) => {
            debug!(bytes, "download completed");
            DownloadOutcome::Written(destination)
        }
        Err(e) => {
            debug!(error = %e, "download failed");
            DownloadOutcome::Failed {
                url,
                path: destination,
                reason: e.to_string(),
            }
        }
    }
}
