//! Concurrent asset downloads.
//!
//! [`HttpClient`] streams one asset to a fixed destination path;
//! [`DownloadEngine`] fans a pre-computed list of [`DownloadItem`]s out over a
//! bounded worker pool and reports one [`DownloadOutcome`] per item.
//!
//! Existing destination files are skipped without a request. Each item is
//! attempted exactly once: there are no retries and no rate limiting.
//!
//! # Example
//!
//! ```no_run
//! use harvester_core::download::{DownloadEngine, DownloadItem, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let engine = DownloadEngine::new(4)?;
//! let items = vec![DownloadItem::new("https://example.com/a.jpg", "./out/a.jpg")];
//! let outcomes = engine.download_all(&client, items).await?;
//! println!("{} outcomes, {} failed", outcomes.len(), engine.stats().failed());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, MAX_CONCURRENCY};
pub use engine::{
    DownloadEngine, DownloadItem, DownloadOutcome, DownloadStats, EngineError,
    default_concurrency,
};
pub use error::DownloadError;
