//! Per-asset download failures.
//!
//! None of these abort a batch. The engine folds each one into a
//! [`DownloadOutcome::Failed`](super::DownloadOutcome::Failed) carrying the
//! rendered message.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single asset could not be saved.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request never produced a usable response, or the body stream broke.
    #[error("transport failure fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 200.
    #[error("asset {url} answered HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The destination file could not be created or written.
    #[error("cannot write asset to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `objectUrl` did not parse as an absolute URL.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("failed to build download HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl DownloadError {
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// url or path the source error does not carry.
