//! Error types for output planning.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort planning; there is no per-record isolation.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The record directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest could not be written.
    #[error("failed to write manifest {path}: {source}")]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// The underlying CSV or IO error.
        #[source]
        source: csv::Error,
    },
}

impl PlanError {
    /// Creates a directory creation error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Creates a manifest write error.
    pub fn manifest(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Manifest {
            path: path.into(),
            source,
        }
    }
}
