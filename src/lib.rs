//! Harvester Core Library
//!
//! This library harvests digitized records from the National Archives
//! catalog: it fetches the children of a parent series, extracts each
//! record's digital objects, writes a per-record manifest, and downloads the
//! referenced files, skipping any that already exist.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`record`] - Nested record extraction, asset tables, title slugs
//! - [`plan`] - Per-record output directories and CSV manifests
//! - [`catalog`] - Catalog API client and raw response persistence
//! - [`download`] - Concurrent single-attempt download engine
//! - [`config`] - Run configuration and API key loading
//! - [`harvest`] - End-to-end run orchestration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod download;
pub mod harvest;
pub mod plan;
pub mod record;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use catalog::{CatalogClient, CatalogError, CatalogPage};
pub use config::{
    ConfigError, DEFAULT_API_KEY_VAR, DEFAULT_LIMIT, DEFAULT_PARENT_ID, HarvestConfig,
    load_api_key,
};
pub use download::{
    DownloadEngine, DownloadError, DownloadItem, DownloadOutcome, DownloadStats, EngineError,
    HttpClient, MAX_CONCURRENCY, default_concurrency,
};
pub use harvest::{HarvestError, HarvestReport, Harvester};
pub use plan::{OutputPlan, PlanError, plan};
pub use record::{AssetRef, AssetTable, ExtractedRecord, RecordMeta, build_table, extract, slug};
