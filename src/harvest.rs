//! End-to-end harvest runs.
//!
//! A run is: fetch one catalog page → persist the raw response → extract
//! records with digital objects → plan every record (directories and
//! manifests) → download all planned assets.
//!
//! Only catalog failures and planning failures abort a run. Individual
//! download failures are reported in [`HarvestReport`] and never escalate.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::catalog::{CatalogClient, CatalogError, CatalogPage};
use crate::config::{ConfigError, HarvestConfig};
use crate::download::{
    DownloadEngine, DownloadError, DownloadItem, DownloadOutcome, DownloadStats, EngineError,
    HttpClient,
};
use crate::plan::{OutputPlan, PlanError, plan};
use crate::record::records_to_tables;

/// Errors that abort a harvest run.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The run configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The catalog request failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A record directory or manifest could not be written.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// The download engine could not run.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The download client could not be built.
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    /// Where the raw catalog response was written.
    pub json_out: PathBuf,
    /// Hits returned by the catalog.
    pub hits: usize,
    /// Total records the catalog reported for the parent.
    pub total: Option<u64>,
    /// True when `total` exceeded the requested limit.
    pub truncated: bool,
    /// True when the run stopped after the raw dump.
    pub download_skipped: bool,
    /// One plan per record with digital objects.
    pub plans: Vec<OutputPlan>,
    /// One outcome per planned asset.
    pub outcomes: Vec<DownloadOutcome>,
}

impl HarvestReport {
    /// Number of records with digital objects.
    #[must_use]
    pub fn records(&self) -> usize {
        self.plans.len()
    }

    /// Number of assets written.
    #[must_use]
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Written(_)))
    }

    /// Number of assets skipped because they already existed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Skipped(_)))
    }

    /// Number of failed assets.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(DownloadOutcome::is_failed)
    }

    /// Failed outcomes, for diagnostics.
    pub fn failures(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    fn count(&self, predicate: impl Fn(&DownloadOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|&o| predicate(o)).count()
    }
}

/// Runs harvests for one configuration.
#[derive(Debug)]
pub struct Harvester {
    config: HarvestConfig,
    engine: DownloadEngine,
}

impl Harvester {
    /// Validates `config` and prepares the download engine.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Config`] or [`HarvestError::Engine`] for
    /// invalid settings.
    pub fn new(config: HarvestConfig) -> Result<Self, HarvestError> {
        config.validate()?;
        let engine = DownloadEngine::new(config.concurrency)?;
        Ok(Self { config, engine })
    }

    /// Returns the run configuration.
    #[must_use]
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Live download counters, usable for progress display during [`run`](Self::run).
    #[must_use]
    pub fn stats(&self) -> Arc<DownloadStats> {
        self.engine.stats()
    }

    /// Executes the whole run.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError`] when the catalog fetch fails or a record cannot
    /// be planned. Download failures are reported, not returned.
    #[instrument(skip(self), fields(parent_id = %self.config.parent_id, limit = self.config.limit))]
    pub async fn run(&self) -> Result<HarvestReport, HarvestError> {
        let page = self.fetch().await?;

        let mut report = HarvestReport {
            json_out: self.config.json_out(),
            hits: page.hits.len(),
            total: page.total,
            truncated: page.is_truncated(self.config.limit),
            ..HarvestReport::default()
        };

        if self.config.no_download {
            info!(path = %report.json_out.display(), "skipping download");
            report.download_skipped = true;
            return Ok(report);
        }

        report.plans = self.plan_records(&page)?;
        if report.plans.is_empty() {
            info!("no digitized records found");
            return Ok(report);
        }
        info!(records = report.plans.len(), "digitized records found");

        report.outcomes = self.download(&report.plans).await?;

        for failure in report.failures() {
            if let DownloadOutcome::Failed { url, path, reason } = failure {
                warn!(url = %url, path = %path.display(), %reason, "asset download failed");
            }
        }

        Ok(report)
    }

    /// Fetches the catalog page and writes the raw dump.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Catalog`] on any catalog failure.
    pub async fn fetch(&self) -> Result<CatalogPage, HarvestError> {
        let client = CatalogClient::new(&self.config.base_url, &self.config.api_key)?;
        let page = client
            .fetch_page(&self.config.parent_id, self.config.limit, &self.config.json_out())
            .await?;
        Ok(page)
    }

    /// Plans every hit that carries digital objects.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Plan`] on the first directory or manifest failure.
    pub fn plan_records(&self, page: &CatalogPage) -> Result<Vec<OutputPlan>, HarvestError> {
        let output_root = self.config.output_root();
        let plans = records_to_tables(&page.hits)
            .iter()
            .map(|table| plan(&output_root, table))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(plans)
    }

    /// Downloads every item of every plan.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError`] only if the client or engine cannot run.
    pub async fn download(
        &self,
        plans: &[OutputPlan],
    ) -> Result<Vec<DownloadOutcome>, HarvestError> {
        let items: Vec<DownloadItem> = plans
            .iter()
            .flat_map(|plan| plan.download_items.iter().cloned())
            .collect();
        let client = HttpClient::new()?;
        Ok(self.engine.download_all(&client, items).await?)
    }
}
