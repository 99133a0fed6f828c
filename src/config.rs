//! Run configuration.
//!
//! [`HarvestConfig`] carries every setting a harvest run needs, resolved up
//! front by the caller (CLI flags, environment). Derived file locations follow
//! the fixed layout:
//!
//! ```text
//! {work_dir}/results_{id}.json
//! {work_dir}/output_{id}/{id}_{slug(title)}/records_{id}.csv
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::catalog::DEFAULT_BASE_URL;
use crate::download::{MAX_CONCURRENCY, default_concurrency};
use crate::record::is_plain_component;

/// Example parent series used when no id is given.
pub const DEFAULT_PARENT_ID: &str = "5573655";

/// Records requested per run.
pub const DEFAULT_LIMIT: u32 = 50;

/// Environment variable holding the catalog API key.
pub const DEFAULT_API_KEY_VAR: &str = "NARA_KEY";

/// Invalid run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The parent id is empty or would escape the output layout.
    #[error("invalid parent id {id:?}: must be non-empty and contain no path separators or whitespace")]
    InvalidParentId {
        /// The rejected id.
        id: String,
    },

    /// A limit of zero would fetch nothing.
    #[error("limit must be at least 1")]
    ZeroLimit,

    /// Concurrency outside the accepted range.
    #[error("invalid concurrency value {value}: must be between 1 and {MAX_CONCURRENCY}")]
    InvalidConcurrency {
        /// The rejected value.
        value: usize,
    },
}

/// Settings for one harvest run.
#[derive(Clone)]
pub struct HarvestConfig {
    /// Parent record (series) whose children are harvested.
    pub parent_id: String,
    /// Maximum number of records requested.
    pub limit: u32,
    /// Stop after writing the raw JSON dump.
    pub no_download: bool,
    /// Catalog API key, sent as `x-api-key`.
    pub api_key: String,
    /// Catalog API base URL.
    pub base_url: String,
    /// Directory that receives the JSON dump and the output tree.
    pub work_dir: PathBuf,
    /// Download worker count.
    pub concurrency: usize,
}

impl HarvestConfig {
    /// Creates a configuration with default limit, base URL, working
    /// directory and concurrency.
    pub fn new(parent_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            limit: DEFAULT_LIMIT,
            no_download: false,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            work_dir: PathBuf::from("."),
            concurrency: default_concurrency(),
        }
    }

    /// Checks the settings before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable parent id, a zero limit, or an
    /// out-of-range concurrency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let id = &self.parent_id;
        if !is_plain_component(id) || id.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidParentId { id: id.clone() });
        }
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if !(1..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(ConfigError::InvalidConcurrency {
                value: self.concurrency,
            });
        }
        Ok(())
    }

    /// Path of the raw response dump, `results_{id}.json`.
    #[must_use]
    pub fn json_out(&self) -> PathBuf {
        self.work_dir.join(format!("results_{}.json", self.parent_id))
    }

    /// Root of the per-record output tree, `output_{id}`.
    #[must_use]
    pub fn output_root(&self) -> PathBuf {
        self.work_dir.join(format!("output_{}", self.parent_id))
    }
}

impl fmt::Debug for HarvestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarvestConfig")
            .field("parent_id", &self.parent_id)
            .field("limit", &self.limit)
            .field("no_download", &self.no_download)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("work_dir", &self.work_dir)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

/// Loads a `.env` file from the current directory or its ancestors.
///
/// A missing file is not an error; existing environment variables win.
#[instrument]
pub fn load_env_file() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env file");
            Some(path)
        }
        Err(error) => {
            debug!(%error, "no .env file loaded");
            None
        }
    }
}

/// Loads a `.env` file from an explicit path.
///
/// # Errors
///
/// Returns the `dotenvy` error when the file is missing or malformed.
pub fn load_env_file_from(path: &Path) -> Result<(), dotenvy::Error> {
    dotenvy::from_path(path)
}

/// Reads the API key from `var`. Empty values count as unset.
#[must_use]
pub fn load_api_key(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HarvestConfig::new(DEFAULT_PARENT_ID, "key");
        assert_eq!(config.limit, 50);
        assert!(!config.no_download);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.concurrency >= 1);
        config.validate().unwrap();
    }

    #[test]
    fn test_config_derived_paths() {
        let mut config = HarvestConfig::new("123", "key");
        config.work_dir = PathBuf::from("/data");
        assert_eq!(config.json_out(), PathBuf::from("/data/results_123.json"));
        assert_eq!(config.output_root(), PathBuf::from("/data/output_123"));
    }

    #[test]
    fn test_config_rejects_bad_parent_ids() {
        for id in ["", "a/b", "a\\b", "..", ".", "12 34"] {
            let config = HarvestConfig::new(id, "key");
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidParentId { .. })),
                "expected {id:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_config_rejects_zero_limit() {
        let mut config = HarvestConfig::new("1", "key");
        config.limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLimit)));
    }

    #[test]
    fn test_config_rejects_out_of_range_concurrency() {
        let mut config = HarvestConfig::new("1", "key");
        config.concurrency = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConcurrency { value: 0 })
        ));
        config.concurrency = MAX_CONCURRENCY + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = HarvestConfig::new("1", "super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_load_api_key_missing_variable() {
        assert_eq!(load_api_key("HARVESTER_TEST_KEY_THAT_IS_NEVER_SET"), None);
    }

    #[test]
    fn test_load_env_file_from_missing_path_errors() {
        assert!(load_env_file_from(Path::new("/definitely/not/here/.env")).is_err());
    }
}
