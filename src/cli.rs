//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use harvester_core::catalog::DEFAULT_BASE_URL;
use harvester_core::{
    DEFAULT_API_KEY_VAR, DEFAULT_LIMIT, DEFAULT_PARENT_ID, HarvestConfig, default_concurrency,
};

/// Download digitized NARA records based on parent series ID.
///
/// Fetches the children of a catalog series, writes the raw response to
/// results_{id}.json, then saves each digitized record's files and manifest
/// under output_{id}/.
#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(author, version, about)]
pub struct Args {
    /// NARA parent series ID
    #[arg(short, long, default_value = DEFAULT_PARENT_ID)]
    pub id: String,

    /// Total number of records to fetch
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub limit: u32,

    /// Don't download files, just make the request and write the JSON
    #[arg(short = 'n', long = "no_download", visible_alias = "no-download")]
    pub no_download: bool,

    /// Maximum concurrent downloads, 1-100 (default: CPU count minus one)
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// Directory that receives results_{id}.json and output_{id}/
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Catalog API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Environment variable holding the API key
    #[arg(long, default_value = DEFAULT_API_KEY_VAR)]
    pub key_var: String,

    /// Load environment variables from this file instead of searching for .env
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds the run configuration from parsed flags and the resolved key.
    pub fn into_config(self, api_key: String) -> HarvestConfig {
        let mut config = HarvestConfig::new(self.id, api_key);
        config.limit = self.limit;
        config.no_download = self.no_download;
        config.base_url = self.base_url;
        config.work_dir = self.output_dir;
        config.concurrency = self
            .concurrency
            .map_or_else(default_concurrency, usize::from);
        config
    }
}
