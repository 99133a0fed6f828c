//! HTTP client for the catalog's `parentNaId` endpoint.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::CatalogError;
use crate::download::CONNECT_TIMEOUT_SECS;
use crate::record::get_path;
use crate::user_agent;

/// Public catalog API base.
pub const DEFAULT_BASE_URL: &str = "https://catalog.archives.gov/api/v2/records";

/// Location of the hit list in a catalog response.
pub const HITS_PATH: &[&str] = &["body", "hits", "hits"];

/// Location of the reported total record count in a catalog response.
pub const TOTAL_PATH: &[&str] = &["body", "hits", "total", "value"];

const API_KEY_HEADER: &str = "x-api-key";

/// One page of catalog results.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    /// The full decoded response.
    pub body: Value,
    /// Total matching records reported by the catalog, when present.
    pub total: Option<u64>,
    /// Raw per-record hits, in response order.
    pub hits: Vec<Value>,
}

impl CatalogPage {
    /// Splits a decoded response into hits and total.
    ///
    /// A response without `body.hits.hits` yields an empty hit list.
    #[must_use]
    pub fn from_body(body: Value) -> Self {
        let total = get_path(&body, TOTAL_PATH).and_then(Value::as_u64);
        let hits = get_path(&body, HITS_PATH)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Self { body, total, hits }
    }

    /// Returns true when the catalog holds more records than `limit` returned.
    #[must_use]
    pub fn is_truncated(&self, limit: u32) -> bool {
        self.total.is_some_and(|total| total > u64::from(limit))
    }
}

/// Client for the catalog records API.
///
/// Created once per run; the API key is sent on every request.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    /// Creates a client for `base_url` authenticating with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(user_agent::default_catalog_user_agent())
            .build()
            .map_err(CatalogError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Builds the request URL for a parent id and limit.
    ///
    /// The parent id is appended as one escaped path segment.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] if the base URL is malformed or
    /// cannot carry a path.
    pub fn request_url(&self, parent_id: &str, limit: u32) -> Result<Url, CatalogError> {
        let invalid = || CatalogError::invalid_url(self.base_url.as_str());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .push("parentNaId")
            .push(parent_id);
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        Ok(url)
    }

    /// Fetches the first page of children of `parent_id`.
    ///
    /// The raw response body is written to `json_out` before it is decoded, so
    /// the fetched data survives any later failure. When the catalog reports
    /// more records than `limit`, a warning is logged and the partial page is
    /// still returned.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Network`] on transport failure
    /// - [`CatalogError::HttpStatus`] on any non-2xx status
    /// - [`CatalogError::Io`] if the raw response cannot be written
    /// - [`CatalogError::Decode`] if the body is not JSON
    #[instrument(skip(self, json_out), fields(json_out = %json_out.display()))]
    pub async fn fetch_page(
        &self,
        parent_id: &str,
        limit: u32,
        json_out: &Path,
    ) -> Result<CatalogPage, CatalogError> {
        let url = self.request_url(parent_id, limit)?;
        let url_text = url.to_string();
        debug!(url = %url_text, "requesting catalog page");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| CatalogError::network(url_text.clone(), e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "catalog responded");
        if !status.is_success() {
            return Err(CatalogError::http_status(url_text, status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::network(url_text.clone(), e))?;

        tokio::fs::write(json_out, &bytes)
            .await
            .map_err(|e| CatalogError::io(json_out, e))?;
        info!(path = %json_out.display(), bytes = bytes.len(), "results written");

        let body: Value = serde_json::from_slice(&bytes).map_err(|source| CatalogError::Decode {
            url: url_text,
            source,
        })?;

        let page = CatalogPage::from_body(body);
        if page.is_truncated(limit) {
            warn!(
                limit,
                total = page.total.unwrap_or_default(),
                "limit is lower than the number of available records; only the first page was fetched"
            );
        }
        debug!(hits = page.hits.len(), total = ?page.total, "catalog page decoded");

        Ok(page)
    }
}
