//! Shared User-Agent strings for catalog and download HTTP clients.
//!
//! Single source for the project URL and UA format so catalog and asset
//! traffic stay consistent.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/harvester";

/// Default User-Agent for asset downloads.
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("harvester/{version} (archival-download; +{PROJECT_UA_URL})")
}

/// Default User-Agent for catalog API requests.
#[must_use]
pub(crate) fn default_catalog_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("harvester/{version} (catalog-client; +{PROJECT_UA_URL})")
}
