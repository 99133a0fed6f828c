//! National Archives catalog API access.
//!
//! Fetches the children of a parent record in one request, persists the raw
//! response body, and exposes the hit list and reported total.

mod client;
mod error;

pub use client::{CatalogClient, CatalogPage, DEFAULT_BASE_URL, HITS_PATH, TOTAL_PATH};
pub use error::CatalogError;
