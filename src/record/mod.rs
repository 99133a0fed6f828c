//! Record extraction from raw catalog hits.
//!
//! A catalog hit is an arbitrarily nested JSON document. This module walks it
//! down to the record subtree, projects the record metadata, and turns the
//! embedded digital-object list into an ordered asset table.
//!
//! - [`normalizer`] - title slugs and path-component checks
//! - [`extract`] - path traversal and metadata projection
//! - [`table`] - asset rows with passthrough fields

mod extract;
mod normalizer;
mod table;

pub use extract::{
    DEFAULT_ASSETS_KEY, DEFAULT_RECORD_PATH, ExtractedRecord, RecordMeta, extract, get_path,
};
pub use normalizer::{is_plain_component, slug};
pub use table::{
    AssetRef, AssetTable, OBJECT_FILENAME_FIELD, OBJECT_URL_FIELD, build_table, records_to_tables,
};
