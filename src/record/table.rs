//! Per-record asset tables.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::extract::{
    DEFAULT_ASSETS_KEY, DEFAULT_RECORD_PATH, ExtractedRecord, RecordMeta, extract,
};

/// Field holding an asset's source URL.
pub const OBJECT_URL_FIELD: &str = "objectUrl";

/// Field holding an asset's original filename.
pub const OBJECT_FILENAME_FIELD: &str = "objectFilename";

/// One digital object attached to a record.
///
/// `objectUrl` and `objectFilename` are lifted out when they are strings; every
/// other field is kept verbatim, in source order, in `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetRef {
    /// Source location of the file.
    pub object_url: Option<String>,
    /// Original filename, used as the local filename.
    pub object_filename: Option<String>,
    /// Passthrough descriptive fields.
    pub extra: Map<String, Value>,
}

impl AssetRef {
    /// Builds a row from one entry of a digital-object list.
    ///
    /// Non-object entries produce an empty row so row counts stay aligned with
    /// the source list.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            debug!("digital object entry is not an object, keeping empty row");
            return Self::default();
        };

        let mut row = Self::default();
        for (key, field) in fields {
            match (key.as_str(), field) {
                (OBJECT_URL_FIELD, Value::String(url)) => row.object_url = Some(url.clone()),
                (OBJECT_FILENAME_FIELD, Value::String(name)) => {
                    row.object_filename = Some(name.clone());
                }
                _ => {
                    row.extra.insert(key.clone(), field.clone());
                }
            }
        }
        row
    }

    /// Returns the field names of this row in manifest order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        let url = self.object_url.as_ref().map(|_| OBJECT_URL_FIELD);
        let filename = self.object_filename.as_ref().map(|_| OBJECT_FILENAME_FIELD);
        url.into_iter()
            .chain(filename)
            .chain(self.extra.keys().map(String::as_str))
    }

    /// Renders a field as manifest text. Missing fields render as `""`.
    #[must_use]
    pub fn field_text(&self, name: &str) -> String {
        match name {
            OBJECT_URL_FIELD if self.object_url.is_some() => {
                self.object_url.clone().unwrap_or_default()
            }
            OBJECT_FILENAME_FIELD if self.object_filename.is_some() => {
                self.object_filename.clone().unwrap_or_default()
            }
            _ => self.extra.get(name).map(render_value).unwrap_or_default(),
        }
    }
}

/// Ordered asset rows for a single record.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetTable {
    /// Record the assets belong to.
    pub meta: RecordMeta,
    /// Rows in source order.
    pub rows: Vec<AssetRef>,
}

impl AssetTable {
    /// Number of asset rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the record lists no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of all row field names, in first-seen order.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for name in row.field_names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }
        columns
    }
}

/// Converts an extracted record into an asset table.
///
/// Returns `None` only when `extracted` is `None`. A single object under the
/// assets key is treated as a one-row list; any other non-list value yields an
/// empty table.
#[must_use]
pub fn build_table(extracted: Option<ExtractedRecord>) -> Option<AssetTable> {
    let ExtractedRecord { meta, assets } = extracted?;

    let rows = match &assets {
        Value::Array(entries) => entries.iter().map(AssetRef::from_value).collect(),
        Value::Object(_) => vec![AssetRef::from_value(&assets)],
        other => {
            debug!(id = %meta.id, kind = value_kind(other), "digital objects value is not a list");
            Vec::new()
        }
    };

    Some(AssetTable { meta, rows })
}

/// Extracts and tabulates every hit that carries digital objects.
///
/// Uses [`DEFAULT_RECORD_PATH`] and [`DEFAULT_ASSETS_KEY`]. Hits without assets
/// are dropped.
#[must_use]
#[instrument(skip(hits), fields(hits = hits.len()))]
pub fn records_to_tables(hits: &[Value]) -> Vec<AssetTable> {
    let tables: Vec<AssetTable> = hits
        .iter()
        .filter_map(|hit| build_table(extract(hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY)))
        .collect();
    debug!(records = tables.len(), "records with digital objects");
    tables
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
