//! `records_{id}.csv` manifest writer.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::PlanError;
use crate::record::AssetTable;

/// Name of the derived local-path column.
pub const PATH_COLUMN: &str = "path";

/// Writes the manifest for `table`, replacing any previous file.
///
/// Columns are the union of all asset fields in first-seen order, followed
/// by [`PATH_COLUMN`]. `destinations` holds one entry per row; rows without a
/// destination get an empty path cell. A passthrough field named `path` is
/// shadowed by the derived column.
///
/// # Errors
///
/// Returns [`PlanError::Manifest`] if the file cannot be created or written.
pub fn write_manifest<E>(
    manifest_path: &Path,
    table: &AssetTable,
    destinations: &[Result<PathBuf, E>],
) -> Result<(), PlanError> {
    let to_error = |e: csv::Error| PlanError::manifest(manifest_path, e);

    let columns: Vec<String> = table
        .columns()
        .into_iter()
        .filter(|c| c != PATH_COLUMN)
        .collect();

    let mut writer = csv::Writer::from_path(manifest_path).map_err(to_error)?;

    writer
        .write_record(columns.iter().map(String::as_str).chain([PATH_COLUMN]))
        .map_err(to_error)?;

    for (row, destination) in table.rows.iter().zip(destinations) {
        let path = destination
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let mut record: Vec<String> = columns.iter().map(|c| row.field_text(c)).collect();
        record.push(path);
        writer.write_record(&record).map_err(to_error)?;
    }

    writer
        .flush()
        .map_err(|e| PlanError::manifest(manifest_path, e.into()))?;

    debug!(path = %manifest_path.display(), rows = table.len(), "manifest written");
    Ok(())
}
