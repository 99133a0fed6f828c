//! Output planning for harvested records.
//!
//! Each record gets its own directory under the output root, named
//! `{id}_{slug(title)}`. Planning creates that directory, writes the
//! `records_{id}.csv` manifest, and yields one [`DownloadItem`] per asset row.
//!
//! Planning happens for every record before any download starts.

mod error;
mod manifest;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

pub use error::PlanError;
pub use manifest::{PATH_COLUMN, write_manifest};

use crate::download::DownloadItem;
use crate::record::{AssetRef, AssetTable, is_plain_component, slug};

/// Derived output locations and download work for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    /// Record directory, `output_root/{id}_{slug(title)}`.
    pub directory: PathBuf,
    /// Manifest path, `directory/records_{id}.csv`.
    pub manifest_path: PathBuf,
    /// One item per asset row, in row order.
    pub download_items: Vec<DownloadItem>,
}

/// Returns the record directory name, `{id}_{slug(title)}`.
#[must_use]
pub fn record_dir_name(id: &str, title: &str) -> String {
    format!("{id}_{}", slug(title))
}

/// Returns the manifest filename for a record, `records_{id}.csv`.
#[must_use]
pub fn manifest_file_name(id: &str) -> String {
    format!("records_{id}.csv")
}

/// Plans output for one record.
///
/// Creates the record directory (and ancestors) if needed, overwrites the
/// manifest, and maps each row to `(objectUrl, directory/objectFilename)`.
///
/// Rows without a usable URL or filename still appear in the manifest (with
/// an empty `path`) and produce a rejected [`DownloadItem`], which the engine
/// reports as failed. Rows sharing a filename all stay in the manifest, but
/// only the last of them becomes a download item, so every destination is
/// written by at most one worker.
///
/// # Errors
///
/// Returns [`PlanError`] if the directory cannot be created or the manifest
/// cannot be written. Both abort the run.
#[instrument(skip(table), fields(id = %table.meta.id, rows = table.len()))]
pub fn plan(output_root: &Path, table: &AssetTable) -> Result<OutputPlan, PlanError> {
    let meta = &table.meta;
    let directory = output_root.join(record_dir_name(&meta.id, &meta.title));

    fs::create_dir_all(&directory).map_err(|e| PlanError::create_dir(&directory, e))?;

    let destinations: Vec<Result<PathBuf, String>> = table
        .rows
        .iter()
        .map(|row| destination_for(&directory, row))
        .collect();

    let manifest_path = directory.join(manifest_file_name(&meta.id));
    write_manifest(&manifest_path, table, &destinations)?;

    let mut download_items: Vec<DownloadItem> = Vec::with_capacity(table.len());
    for (row, destination) in table.rows.iter().zip(destinations) {
        let url = row.object_url.clone().unwrap_or_default();
        let item = match destination {
            Ok(path) => {
                if let Some(earlier) = download_items
                    .iter()
                    .position(|item| item.rejected.is_none() && item.destination == path)
                {
                    debug!(
                        path = %path.display(),
                        "duplicate objectFilename, later row replaces earlier"
                    );
                    download_items.remove(earlier);
                }
                DownloadItem::new(url, path)
            }
            Err(reason) => DownloadItem::rejected(url, &directory, reason),
        };
        download_items.push(item);
    }

    debug!(directory = %directory.display(), "record planned");

    Ok(OutputPlan {
        directory,
        manifest_path,
        download_items,
    })
}

/// Resolves a row's destination, or explains why it has none.
fn destination_for(directory: &Path, row: &AssetRef) -> Result<PathBuf, String> {
    match row.object_url.as_deref() {
        Some(url) if !url.trim().is_empty() => {}
        _ => return Err("asset has no objectUrl".to_string()),
    }

    let Some(filename) = row.object_filename.as_deref() else {
        return Err("asset has no objectFilename".to_string());
    };
    if !is_plain_component(filename) {
        return Err(format!("objectFilename {filename:?} is not a plain file name"));
    }

    Ok(directory.join(filename))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use serde_json::json;
    use tempfile::TempDir;

    use crate::record::{ExtractedRecord, RecordMeta, build_table};

    fn table(id: &str, title: &str, assets: serde_json::Value) -> AssetTable {
        build_table(Some(ExtractedRecord {
            meta: RecordMeta {
                record_type: "item".to_string(),
                title: title.to_string(),
                id: id.to_string(),
            },
            assets,
        }))
        .unwrap()
    }

    #[test]
    fn test_record_dir_name_uses_id_and_slug() {
        assert_eq!(
            record_dir_name("5573655", "Civil War Photographs, 1861"),
            "5573655_civil_war_photographs_1861"
        );
    }

    #[test]
    fn test_plan_creates_directory_and_items() {
        let temp_dir = TempDir::new().unwrap();
        let table = table(
            "12",
            "Field Notes",
            json!([
                { "objectUrl": "https://x/a.jpg", "objectFilename": "a.jpg" },
                { "objectUrl": "https://x/b.pdf", "objectFilename": "b.pdf" }
            ]),
        );

        let plan = plan(temp_dir.path(), &table).unwrap();

        assert_eq!(plan.directory, temp_dir.path().join("12_field_notes"));
        assert!(plan.directory.is_dir());
        assert_eq!(plan.manifest_path, plan.directory.join("records_12.csv"));
        assert!(plan.manifest_path.is_file());
        assert_eq!(
            plan.download_items,
            vec![
                DownloadItem::new("https://x/a.jpg", plan.directory.join("a.jpg")),
                DownloadItem::new("https://x/b.pdf", plan.directory.join("b.pdf")),
            ]
        );
    }

    #[test]
    fn test_plan_creates_missing_ancestors() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("output_1").join("nested");
        let table = table("1", "t", json!([]));

        let plan = plan(&root, &table).unwrap();

        assert!(plan.directory.starts_with(&root));
        assert!(plan.directory.is_dir());
        assert!(plan.download_items.is_empty());
    }

    #[test]
    fn test_plan_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let table = table(
            "9",
            "Same",
            json!([{ "objectUrl": "https://x/a", "objectFilename": "a" }]),
        );

        let first = plan(temp_dir.path(), &table).unwrap();
        let second = plan(temp_dir.path(), &table).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_plan_duplicate_filenames_keep_last_row_only() {
        let temp_dir = TempDir::new().unwrap();
        let table = table(
            "3",
            "Dupes",
            json!([
                { "objectUrl": "https://x/v1/a.jpg", "objectFilename": "a.jpg" },
                { "objectUrl": "https://x/b.jpg", "objectFilename": "b.jpg" },
                { "objectUrl": "https://x/v2/a.jpg", "objectFilename": "a.jpg" }
            ]),
        );

        let plan = plan(temp_dir.path(), &table).unwrap();

        assert_eq!(
            plan.download_items,
            vec![
                DownloadItem::new("https://x/b.jpg", plan.directory.join("b.jpg")),
                DownloadItem::new("https://x/v2/a.jpg", plan.directory.join("a.jpg")),
            ]
        );
        let manifest = std::fs::read_to_string(&plan.manifest_path).unwrap();
        assert_eq!(manifest.lines().count(), 4, "every row stays in the manifest");
        assert!(manifest.contains("https://x/v1/a.jpg"));
    }

    #[test]
    fn test_plan_rejected_rows_are_never_merged() {
        let temp_dir = TempDir::new().unwrap();
        let table = table(
            "8",
            "Nameless",
            json!([{ "objectUrl": "https://x/1" }, { "objectUrl": "https://x/2" }]),
        );

        let plan = plan(temp_dir.path(), &table).unwrap();

        assert_eq!(plan.download_items.len(), 2);
        assert!(plan.download_items.iter().all(|item| item.rejected.is_some()));
    }

    #[test]
    fn test_plan_rejects_degenerate_rows() {
        let temp_dir = TempDir::new().unwrap();
        let table = table(
            "4",
            "Broken",
            json!([
                { "objectUrl": "https://x/a.jpg" },
                { "objectUrl": "https://x/b.jpg", "objectFilename": "" },
                { "objectUrl": "https://x/c.jpg", "objectFilename": "../c.jpg" },
                { "objectFilename": "d.jpg" },
                { "objectUrl": "https://x/e.jpg", "objectFilename": "e.jpg" }
            ]),
        );

        let plan = plan(temp_dir.path(), &table).unwrap();

        let rejected: Vec<bool> = plan
            .download_items
            .iter()
            .map(|item| item.rejected.is_some())
            .collect();
        assert_eq!(rejected, [true, true, true, true, false]);
        assert_eq!(plan.download_items[2].destination, plan.directory);
    }

    #[test]
    fn test_plan_fails_when_root_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("not_a_dir");
        std::fs::write(&root, b"file").unwrap();
        let table = table("5", "t", json!([]));

        let result = plan(&root, &table);

        assert!(matches!(result, Err(PlanError::CreateDir { .. })));
    }
}
