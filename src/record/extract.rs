//! Path traversal into raw catalog hits and record metadata projection.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::normalizer::is_plain_component;

/// Path from a catalog hit to its record subtree.
pub const DEFAULT_RECORD_PATH: &[&str] = &["_source", "record"];

/// Key of the digital-object list inside the record subtree.
pub const DEFAULT_ASSETS_KEY: &str = "digitalObjects";

/// Metadata projected from a record subtree.
///
/// `id` comes from the catalog's `naId`, which the API returns as a number;
/// string identifiers are accepted as well. `recordType` and `title` fall back
/// to `""` when missing, `null`, or not text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Catalog record type, e.g. `item` or `fileUnit`.
    #[serde(rename = "recordType", default, deserialize_with = "deserialize_lenient_text")]
    pub record_type: String,
    /// Human-readable record title.
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub title: String,
    /// National Archives identifier.
    #[serde(rename = "naId", deserialize_with = "deserialize_identifier")]
    pub id: String,
}

/// A record subtree that carries a digital-object list.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRecord {
    /// Projected record metadata.
    pub meta: RecordMeta,
    /// Raw value found under the assets key, normally a list of objects.
    pub assets: Value,
}

/// Follows `path` through nested JSON objects.
///
/// Returns `None` as soon as a key is missing or an intermediate value is not
/// an object. An empty path returns `value` itself.
#[must_use]
pub fn get_path<'a, S: AsRef<str>>(value: &'a Value, path: &[S]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(key.as_ref()))
}

/// Extracts record metadata and the raw asset list from one catalog hit.
///
/// Returns `None` when the record subtree is missing, is not an object, has no
/// `assets_key`, or has no usable `naId`. An `naId` that is not a single plain
/// path component is unusable, since it names the record's output directory.
/// Records without digitized files are common, so none of these cases is an
/// error.
#[must_use]
pub fn extract<S: AsRef<str>>(
    raw: &Value,
    path: &[S],
    assets_key: &str,
) -> Option<ExtractedRecord> {
    let Some(record) = get_path(raw, path).filter(|v| v.is_object()) else {
        trace!("record path not present in hit");
        return None;
    };

    let assets = record.get(assets_key)?;

    let meta = match RecordMeta::deserialize(record) {
        Ok(meta) => meta,
        Err(error) => {
            debug!(%error, "record metadata not usable, skipping");
            return None;
        }
    };

    if !is_plain_component(&meta.id) {
        debug!(id = %meta.id, "record identifier is not a plain path component, skipping");
        return None;
    }

    Some(ExtractedRecord {
        meta,
        assets: assets.clone(),
    })
}

fn deserialize_identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Identifier {
        Number(u64),
        Text(String),
    }

    Ok(match Identifier::deserialize(deserializer)? {
        Identifier::Number(n) => n.to_string(),
        Identifier::Text(s) => s,
    })
}

fn deserialize_lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn hit_with_record(record: Value) -> Value {
        json!({ "_id": "1", "_source": { "record": record } })
    }

    #[test]
    fn test_get_path_walks_nested_objects() {
        let value = json!({ "a": { "b": { "c": 3 } } });
        assert_eq!(get_path(&value, &["a", "b", "c"]), Some(&json!(3)));
    }

    #[test]
    fn test_get_path_empty_path_returns_root() {
        let value = json!({ "a": 1 });
        let empty: &[&str] = &[];
        assert_eq!(get_path(&value, empty), Some(&value));
    }

    #[test]
    fn test_get_path_missing_key_returns_none() {
        let value = json!({ "a": { "b": 1 } });
        assert_eq!(get_path(&value, &["a", "x"]), None);
    }

    #[test]
    fn test_get_path_through_non_object_returns_none() {
        let value = json!({ "a": [ { "b": 1 } ], "s": "text" });
        assert_eq!(get_path(&value, &["a", "b"]), None);
        assert_eq!(get_path(&value, &["s", "b"]), None);
    }

    #[test]
    fn test_extract_returns_meta_and_assets() {
        let hit = hit_with_record(json!({
            "recordType": "item",
            "title": "Map of Virginia",
            "naId": 305_273,
            "digitalObjects": [
                { "objectUrl": "https://x/a.jpg", "objectFilename": "a.jpg" }
            ]
        }));

        let extracted = extract(&hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).unwrap();

        assert_eq!(extracted.meta.record_type, "item");
        assert_eq!(extracted.meta.title, "Map of Virginia");
        assert_eq!(extracted.meta.id, "305273");
        assert_eq!(extracted.assets.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_extract_accepts_string_identifier() {
        let hit = hit_with_record(json!({
            "title": "T",
            "naId": "abc-1",
            "digitalObjects": []
        }));

        let extracted = extract(&hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).unwrap();
        assert_eq!(extracted.meta.id, "abc-1");
        assert_eq!(extracted.meta.record_type, "");
    }

    #[test]
    fn test_extract_missing_path_returns_none() {
        let hit = json!({ "_source": { "other": {} } });
        assert!(extract(&hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).is_none());

        let hit = json!({ "unrelated": true });
        assert!(extract(&hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).is_none());
    }

    #[test]
    fn test_extract_non_object_record_returns_none() {
        let hit = json!({ "_source": { "record": ["not", "a", "mapping"] } });
        assert!(extract(&hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).is_none());
    }

    #[test]
    fn test_extract_missing_assets_key_returns_none() {
        let hit = hit_with_record(json!({
            "recordType": "fileUnit",
            "title": "Undigitized",
            "naId": 7
        }));
        assert!(extract(&hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).is_none());
    }

    #[test]
    fn test_extract_missing_identifier_returns_none() {
        let hit = hit_with_record(json!({
            "title": "No id",
            "digitalObjects": []
        }));
        assert!(extract(&hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).is_none());
    }

    #[test]
    fn test_extract_null_or_odd_text_fields_fall_back() {
        let hit = hit_with_record(json!({
            "recordType": null,
            "title": { "nested": true },
            "naId": 12,
            "digitalObjects": [{}]
        }));

        let extracted = extract(&hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).unwrap();

        assert_eq!(extracted.meta.record_type, "");
        assert_eq!(extracted.meta.title, "");
        assert_eq!(extracted.meta.id, "12");
    }

    #[test]
    fn test_extract_numeric_title_is_rendered() {
        let hit = hit_with_record(json!({ "title": 1865, "naId": 3, "digitalObjects": [] }));
        let extracted = extract(&hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).unwrap();
        assert_eq!(extracted.meta.title, "1865");
    }

    #[test]
    fn test_extract_rejects_identifier_with_path_segments() {
        for id in ["../../escaped", "a/b", "..", ""] {
            let hit = hit_with_record(json!({
                "title": "Escape",
                "naId": id,
                "digitalObjects": [{ "objectUrl": "https://x/a.jpg", "objectFilename": "a.jpg" }]
            }));
            assert!(
                extract(&hit, DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).is_none(),
                "accepted naId {id:?}"
            );
        }
    }

    #[test]
    fn test_extract_non_object_top_level_returns_none() {
        assert!(extract(&json!("scalar"), DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).is_none());
        assert!(extract(&json!(null), DEFAULT_RECORD_PATH, DEFAULT_ASSETS_KEY).is_none());
    }

    #[test]
    fn test_extract_custom_path_and_key() {
        let raw = json!({ "doc": { "naId": 1, "title": "t", "files": [{}] } });
        let extracted = extract(&raw, &["doc"], "files").unwrap();
        assert_eq!(extracted.meta.id, "1");
    }
}
