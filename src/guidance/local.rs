//! Loader for local guidance data directories.
//!
//! Each `<category>.json` file in the directory holds either an array of
//! guidance records or an object keyed by direction name. Direction keys in
//! any supported spelling collapse to the 16 canonical labels.

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::{GuidanceError, GuidanceTable, RawGuidanceRecord};
use crate::compass::CompassLabel;

/// Load a guidance table from a directory of per-category JSON files.
///
/// The file stem is the category key. Files that fail to parse are skipped
/// with a warning; a missing or unreadable directory is an error.
pub fn load_dir(dir: &Path) -> Result<GuidanceTable, GuidanceError> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut table = GuidanceTable::new();
    for path in paths {
        let Some(category) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Skipping unreadable guidance file {path:?}: {e}");
                continue;
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => load_value(&mut table, category, value),
            Err(e) => log::warn!("Skipping invalid guidance file {path:?}: {e}"),
        }
    }
    Ok(table)
}

/// Fold one parsed category file into the table.
fn load_value(table: &mut GuidanceTable, category: &str, value: Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                match serde_json::from_value::<RawGuidanceRecord>(item) {
                    Ok(record) => {
                        let Some(label) = record.direction() else {
                            continue;
                        };
                        table.insert(category, label, record.into_entry());
                    }
                    Err(e) => log::warn!("Skipping guidance record in '{category}': {e}"),
                }
            }
        }
        Value::Object(map) => {
            for (dir, body) in map {
                let Some(label) = CompassLabel::from_name(&dir) else {
                    log::warn!("Skipping unknown direction key '{dir}' in '{category}'");
                    continue;
                };
                match serde_json::from_value::<RawGuidanceRecord>(body) {
                    Ok(record) => table.insert(category, label, record.into_entry()),
                    Err(e) => log::warn!("Skipping guidance entry {dir} in '{category}': {e}"),
                }
            }
        }
        _ => log::warn!("Guidance file for '{category}' is neither an array nor an object"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AreaType;

    fn table_from(category: &str, json: &str) -> GuidanceTable {
        let mut table = GuidanceTable::new();
        load_value(&mut table, category, serde_json::from_str(json).unwrap());
        table
    }

    #[test]
    fn test_array_file() {
        let table = table_from(
            "bedroom",
            r#"[
                {"compass_direction": "South-Southwest", "zone": "best", "effect": "restful sleep"},
                {"direction": "NE", "zone": "bad", "remedies_primary": "move bed | use warm colors"}
            ]"#,
        );
        assert_eq!(
            table.get("bedroom", CompassLabel::Ssw).unwrap().zone,
            "Best"
        );
        let ne = table.get("bedroom", CompassLabel::Ne).unwrap();
        assert_eq!(ne.remedies_primary, vec!["move bed", "use warm colors"]);
    }

    #[test]
    fn test_object_file_normalizes_direction_keys() {
        let table = table_from(
            "kitchen",
            r#"{
                "Southeast (SE)": {"zone": "best", "element": "Fire"},
                "WEST - NORTHWEST": {"zone": "bad"},
                "upwards": {"zone": "good"}
            }"#,
        );
        assert_eq!(table.entry_count(), 2);
        assert_eq!(table.get("kitchen", CompassLabel::Se).unwrap().element, "Fire");
        assert_eq!(table.get("kitchen", CompassLabel::Wnw).unwrap().zone, "Bad");
    }

    #[test]
    fn test_load_dir_reads_files() {
        let dir = std::env::temp_dir().join("vastumark-guidance-test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("toilet.json"),
            r#"[{"compass_direction": "NW", "zone": "good"}]"#,
        )
        .unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();
        fs::write(dir.join("broken.json"), "{").unwrap();

        let table = load_dir(&dir).unwrap();
        assert_eq!(table.category_names(), vec!["toilet"]);
        assert!(table.lookup(AreaType::Toilet, CompassLabel::Nw).is_some());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_dir_missing_directory_errors() {
        let missing = std::env::temp_dir().join("vastumark-guidance-missing");
        assert!(load_dir(&missing).is_err());
    }
}
