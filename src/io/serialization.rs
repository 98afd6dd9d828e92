// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation export and import.
//!
//! Exports write the committed store as a JSON object keyed by image
//! locator, pretty-printed with 2-space indentation. YAML is offered as an
//! alternative format. Imports read a previous JSON export back so a
//! session can resume.

use crate::models::store::{CommittedMap, ExportDocument};
use anyhow::{Context, Result};
use std::path::Path;

/// Default name of the exported file.
pub const DEFAULT_EXPORT_NAME: &str = "annotations.json";

/// Render the committed store as pretty JSON.
pub fn to_json(doc: &ExportDocument<'_>) -> Result<String> {
    let json = serde_json::to_string_pretty(doc)?;
    Ok(json)
}

/// Export the committed store to JSON format.
pub fn export_json(doc: &ExportDocument<'_>, path: &Path) -> Result<()> {
    let json = to_json(doc)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Export the committed store to YAML format.
pub fn export_yaml(doc: &ExportDocument<'_>, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(doc)?;
    std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Export by file extension: `.yaml`/`.yml` as YAML, anything else as JSON.
pub fn export(doc: &ExportDocument<'_>, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(doc, path),
        _ => export_json(doc, path),
    }
}

/// Parse a previous JSON export.
pub fn from_json(json: &str) -> Result<CommittedMap> {
    let data = serde_json::from_str(json)?;
    Ok(data)
}

/// Import a previous JSON export from disk.
pub fn import_json(path: &Path) -> Result<CommittedMap> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Annotation;

    fn committed() -> CommittedMap {
        let mut map = CommittedMap::new();
        map.insert(
            "/assets/Image 1.jpg".to_string(),
            vec![Annotation::new("a1", 10.0, 20.5, 30.0, -4.0)],
        );
        map.insert("/assets/Image 3.webp".to_string(), Vec::new());
        map
    }

    #[test]
    fn test_json_is_object_keyed_by_image() {
        let map = committed();
        let json = to_json(&ExportDocument { images: &map }).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["/assets/Image 3.webp"], serde_json::json!([]));

        let first = &obj["/assets/Image 1.jpg"][0];
        assert_eq!(first["id"], "a1");
        assert_eq!(first["y"], 20.5);
        assert_eq!(first["height"], -4.0);
    }

    #[test]
    fn test_json_uses_two_space_indent() {
        let map = committed();
        let json = to_json(&ExportDocument { images: &map }).unwrap();
        assert!(json.starts_with("{\n  \"/assets/Image 1.jpg\": [\n    {\n      \"id\""));
    }

    #[test]
    fn test_empty_store_exports_empty_object() {
        let map = CommittedMap::new();
        assert_eq!(to_json(&ExportDocument { images: &map }).unwrap(), "{}");
    }

    #[test]
    fn test_export_then_import() {
        let map = committed();
        let path = std::env::temp_dir().join(format!(
            "boxlabel-test-{}.json",
            crate::models::annotation::new_annotation_id()
        ));
        export(&ExportDocument { images: &map }, &path).unwrap();
        let loaded = import_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, map);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(from_json("[1, 2, 3]").is_err());
    }
}
