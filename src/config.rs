// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Startup configuration.
//!
//! The image sequence is fixed at startup, either from a YAML file or
//! from image paths given on the command line.

use crate::io::serialization::DEFAULT_EXPORT_NAME;
use crate::models::session::SelectionPolicy;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when no arguments are given.
pub const DEFAULT_CONFIG_FILE: &str = "boxlabel.yaml";

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_NAME)
}

fn default_fallback_canvas() -> [f64; 2] {
    [800.0, 600.0]
}

/// Labeling session configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelerConfig {
    /// Ordered image locators.
    pub images: Vec<String>,
    /// Suggested path for the exported annotations.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Previous export to resume from.
    #[serde(default)]
    pub resume_from: Option<PathBuf>,
    #[serde(default)]
    pub selection: SelectionPolicy,
    /// Canvas size used when an image fails to load.
    #[serde(default = "default_fallback_canvas")]
    pub fallback_canvas: [f64; 2],
    /// Directory relative image locators are loaded from.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl LabelerConfig {
    /// Build a config for a list of image paths with default settings.
    pub fn from_images(images: Vec<String>) -> Self {
        Self {
            images,
            output: default_output(),
            resume_from: None,
            selection: SelectionPolicy::default(),
            fallback_canvas: default_fallback_canvas(),
            base_dir: PathBuf::new(),
        }
    }

    /// Parse a YAML config.
    ///
    /// Image locators are kept verbatim as the export keys; they are only
    /// resolved against `base_dir` when loaded (see [`image_path`]).
    pub fn from_yaml(yaml: &str, base_dir: &Path) -> Result<Self> {
        let mut config: LabelerConfig = serde_yaml::from_str(yaml)?;
        config.base_dir = base_dir.to_path_buf();
        if let Some(ref resume) = config.resume_from {
            config.resume_from = Some(base_dir.join(resume));
        }
        Ok(config)
    }

    /// Load a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_yaml(&yaml, base_dir).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Build the config from command line arguments (program name excluded).
    pub fn from_args(args: &[String]) -> Result<Self> {
        let config = match args {
            [] => Self::load(Path::new(DEFAULT_CONFIG_FILE))?,
            [single] if is_yaml(single) => Self::load(Path::new(single))?,
            images => Self::from_images(images.to_vec()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            bail!("no images configured");
        }
        let [w, h] = self.fallback_canvas;
        if w <= 0.0 || h <= 0.0 {
            bail!("fallback canvas must have a positive size, got {}x{}", w, h);
        }
        Ok(())
    }
}

fn is_yaml(arg: &str) -> bool {
    matches!(
        Path::new(arg).extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// File to load for the image locator `key`.
pub fn image_path(base_dir: &Path, key: &str) -> PathBuf {
    // join keeps absolute locators as they are
    base_dir.join(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::serialization::to_json;
    use crate::models::session::Session;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config = LabelerConfig::from_yaml("images: [a.jpg, b.jpg]", Path::new("")).unwrap();
        assert_eq!(config.images, ["a.jpg", "b.jpg"]);
        assert_eq!(config.output, PathBuf::from("annotations.json"));
        assert_eq!(config.selection, SelectionPolicy::default());
        assert_eq!(config.fallback_canvas, [800.0, 600.0]);
        assert!(config.resume_from.is_none());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
images:
  - "Image 1.jpg"
  - /abs/Image 2.jpg
output: out/labels.yaml
resume_from: previous.json
selection:
  clear_on_delete: true
fallback_canvas: [640, 480]
"#;
        let config = LabelerConfig::from_yaml(yaml, Path::new("/data")).unwrap();
        assert_eq!(config.images, ["Image 1.jpg", "/abs/Image 2.jpg"]);
        assert_eq!(config.base_dir, PathBuf::from("/data"));
        assert_eq!(config.output, PathBuf::from("out/labels.yaml"));
        assert_eq!(config.resume_from, Some(PathBuf::from("/data/previous.json")));
        assert!(config.selection.clear_on_delete);
        assert!(!config.selection.clear_on_navigate);
        assert_eq!(config.fallback_canvas, [640.0, 480.0]);
    }

    #[test]
    fn test_image_path_joins_relative_locators() {
        let base = Path::new("/home/me/project");
        assert_eq!(
            image_path(base, "assets/Image 1.jpg"),
            PathBuf::from("/home/me/project/assets/Image 1.jpg")
        );
        assert_eq!(image_path(base, "/abs/a.jpg"), PathBuf::from("/abs/a.jpg"));
        assert_eq!(image_path(Path::new(""), "a.jpg"), PathBuf::from("a.jpg"));
    }

    #[test]
    fn test_export_keys_match_configured_locators() {
        let config = LabelerConfig::from_yaml(
            "images: [\"assets/Image 1.jpg\"]",
            Path::new("/home/me/project"),
        )
        .unwrap();
        let mut session = Session::new(config.images, config.selection);
        session.save();

        let json = to_json(&session.export()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["assets/Image 1.jpg"]);
    }

    #[test]
    fn test_args_as_image_list() {
        let args = vec!["one.png".to_string(), "two.png".to_string()];
        let config = LabelerConfig::from_args(&args).unwrap();
        assert_eq!(config.images, args);
    }

    #[test]
    fn test_empty_image_list_is_rejected() {
        let config = LabelerConfig::from_yaml("images: []", Path::new("")).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = vec!["/nonexistent/boxlabel.yml".to_string()];
        assert!(LabelerConfig::from_args(&args).is_err());
    }
}
