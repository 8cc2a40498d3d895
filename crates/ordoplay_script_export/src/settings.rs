// SPDX-License-Identifier: MIT OR Apache-2.0
//! Export settings.
//!
//! Stored as RON next to the scripts. Every field has a default, so a
//! partial file (or no file at all) is valid.

use ordoplay_script_graph::catalog::KART;
use ordoplay_script_graph::LayoutSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file looked up when no path is given
pub const SETTINGS_FILE_NAME: &str = "script_export.ron";

/// Settings controlling one export run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Format version
    pub version: u32,
    /// Column and row spacing for the layout
    pub layout: LayoutSettings,
    /// Directory the script is written to
    pub output_dir: PathBuf,
    /// Output file name; a timestamped name is used when unset
    pub file_name: Option<String>,
    /// Node kinds everything else must feed into; empty keeps every node
    pub roots: Vec<String>,
    /// Indent the JSON output
    pub pretty: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            layout: LayoutSettings::default(),
            output_dir: PathBuf::from("scripts"),
            file_name: None,
            roots: vec![KART.to_string()],
            pretty: false,
        }
    }
}

impl ExportSettings {
    /// Parse settings from RON text
    pub fn from_ron(content: &str) -> std::io::Result<Self> {
        let settings: ExportSettings = ron::from_str(content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Settings version {} is newer than supported version {}",
                    settings.version, SETTINGS_FORMAT_VERSION
                ),
            ));
        }

        Ok(settings)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> std::io::Result<Self> {
        match Self::load(path) {
            Ok(settings) => Ok(settings),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No settings at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Render settings as pretty RON
    pub fn to_ron(&self) -> std::io::Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        ron::ser::to_string_pretty(self, config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_ron()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ExportSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.roots, vec![KART.to_string()]);
        assert_eq!(settings.layout, LayoutSettings::default());
    }

    #[test]
    fn test_serialization() {
        let mut settings = ExportSettings::default();
        settings.file_name = Some("racer".to_string());
        settings.layout.column_spacing = 420.0;

        let ron_str = settings.to_ron().unwrap();
        let loaded = ExportSettings::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded = ExportSettings::from_ron("(pretty: true, roots: [])").unwrap();
        assert!(loaded.pretty);
        assert!(loaded.roots.is_empty());
        assert_eq!(loaded.output_dir, PathBuf::from("scripts"));
        assert_eq!(loaded.layout.row_spacing, LayoutSettings::default().row_spacing);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = ExportSettings::from_ron("(version: 99)").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("ordoplay_script_export_missing_settings.ron");
        let _ = std::fs::remove_file(&path);
        let settings = ExportSettings::load_or_default(&path).unwrap();
        assert_eq!(settings, ExportSettings::default());
    }
}
