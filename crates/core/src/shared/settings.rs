use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::capture_config::{CaptureConfig, ErrorPolicy, ImageFormat};
use crate::shared::constants::{APP_DIR_NAME, DEFAULT_CAPTURE_FILENAME, SETTINGS_FILE_NAME};

/// Persisted capture preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSettings {
    pub filename: String,
    pub format: ImageFormat,
    #[serde(default)]
    pub policy: ErrorPolicy,
    /// Overrides the platform data directory when set.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub blocking_readback: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            filename: DEFAULT_CAPTURE_FILENAME.to_string(),
            format: ImageFormat::Png,
            policy: ErrorPolicy::Strict,
            output_dir: None,
            blocking_readback: false,
        }
    }
}

impl CaptureSettings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Falls back to defaults when the file is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Failed to save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig::new(self.filename.clone(), self.format).with_policy(self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load_restores_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = CaptureSettings {
            filename: "bg.exr".into(),
            format: ImageFormat::Exr,
            policy: ErrorPolicy::Lenient,
            output_dir: Some(PathBuf::from("/tmp/captures")),
            blocking_readback: true,
        };
        settings.save_to(&path);
        assert_eq!(CaptureSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CaptureSettings::load_from(&dir.path().join("absent.json"));
        assert_eq!(loaded, CaptureSettings::default());
    }

    #[test]
    fn test_malformed_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(CaptureSettings::load_from(&path), CaptureSettings::default());
    }

    #[test]
    fn test_optional_fields_default_when_absent() {
        let loaded: CaptureSettings =
            serde_json::from_str(r#"{"filename":"a.jpg","format":"jpeg"}"#).unwrap();
        assert_eq!(loaded.policy, ErrorPolicy::Strict);
        assert_eq!(loaded.output_dir, None);
        assert!(!loaded.blocking_readback);
    }

    #[test]
    fn test_unknown_format_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"filename":"a.tga","format":"tga"}"#).unwrap();
        assert_eq!(CaptureSettings::load_from(&path), CaptureSettings::default());
    }

    #[test]
    fn test_capture_config_carries_fields() {
        let settings = CaptureSettings {
            filename: "x.png".into(),
            policy: ErrorPolicy::Lenient,
            ..Default::default()
        };
        let config = settings.capture_config();
        assert_eq!(config.filename, "x.png");
        assert_eq!(config.format, ImageFormat::Png);
        assert_eq!(config.policy, ErrorPolicy::Lenient);
    }
}
