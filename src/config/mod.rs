//! Application configuration
//!
//! Reconstruction, detector and transliteration settings stored in TOML
//! format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::annotate::AnnotationStyle;
use crate::engine::ReconstructionConfig;
use crate::layout::{DEFAULT_SPACE_FACTOR, DEFAULT_Y_THRESHOLD};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reconstruction thresholds
    pub reconstruction: ReconstructionSettings,
    /// Thresholds forwarded to the upstream detector
    pub detector: DetectorSettings,
    /// Annotation rendering style
    pub annotation: AnnotationSettings,
    /// External transliteration tool
    pub transliteration: TransliterationSettings,
}

/// Reconstruction thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructionSettings {
    /// Vertical distance (px) under which detections share a line
    pub y_threshold: f32,
    /// Multiple of the median gap above which a space is inserted
    pub space_factor: f32,
    /// Capitalize the first letter after each period
    pub sentence_case: bool,
}

impl Default for ReconstructionSettings {
    fn default() -> Self {
        Self {
            y_threshold: DEFAULT_Y_THRESHOLD,
            space_factor: DEFAULT_SPACE_FACTOR,
            sentence_case: false,
        }
    }
}

impl From<&ReconstructionSettings> for ReconstructionConfig {
    fn from(settings: &ReconstructionSettings) -> Self {
        Self {
            y_threshold: settings.y_threshold,
            space_factor: settings.space_factor,
            sentence_case: settings.sentence_case,
        }
    }
}

/// Thresholds passed to the upstream detector. The engine never re-filters
/// by confidence; these only parameterize the model invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorSettings {
    /// Minimum detection confidence
    pub conf_threshold: f32,
    /// IoU threshold for non-maximum suppression
    pub iou_threshold: f32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            conf_threshold: 0.15,
            iou_threshold: 0.15,
        }
    }
}

/// Annotation rendering style
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationSettings {
    /// Box border color, RGB
    pub border_color: [u8; 3],
    /// Label strip background color, RGB
    pub label_background: [u8; 3],
    /// Border thickness in pixels
    pub thickness: u32,
    /// Label strip height in pixels
    pub label_height: u32,
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            border_color: [245, 166, 35],
            label_background: [245, 166, 35],
            thickness: 2,
            label_height: 12,
        }
    }
}

impl From<&AnnotationSettings> for AnnotationStyle {
    fn from(settings: &AnnotationSettings) -> Self {
        Self {
            border_color: image::Rgb(settings.border_color),
            label_background: image::Rgb(settings.label_background),
            thickness: settings.thickness,
            label_height: settings.label_height,
        }
    }
}

/// External transliteration tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransliterationSettings {
    /// Tool executable name or path
    pub command: String,
    /// Forward translation table
    pub table: String,
    /// Display table for Unicode braille output
    pub display_table: String,
}

impl Default for TransliterationSettings {
    fn default() -> Self {
        Self {
            command: "lou_translate".to_string(),
            table: "es-g1.ctb".to_string(),
            display_table: "unicode.dis".to_string(),
        }
    }
}

/// Get the configuration directory
pub fn default_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "readout", "Readout")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.reconstruction.y_threshold, 20.0);
        assert_eq!(config.reconstruction.space_factor, 1.8);
        assert!(!config.reconstruction.sentence_case);

        assert!((config.detector.conf_threshold - 0.15).abs() < 1e-6);
        assert!((config.detector.iou_threshold - 0.15).abs() < 1e-6);

        assert_eq!(config.annotation.border_color, [245, 166, 35]);
        assert_eq!(config.annotation.thickness, 2);

        assert_eq!(config.transliteration.command, "lou_translate");
        assert_eq!(config.transliteration.table, "es-g1.ctb");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.reconstruction.y_threshold, parsed.reconstruction.y_threshold);
        assert_eq!(config.detector.conf_threshold, parsed.detector.conf_threshold);
        assert_eq!(config.annotation.border_color, parsed.annotation.border_color);
        assert_eq!(config.transliteration.table, parsed.transliteration.table);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.reconstruction.y_threshold = 35.0;
        config.reconstruction.sentence_case = true;
        config.transliteration.table = "en-us-g2.ctb".to_string();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.reconstruction.y_threshold, 35.0);
        assert!(parsed.reconstruction.sentence_case);
        assert_eq!(parsed.transliteration.table, "en-us-g2.ctb");
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config.reconstruction.space_factor, loaded.reconstruction.space_factor);
        assert_eq!(config.transliteration.command, loaded.transliteration.command);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_reconstruction_config_conversion() {
        let settings = ReconstructionSettings {
            y_threshold: 18.0,
            space_factor: 2.0,
            sentence_case: true,
        };
        let config = ReconstructionConfig::from(&settings);
        assert_eq!(config.y_threshold, 18.0);
        assert_eq!(config.space_factor, 2.0);
        assert!(config.sentence_case);
    }
}
