use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::brush::{BrushSettings, BrushSize, DEFAULT_PALETTE_INDEX, PALETTE};
use crate::error::ConfigError;
use crate::export::{DEFAULT_FILE_PREFIX, DEFAULT_PNG_QUALITY, ExportSettings};

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "DRAWING_CANVAS_CONFIG";

/// Startup configuration, read from JSON.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory exported PNGs go to. Defaults to the system temp dir.
    pub export_dir: Option<PathBuf>,
    pub file_prefix: String,
    pub png_quality: u8,
    pub default_brush_size: f32,
    /// RGBA, unmultiplied. Brushes are opaque, so alpha must be 255.
    pub default_color: [u8; 4],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export_dir: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_owned(),
            png_quality: DEFAULT_PNG_QUALITY,
            default_brush_size: BrushSize::MEDIUM,
            default_color: PALETTE[DEFAULT_PALETTE_INDEX].1.to_srgba_unmultiplied(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_brush_size.is_finite() || self.default_brush_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_brush_size must be positive, got {}",
                self.default_brush_size
            )));
        }
        if self.png_quality > 100 {
            return Err(ConfigError::Invalid(format!(
                "png_quality must be within 0..=100, got {}",
                self.png_quality
            )));
        }
        if self.default_color[3] != u8::MAX {
            return Err(ConfigError::Invalid(format!(
                "default_color must be opaque, got alpha {}",
                self.default_color[3]
            )));
        }
        if self.file_prefix.is_empty() || self.file_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "file_prefix must be a plain file name, got {:?}",
                self.file_prefix
            )));
        }
        Ok(())
    }

    /// Load from `$DRAWING_CANVAS_CONFIG` if set; any problem falls back to defaults
    pub fn from_env_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        let path = PathBuf::from(path);
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Ignoring config {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            directory: self
                .export_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            file_prefix: self.file_prefix.clone(),
            quality: self.png_quality,
        }
    }

    pub fn brush_settings(&self) -> BrushSettings {
        let [r, g, b, a] = self.default_color;
        BrushSettings {
            size: self.default_brush_size,
            color: egui::Color32::from_rgba_unmultiplied(r, g, b, a),
        }
    }
}
