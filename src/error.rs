use std::path::PathBuf;
use thiserror::Error;

/// Errors raised synchronously by the drawing core.
///
/// Every variant leaves the caller's prior state unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanvasError {
    #[error("brush size must be a positive number, got {0}")]
    InvalidBrushSize(f32),
    #[error("export dimensions must be positive and at most {max} per side, got {width}x{height}", max = crate::rasterizer::MAX_DIMENSION)]
    InvalidDimensions { width: i64, height: i64 },
}

impl CanvasError {
    /// Both variants are rejected arguments; callers that only care about
    /// the category can match on this instead of the variant.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidBrushSize(_) | Self::InvalidDimensions { .. }
        )
    }
}

/// Errors produced while turning a flattened drawing into a file
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    InvalidArgument(#[from] CanvasError),

    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Export task ended before reporting a result")]
    Cancelled,
}

/// Errors that can occur while loading a background image
#[derive(Error, Debug)]
pub enum BackgroundError {
    #[error("Failed to read background image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode background image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Errors that can occur while loading the app configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}
