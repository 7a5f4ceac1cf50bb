use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

/// Preset brush sizes offered by the size chooser
pub struct BrushSize;

impl BrushSize {
    pub const SMALL: f32 = 10.0;
    pub const MEDIUM: f32 = 20.0;
    pub const LARGE: f32 = 30.0;
}

/// Named colors shown in the palette, in display order
pub const PALETTE: [(&str, Color32); 8] = [
    ("Skin", Color32::from_rgb(0xFF, 0xE0, 0xBD)),
    ("Black", Color32::BLACK),
    ("Red", Color32::from_rgb(0xF4, 0x43, 0x36)),
    ("Green", Color32::from_rgb(0x4C, 0xAF, 0x50)),
    ("Blue", Color32::from_rgb(0x21, 0x96, 0xF3)),
    ("Yellow", Color32::from_rgb(0xFF, 0xEB, 0x3B)),
    ("Lollipop", Color32::from_rgb(0xE9, 0x1E, 0x63)),
    ("White", Color32::WHITE),
];

/// Palette entry selected at startup
pub const DEFAULT_PALETTE_INDEX: usize = 1;

/// Snapshot of the brush configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    pub size: f32,
    pub color: Color32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            size: BrushSize::MEDIUM,
            color: PALETTE[DEFAULT_PALETTE_INDEX].1,
        }
    }
}

/// Mutable brush configuration that seeds new strokes.
///
/// Changes only ever apply to strokes started afterwards. Colors are always
/// stored opaque: the display draws joints as overlapping shapes, which only
/// matches the exported pixels when nothing shows through.
#[derive(Debug, Clone, Default)]
pub struct BrushState {
    settings: BrushSettings,
}

impl BrushState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the given settings, rejecting a non-positive size
    pub fn with_settings(settings: BrushSettings) -> Result<Self, CanvasError> {
        let mut brush = Self::new();
        brush.set_size(settings.size)?;
        brush.set_color(settings.color);
        Ok(brush)
    }

    pub fn set_size(&mut self, size: f32) -> Result<(), CanvasError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(CanvasError::InvalidBrushSize(size));
        }
        self.settings.size = size;
        Ok(())
    }

    /// Alpha is dropped; the stored color is always fully opaque
    pub fn set_color(&mut self, color: Color32) {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        if a != u8::MAX {
            log::debug!("Brush color alpha {a} ignored");
        }
        self.settings.color = Color32::from_rgb(r, g, b);
    }

    pub fn current(&self) -> BrushSettings {
        self.settings
    }
}
