use eframe::egui;

use crate::background::{BackgroundImage, BackgroundRef};

/// Picks up image files dropped on the window and decodes them as backgrounds
#[derive(Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect newly dropped files from the UI context.
    /// Returns true if any arrived this frame.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Decode the dropped files, returning the last one that is a usable image
    pub fn take_background(&mut self) -> Option<BackgroundRef> {
        let mut background = None;

        for file in self.dropped_files.drain(..) {
            let file_name = display_name(&file);

            if !is_image_file(&file) {
                log::warn!("Dropped file is not a supported image: {}", file_name);
                continue;
            }

            let decoded = if let Some(bytes) = &file.bytes {
                log::info!("Processing image from memory: {} ({} bytes)", file_name, bytes.len());
                BackgroundImage::from_bytes(bytes)
            } else if let Some(path) = &file.path {
                BackgroundImage::from_path(path)
            } else {
                log::warn!("Dropped file has no accessible data: {}", file_name);
                continue;
            };

            match decoded {
                Ok(image) => background = Some(image),
                Err(err) => log::error!("{}: {}", file_name, err),
            }
        }

        background
    }

    /// Overlay shown while files are dragged over the window
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop an image to use it as the background",
            FontId::proportional(24.0),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let path = file.path.as_deref();
    let name = path
        .and_then(|p| p.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| {
            file.name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_lowercase())
        });
    matches!(
        name.as_deref(),
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
    )
}
