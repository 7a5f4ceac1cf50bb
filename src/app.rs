use std::sync::Arc;

use crate::background::BackgroundRef;
use crate::brush::{BrushSettings, BrushState};
use crate::config::AppConfig;
use crate::export::{ExportHandle, ExportSettings, Exporter};
use crate::file_handler::FileHandler;
use crate::input::InputHandler;
use crate::panels::{central_panel, tools_panel};
use crate::rasterizer;
use crate::renderer::Renderer;
use crate::surface::DrawingSurface;

const BRUSH_KEY: &str = "brush";

/// Desktop shell around the drawing surface.
///
/// The app owns the background image; the surface only gets a weak handle.
pub struct PaintApp {
    surface: DrawingSurface,
    background: Option<BackgroundRef>,
    renderer: Renderer,
    input: InputHandler,
    file_handler: FileHandler,
    export_settings: ExportSettings,
    pending_export: Option<ExportHandle>,
    status: Option<String>,
    background_path: String,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        // Only the brush survives a restart, never the drawing itself
        let settings = cc
            .storage
            .and_then(|storage| eframe::get_value::<BrushSettings>(storage, BRUSH_KEY))
            .unwrap_or_else(|| config.brush_settings());

        Self::with_config(settings, config.export_settings())
    }

    pub fn with_config(brush: BrushSettings, export_settings: ExportSettings) -> Self {
        let brush = BrushState::with_settings(brush).unwrap_or_else(|err| {
            log::warn!("Ignoring stored brush: {err}");
            BrushState::new()
        });

        Self {
            surface: DrawingSurface::with_brush(brush),
            background: None,
            renderer: Renderer::new(),
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            export_settings,
            pending_export: None,
            status: None,
            background_path: String::new(),
        }
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut DrawingSurface {
        &mut self.surface
    }

    pub fn undo(&mut self) {
        if !self.surface.undo() {
            log::debug!("Nothing to undo");
        }
    }

    pub fn redo(&mut self) {
        if !self.surface.redo() {
            log::debug!("Nothing to redo");
        }
    }

    pub fn set_brush_size(&mut self, size: f32) {
        if let Err(err) = self.surface.set_brush_size(size) {
            log::warn!("{err}");
            self.status = Some(err.to_string());
        }
    }

    /// Take ownership of `image` and show it under the strokes
    pub fn set_background(&mut self, image: BackgroundRef) {
        self.surface.set_background(Arc::downgrade(&image));
        self.background = Some(image);
    }

    pub fn clear_background(&mut self) {
        self.surface.clear_background();
        self.background = None;
    }

    pub(crate) fn background_path_mut(&mut self) -> &mut String {
        &mut self.background_path
    }

    pub(crate) fn load_background_from_path(&mut self) {
        let path = std::path::PathBuf::from(self.background_path.trim());
        match crate::background::BackgroundImage::from_path(&path) {
            Ok(image) => {
                self.set_background(image);
                self.status = Some(format!("Background: {}", path.display()));
            }
            Err(err) => {
                log::error!("{err}");
                self.status = Some(err.to_string());
            }
        }
    }

    /// Flatten at the given pixel size and write it out in the background
    pub fn request_export(&mut self, width: i64, height: i64) {
        if self.pending_export.is_some() {
            self.status = Some("An export is already running".to_owned());
            return;
        }
        match rasterizer::flatten(&self.surface, width, height) {
            Ok(image) => {
                let handle = Exporter::spawn(image, &self.export_settings);
                log::info!("Exporting to {}", handle.path().display());
                self.status = Some("Saving...".to_owned());
                self.pending_export = Some(handle);
            }
            Err(err) => {
                log::warn!("Export rejected: {err}");
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.pending_export.is_some()
    }

    pub(crate) fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn poll_export(&mut self) {
        let Some(handle) = &mut self.pending_export else {
            return;
        };
        if let Some(result) = handle.try_result() {
            self.status = Some(match result {
                Ok(path) => format!("File saved successfully: {}", path.display()),
                Err(err) => format!("Something went wrong: {err}"),
            });
            self.pending_export = None;
        }
    }

    pub(crate) fn handle_pointer(&mut self, response: &egui::Response, cancel_requested: bool) {
        for event in self.input.process(response, cancel_requested) {
            self.surface.handle_event(event);
        }
    }

    pub(crate) fn paint_canvas(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: egui::Rect) {
        self.surface.set_canvas_size(rect.size());
        let composition = self.surface.render();
        self.renderer.render(ctx, painter, rect, &composition);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo) = ctx.input_mut(|i| {
            let redo = i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::Z);
            let undo = i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z);
            (undo, redo)
        });
        if undo {
            self.undo();
        }
        if redo {
            self.redo();
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, BRUSH_KEY, &self.surface.brush());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.file_handler.check_for_dropped_files(ctx) {
            if let Some(image) = self.file_handler.take_background() {
                self.set_background(image);
            }
        }
        self.file_handler.preview_files_being_dropped(ctx);

        self.handle_shortcuts(ctx);
        self.poll_export();

        tools_panel(self, ctx);
        central_panel(self, ctx);

        if self.surface.take_repaint_request() {
            ctx.request_repaint();
        }
        if self.pending_export.is_some() {
            // Keep polling until the worker reports back
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use crate::background::BackgroundImage;

    fn app() -> PaintApp {
        PaintApp::with_config(BrushSettings::default(), ExportSettings::default())
    }

    #[test]
    fn test_app_owns_background() {
        let mut app = app();
        app.set_background(BackgroundImage::new_ref(RgbaImage::new(2, 2)));
        assert!(app.surface().background().is_some());

        app.clear_background();
        assert!(app.surface().background().is_none());
    }

    #[test]
    fn test_invalid_brush_size_reports_status() {
        let mut app = app();
        app.set_brush_size(-1.0);
        assert!(app.status().is_some());
        assert_eq!(app.surface().brush().size, 20.0);
    }

    #[test]
    fn test_invalid_export_is_rejected_without_spawning() {
        let mut app = app();
        app.request_export(0, 10);
        assert!(!app.is_exporting());
        assert!(app.status().is_some());
    }

    #[test]
    fn test_invalid_stored_brush_falls_back() {
        let stored = BrushSettings {
            size: -5.0,
            color: egui::Color32::RED,
        };
        let app = PaintApp::with_config(stored, ExportSettings::default());
        assert_eq!(app.surface().brush(), BrushSettings::default());
    }
}
