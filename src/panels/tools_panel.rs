use egui::{Button, Color32, Sense, Stroke, vec2};

use crate::PaintApp;
use crate::brush::{BrushSize, PALETTE};

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Brush");

            let brush = app.surface().brush();
            ui.horizontal(|ui| {
                for (label, size) in [
                    ("Small", BrushSize::SMALL),
                    ("Medium", BrushSize::MEDIUM),
                    ("Large", BrushSize::LARGE),
                ] {
                    if ui.selectable_label(brush.size == size, label).clicked() {
                        log::info!("Brush size selected: {}", size);
                        app.set_brush_size(size);
                    }
                }
            });

            ui.separator();
            ui.label("Color");
            ui.horizontal_wrapped(|ui| {
                for (name, color) in PALETTE {
                    if palette_swatch(ui, color, brush.color == color)
                        .on_hover_text(name)
                        .clicked()
                    {
                        app.surface_mut().set_brush_color(color);
                    }
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                let availability = app.surface().availability();
                if ui.add_enabled(availability.can_undo, Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(availability.can_redo, Button::new("Redo")).clicked() {
                    app.redo();
                }
            });
            let history = app.surface().history();
            ui.label(format!("Strokes: {}  Redoable: {}", history.len(), history.redo_len()));

            ui.separator();
            ui.label("Background image");
            ui.text_edit_singleline(app.background_path_mut());
            ui.horizontal(|ui| {
                if ui.button("Load").clicked() {
                    app.load_background_from_path();
                }
                if ui.button("Clear").clicked() {
                    app.clear_background();
                }
            });
            ui.small("Or drop an image onto the window");

            ui.separator();
            let can_export = !app.is_exporting();
            if ui.add_enabled(can_export, Button::new("Save PNG")).clicked() {
                let size = app.surface().canvas_size().unwrap_or(vec2(0.0, 0.0)) * ctx.pixels_per_point();
                app.request_export(size.x.round() as i64, size.y.round() as i64);
            }
            if ui.button("New drawing").clicked() {
                app.surface_mut().clear();
            }

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
}

fn palette_swatch(ui: &mut egui::Ui, color: Color32, selected: bool) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(vec2(24.0, 24.0), Sense::click());
    if ui.is_rect_visible(rect) {
        let outline = if selected {
            Stroke::new(3.0, Color32::from_rgb(100, 181, 246))
        } else {
            Stroke::new(1.0, Color32::from_gray(80))
        };
        ui.painter().rect(rect.shrink(2.0), 4.0, color, outline);
    }
    response
}
