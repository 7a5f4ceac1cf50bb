use crate::PaintApp;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) =
                ui.allocate_painter(available_size, egui::Sense::click_and_drag());

            // Escape aborts the stroke the same way a platform cancel would
            let cancel_requested = ctx.input(|i| i.key_pressed(egui::Key::Escape));
            app.handle_pointer(&response, cancel_requested);

            app.paint_canvas(ctx, &painter, response.rect);
        });
}
