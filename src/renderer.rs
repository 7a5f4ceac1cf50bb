use egui::{Color32, ColorImage, Painter, Pos2, Rect, Shape, TextureHandle, TextureOptions};

use crate::background::BackgroundImage;
use crate::stroke::Stroke;
use crate::surface::{Background, Composition};

/// Paints compositions onto the egui canvas.
///
/// Keeps the GPU texture of the current background so it is uploaded once
/// per image rather than once per frame.
#[derive(Default)]
pub struct Renderer {
    background_texture: Option<(u64, TextureHandle)>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `composition` into `rect`; canvas-space (0, 0) is `rect.min`
    pub fn render(&mut self, ctx: &egui::Context, painter: &Painter, rect: Rect, composition: &Composition<'_>) {
        match &composition.background {
            Background::Solid(color) => {
                painter.rect_filled(rect, 0.0, *color);
            }
            Background::Image(image) => {
                let texture = self.background_texture(ctx, image);
                painter.image(
                    texture.id(),
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
        }

        painter.with_clip_rect(rect).extend(visible_shapes(composition, rect));
    }

    fn background_texture(&mut self, ctx: &egui::Context, image: &BackgroundImage) -> &TextureHandle {
        if !matches!(&self.background_texture, Some((id, _)) if *id == image.id()) {
            self.background_texture = None;
        }
        let (_, handle) = self.background_texture.get_or_insert_with(|| {
            let pixels = image.pixels();
            let color_image = ColorImage::from_rgba_unmultiplied(
                [pixels.width() as usize, pixels.height() as usize],
                pixels.as_raw(),
            );
            let name = format!("background_{}", image.id());
            log::debug!("Uploading background texture {}", name);
            (image.id(), ctx.load_texture(name, color_image, TextureOptions::LINEAR))
        });
        handle
    }
}

/// Shapes for every layer that reaches into `rect`
fn visible_shapes(composition: &Composition<'_>, rect: Rect) -> Vec<Shape> {
    let origin = rect.min.to_vec2();
    composition
        .layers()
        .filter(|stroke| stroke.bounds().translate(origin).intersects(rect))
        .flat_map(|stroke| stroke_shapes(stroke, origin))
        .collect()
}

/// Shapes for one stroke, offset into screen space.
///
/// egui lines have butt ends, so a disc at every vertex gives the round caps
/// and joins.
pub fn stroke_shapes(stroke: &Stroke, offset: egui::Vec2) -> Vec<Shape> {
    let radius = stroke.size() / 2.0;
    let points: Vec<Pos2> = stroke.points().iter().map(|p| *p + offset).collect();

    let mut shapes = Vec::with_capacity(points.len() + 1);
    if points.len() > 1 {
        shapes.push(Shape::line(
            points.clone(),
            egui::Stroke::new(stroke.size(), stroke.color()),
        ));
    }
    shapes.extend(
        points
            .into_iter()
            .map(|p| Shape::circle_filled(p, radius, stroke.color())),
    );
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::StrokeBuilder;

    fn stroke(points: &[(f32, f32)]) -> Stroke {
        let mut builder = StrokeBuilder::new(Color32::BLUE, 6.0);
        for &(x, y) in points {
            builder.add_point(Pos2::new(x, y));
        }
        builder.to_stroke().unwrap()
    }

    #[test]
    fn test_dot_is_single_circle() {
        let shapes = stroke_shapes(&stroke(&[(5.0, 5.0)]), egui::Vec2::ZERO);
        assert_eq!(shapes.len(), 1);
        assert!(matches!(shapes[0], Shape::Circle(_)));
    }

    #[test]
    fn test_polyline_gets_line_and_round_joins() {
        let shapes = stroke_shapes(
            &stroke(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]),
            egui::vec2(100.0, 50.0),
        );
        assert_eq!(shapes.len(), 4);
        match &shapes[1] {
            Shape::Circle(circle) => {
                assert_eq!(circle.center, Pos2::new(100.0, 50.0));
                assert_eq!(circle.radius, 3.0);
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn test_strokes_outside_the_canvas_are_skipped() {
        let inside = stroke(&[(5.0, 5.0)]);
        let outside = stroke(&[(500.0, 500.0), (600.0, 500.0)]);
        let composition = Composition {
            background: Background::Solid(Color32::WHITE),
            strokes: vec![&inside, &outside],
            in_progress: None,
            canvas_size: None,
        };
        let rect = Rect::from_min_size(Pos2::new(10.0, 10.0), egui::vec2(100.0, 100.0));

        let shapes = visible_shapes(&composition, rect);
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Circle(circle) => assert_eq!(circle.center, Pos2::new(15.0, 15.0)),
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn test_render_basics() {
        let ctx = egui::Context::default();
        let layer_id = egui::LayerId::background();
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 100.0));
        let painter = Painter::new(ctx.clone(), layer_id, rect);

        let surface = crate::surface::DrawingSurface::new();
        let mut renderer = Renderer::new();
        renderer.render(&ctx, &painter, rect, &surface.render());
    }
}
