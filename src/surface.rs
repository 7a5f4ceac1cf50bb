use egui::{Color32, Vec2};
use log::debug;
use std::sync::Weak;

use crate::background::{BackgroundImage, BackgroundRef};
use crate::brush::{BrushSettings, BrushState};
use crate::command::{HistoryAvailability, StrokeHistory};
use crate::error::CanvasError;
use crate::input::PointerEvent;
use crate::state::GestureState;
use crate::stroke::Stroke;

/// Fill used when no background image is available
pub const DEFAULT_BACKGROUND: Color32 = Color32::WHITE;

/// What sits underneath the strokes
#[derive(Debug, Clone)]
pub enum Background {
    Solid(Color32),
    Image(BackgroundRef),
}

/// Everything needed to draw one frame of the canvas, bottom to top.
///
/// The background image is upgraded to a strong reference only for as long
/// as the composition lives.
#[derive(Debug, Clone)]
pub struct Composition<'a> {
    pub background: Background,
    pub strokes: Vec<&'a Stroke>,
    pub in_progress: Option<Stroke>,
    pub canvas_size: Option<Vec2>,
}

impl Composition<'_> {
    /// All strokes in paint order, the in-progress one last
    pub fn layers(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.strokes
            .iter()
            .copied()
            .chain(self.in_progress.as_ref())
    }
}

/// Adapter between pointer gestures and the stroke history.
///
/// Owns the brush and history outright. The background is borrowed through
/// a `Weak`, so the surface never keeps an image alive.
#[derive(Debug, Default)]
pub struct DrawingSurface {
    brush: BrushState,
    history: StrokeHistory,
    gesture: GestureState,
    background: Option<Weak<BackgroundImage>>,
    canvas_size: Option<Vec2>,
    repaint_requested: bool,
    revision: u64,
}

impl DrawingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brush(brush: BrushState) -> Self {
        Self {
            brush,
            ..Self::default()
        }
    }

    // Brush ------------------------------------------------------------------

    pub fn set_brush_size(&mut self, size: f32) -> Result<(), CanvasError> {
        self.brush.set_size(size)
    }

    pub fn set_brush_color(&mut self, color: Color32) {
        self.brush.set_color(color);
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush.current()
    }

    // Gestures ---------------------------------------------------------------

    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(pos) => self.pointer_down(pos),
            PointerEvent::Move(pos) => self.pointer_move(pos),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Cancel => self.pointer_cancel(),
        }
    }

    pub fn pointer_down(&mut self, pos: egui::Pos2) {
        if self.gesture.is_drawing() {
            // A down without a preceding up means the up was lost; keep the work
            debug!("Pointer down while drawing, committing the previous stroke");
            self.pointer_up();
        }

        let brush = self.brush.current();
        let mut builder = self.history.begin_stroke(brush.color, brush.size);
        builder.add_point(pos);
        self.gesture = GestureState::Drawing(builder);
        debug!("Gesture {} at {:?}", self.gesture.name(), pos);
        self.request_render();
    }

    pub fn pointer_move(&mut self, pos: egui::Pos2) {
        if let Some(builder) = self.gesture.builder_mut() {
            builder.add_point(pos);
            self.request_render();
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(builder) = self.gesture.take_builder() {
            let points = builder.points().len();
            if self.history.commit(builder) {
                debug!("Committed stroke with {} point(s)", points);
            }
            self.request_render();
        }
    }

    pub fn pointer_cancel(&mut self) {
        if self.gesture.take_builder().is_some() {
            debug!("Gesture cancelled, stroke discarded");
            self.request_render();
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_drawing()
    }

    pub fn gesture_state(&self) -> &GestureState {
        &self.gesture
    }

    // History ----------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo();
        if undone {
            self.request_render();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo();
        if redone {
            self.request_render();
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn availability(&self) -> HistoryAvailability {
        self.history.availability()
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    pub fn active_strokes(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.history.active_strokes()
    }

    /// Start over: drops history and any stroke in progress
    pub fn clear(&mut self) {
        self.gesture = GestureState::Idle;
        self.history.clear();
        self.request_render();
    }

    // Background -------------------------------------------------------------

    pub fn set_background(&mut self, image: Weak<BackgroundImage>) {
        self.background = Some(image);
        self.request_render();
    }

    pub fn clear_background(&mut self) {
        self.background = None;
        self.request_render();
    }

    /// The background, if it is set and its owner still holds it
    pub fn background(&self) -> Option<BackgroundRef> {
        self.background.as_ref().and_then(Weak::upgrade)
    }

    // Rendering --------------------------------------------------------------

    /// Extent of the canvas in canvas-space units, as laid out by the display
    pub fn set_canvas_size(&mut self, size: Vec2) {
        if self.canvas_size != Some(size) {
            self.canvas_size = Some(size);
            self.request_render();
        }
    }

    pub fn canvas_size(&self) -> Option<Vec2> {
        self.canvas_size
    }

    /// Background, committed strokes, then the stroke being drawn
    pub fn render(&self) -> Composition<'_> {
        let mut composition = self.committed_composition();
        composition.in_progress = self.gesture.builder().and_then(|b| b.to_stroke());
        composition
    }

    /// Like `render`, without the in-progress stroke. This is what exports see.
    pub fn committed_composition(&self) -> Composition<'_> {
        let background = match self.background() {
            Some(image) => Background::Image(image),
            None => Background::Solid(DEFAULT_BACKGROUND),
        };
        Composition {
            background,
            strokes: self.history.active_strokes().collect(),
            in_progress: None,
            canvas_size: self.canvas_size,
        }
    }

    fn request_render(&mut self) {
        self.repaint_requested = true;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Returns whether anything visible changed since the last call
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }

    /// Bumped on every visible change
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::BackgroundImage;
    use egui::Pos2;
    use image::RgbaImage;
    use std::sync::Arc;

    #[test]
    fn test_pointer_down_opens_stroke_with_current_brush() {
        let mut surface = DrawingSurface::new();
        surface.set_brush_size(8.0).unwrap();
        surface.set_brush_color(Color32::RED);

        surface.handle_event(PointerEvent::Down(Pos2::new(1.0, 1.0)));
        assert!(surface.is_drawing());
        assert_eq!(surface.gesture_state().name(), "Drawing");

        let preview = surface.render().in_progress.unwrap();
        assert_eq!(preview.color(), Color32::RED);
        assert_eq!(preview.size(), 8.0);
    }

    #[test]
    fn test_moves_in_idle_are_ignored() {
        let mut surface = DrawingSurface::new();
        surface.take_repaint_request();

        surface.handle_event(PointerEvent::Move(Pos2::new(3.0, 3.0)));
        surface.handle_event(PointerEvent::Up);
        assert!(!surface.is_drawing());
        assert!(surface.history().is_empty());
        assert!(!surface.take_repaint_request());
    }

    #[test]
    fn test_second_down_commits_lost_gesture() {
        let mut surface = DrawingSurface::new();
        surface.handle_event(PointerEvent::Down(Pos2::new(0.0, 0.0)));
        surface.handle_event(PointerEvent::Move(Pos2::new(4.0, 0.0)));
        surface.handle_event(PointerEvent::Down(Pos2::new(9.0, 9.0)));

        assert_eq!(surface.history().len(), 1);
        assert!(surface.is_drawing());
    }

    #[test]
    fn test_mid_gesture_brush_change_does_not_affect_stroke() {
        let mut surface = DrawingSurface::new();
        surface.handle_event(PointerEvent::Down(Pos2::new(0.0, 0.0)));
        surface.set_brush_color(Color32::GREEN);
        surface.set_brush_size(40.0).unwrap();
        surface.handle_event(PointerEvent::Move(Pos2::new(4.0, 0.0)));
        surface.handle_event(PointerEvent::Up);

        let stroke = surface.active_strokes().next().unwrap();
        assert_eq!(stroke.color(), Color32::BLACK);
        assert_eq!(stroke.size(), 20.0);
    }

    #[test]
    fn test_dead_background_falls_back_to_white() {
        let mut surface = DrawingSurface::new();
        let image = BackgroundImage::new_ref(RgbaImage::new(4, 4));
        surface.set_background(Arc::downgrade(&image));
        assert!(matches!(surface.render().background, Background::Image(_)));

        drop(image);
        assert!(surface.background().is_none());
        assert!(matches!(
            surface.render().background,
            Background::Solid(color) if color == DEFAULT_BACKGROUND
        ));
    }

    #[test]
    fn test_changes_request_repaint() {
        let mut surface = DrawingSurface::new();
        assert!(!surface.take_repaint_request());

        surface.handle_event(PointerEvent::Down(Pos2::new(0.0, 0.0)));
        assert!(surface.take_repaint_request());
        assert!(!surface.take_repaint_request());

        let before = surface.revision();
        surface.handle_event(PointerEvent::Up);
        assert!(surface.revision() > before);

        // Nothing to undo twice: the second call is a no-op and repaints nothing
        assert!(surface.undo());
        surface.take_repaint_request();
        assert!(!surface.undo());
        assert!(!surface.take_repaint_request());
    }

    #[test]
    fn test_clear_drops_history_and_gesture() {
        let mut surface = DrawingSurface::new();
        surface.handle_event(PointerEvent::Down(Pos2::new(0.0, 0.0)));
        surface.handle_event(PointerEvent::Up);
        surface.handle_event(PointerEvent::Down(Pos2::new(5.0, 5.0)));

        surface.clear();
        assert!(!surface.is_drawing());
        assert!(!surface.can_undo());
        assert_eq!(surface.render().layers().count(), 0);
    }
}
