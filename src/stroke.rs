use egui::{Color32, Pos2, Rect};
use std::sync::Arc;

use crate::geometry;

/// Immutable record of one committed freehand gesture.
///
/// Points are canvas-space and kept in the order the pointer visited them.
/// There is no way to mutate a `Stroke` once built; history edits add or
/// remove whole strokes.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    points: Vec<Pos2>,
    color: Color32,
    size: f32,
}

// Strokes are shared between the history and compositions without copying
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// A stroke with a single point is drawn as a round dot
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    /// Canvas-space area touched by the stroke, including the brush radius
    pub fn bounds(&self) -> Rect {
        geometry::calculate_bounds(&self.points, self.size / 2.0)
    }
}

/// Accumulates the points of the stroke currently being drawn.
///
/// The color and size are captured once when the builder is opened, so
/// brush changes in the middle of a gesture never leak into it.
#[derive(Clone, Debug)]
pub struct StrokeBuilder {
    points: Vec<Pos2>,
    color: Color32,
    size: f32,
}

impl StrokeBuilder {
    pub fn new(color: Color32, size: f32) -> Self {
        Self {
            points: Vec::new(),
            color,
            size,
        }
    }

    /// Appends a point, skipping exact repeats of the last one
    pub fn add_point(&mut self, point: Pos2) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Snapshot of the in-progress geometry, used for previews
    pub fn to_stroke(&self) -> Option<Stroke> {
        if self.points.is_empty() {
            return None;
        }
        Some(Stroke {
            points: self.points.clone(),
            color: self.color,
            size: self.size,
        })
    }

    /// Consumes the builder. `None` when no point was ever recorded.
    pub fn finish(self) -> Option<StrokeRef> {
        if self.points.is_empty() {
            return None;
        }
        Some(Arc::new(Stroke {
            points: self.points,
            color: self.color,
            size: self.size,
        }))
    }
}
