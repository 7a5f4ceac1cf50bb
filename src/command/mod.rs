mod history;

use crate::stroke::{Stroke, StrokeRef};

pub use history::{HistoryAvailability, StrokeHistory};

/// One undoable change to the drawing.
///
/// Strokes are the only edit today; erasing or reordering would become new
/// variants here and flow through the same history.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Appends a stroke on top of everything drawn so far
    AddStroke(StrokeRef),
}

impl Edit {
    /// The stroke this edit paints, if it paints one
    pub fn stroke(&self) -> Option<&Stroke> {
        match self {
            Edit::AddStroke(stroke) => Some(stroke),
        }
    }
}
