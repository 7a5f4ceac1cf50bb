//! Gesture state machine of the drawing surface.
//!
//! ```text
//!          pointer-down              pointer-up (commit)
//!   ┌──────┐ ───────────► ┌─────────┐ ──────────────► ┌──────┐
//!   │ Idle │              │ Drawing │                 │ Idle │
//!   └──────┘ ◄─────────── └─────────┘                 └──────┘
//!              pointer-cancel (discard)
//! ```
//!
//! Pointer-move keeps `Drawing` and appends a point; in `Idle` it is ignored.

use crate::stroke::StrokeBuilder;

#[derive(Debug, Clone, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Drawing(StrokeBuilder),
}

impl GestureState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Drawing(_) => "Drawing",
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing(_))
    }

    /// The stroke being drawn, if any
    pub fn builder(&self) -> Option<&StrokeBuilder> {
        match self {
            Self::Drawing(builder) => Some(builder),
            Self::Idle => None,
        }
    }

    pub fn builder_mut(&mut self) -> Option<&mut StrokeBuilder> {
        match self {
            Self::Drawing(builder) => Some(builder),
            Self::Idle => None,
        }
    }

    /// Returns to `Idle`, handing back the builder that was in progress
    pub fn take_builder(&mut self) -> Option<StrokeBuilder> {
        match std::mem::take(self) {
            Self::Drawing(builder) => Some(builder),
            Self::Idle => None,
        }
    }
}
