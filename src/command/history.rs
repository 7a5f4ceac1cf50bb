use egui::Color32;
use log::debug;

use super::Edit;
use crate::stroke::{Stroke, StrokeBuilder, StrokeRef};

/// Undo/redo availability, for enabling the toolbar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryAvailability {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Linear undo/redo log of edits.
///
/// `committed` holds the visible edits in draw order. Undo pops its tail
/// onto `redo_stack`; redo pops it back. Committing anything new clears
/// `redo_stack`, so history never branches.
#[derive(Debug, Default)]
pub struct StrokeHistory {
    committed: Vec<Edit>,
    redo_stack: Vec<Edit>,
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a builder for a new stroke. History is untouched until `commit`.
    pub fn begin_stroke(&self, color: Color32, size: f32) -> StrokeBuilder {
        StrokeBuilder::new(color, size)
    }

    /// Finalizes the builder into history.
    ///
    /// Returns `false` and leaves history alone when the builder has no
    /// points. A single point still commits, as a dot.
    pub fn commit(&mut self, builder: StrokeBuilder) -> bool {
        match builder.finish() {
            Some(stroke) => {
                self.push(Edit::AddStroke(stroke));
                true
            }
            None => {
                debug!("Discarding stroke with no points");
                false
            }
        }
    }

    /// Records an already finished stroke
    pub fn commit_stroke(&mut self, stroke: StrokeRef) {
        self.push(Edit::AddStroke(stroke));
    }

    fn push(&mut self, edit: Edit) {
        self.committed.push(edit);
        if !self.redo_stack.is_empty() {
            debug!("New edit drops {} redoable edit(s)", self.redo_stack.len());
            self.redo_stack.clear();
        }
    }

    /// Undo the most recent edit. `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.committed.pop() {
            Some(edit) => {
                self.redo_stack.push(edit);
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone edit. `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(edit) => {
                self.committed.push(edit);
                true
            }
            None => false,
        }
    }

    /// Committed strokes in draw order, earliest first
    pub fn active_strokes(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.committed.iter().filter_map(Edit::stroke)
    }

    /// Committed edits in the order they were applied
    pub fn edits(&self) -> &[Edit] {
        &self.committed
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn availability(&self) -> HistoryAvailability {
        HistoryAvailability {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Number of committed edits
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Number of edits waiting to be redone
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drops both stacks
    pub fn clear(&mut self) {
        self.committed.clear();
        self.redo_stack.clear();
    }
}
