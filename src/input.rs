use egui::{Pos2, Rect, Response};

/// Pointer gesture events consumed by the drawing surface.
///
/// Positions are canvas-space, i.e. relative to the top-left corner of the
/// drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button pressed or finger touched down
    Down(Pos2),
    /// Pointer moved while pressed
    Move(Pos2),
    /// Gesture finished normally
    Up,
    /// Gesture aborted by the platform; the stroke must be dropped
    Cancel,
}

/// Converts egui pointer interaction on the canvas into `PointerEvent`s
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    pressed: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a screen position to canvas-space
    pub fn to_canvas(canvas_rect: Rect, pos: Pos2) -> Pos2 {
        (pos - canvas_rect.min).to_pos2()
    }

    /// Process one frame of interaction with the canvas widget.
    ///
    /// A gesture starts on the frame the button goes down on the canvas and
    /// at the press position, before egui has decided whether it is a click
    /// or a drag.
    pub fn process(&mut self, response: &Response, cancel_requested: bool) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let rect = response.rect;
        let (press_origin, latest_pos, released) = response.ctx.input(|i| {
            (
                i.pointer.press_origin(),
                i.pointer.interact_pos(),
                i.pointer.primary_released(),
            )
        });

        if self.pressed && cancel_requested {
            events.push(PointerEvent::Cancel);
            self.pressed = false;
            self.last_pointer_pos = None;
            return events;
        }

        if !self.pressed && (response.is_pointer_button_down_on() || response.clicked()) {
            if let Some(pos) = press_origin.or(latest_pos) {
                events.push(PointerEvent::Down(Self::to_canvas(rect, pos)));
                self.pressed = true;
                self.last_pointer_pos = Some(pos);
            }
        }

        if self.pressed {
            if let Some(pos) = latest_pos {
                if Some(pos) != self.last_pointer_pos {
                    events.push(PointerEvent::Move(Self::to_canvas(rect, pos)));
                    self.last_pointer_pos = Some(pos);
                }
            }

            if released || !response.is_pointer_button_down_on() {
                events.push(PointerEvent::Up);
                self.pressed = false;
                self.last_pointer_pos = None;
            }
        }

        events
    }
}
