//! Translation of window input into board pointer events.

use kurbo::{Point, Rect};
use sigboard_core::{PointerEvent, PointerSource};
use winit::event::TouchPhase;

/// Tracks mouse and touch state between window events.
///
/// All positions are logical window coordinates, the same space the canvas
/// rectangle is laid out in.
#[derive(Debug, Default)]
pub struct EventHandler {
    /// Last known mouse position, `None` once it left the window.
    cursor: Option<Point>,
    /// Left button went down on the canvas and has not been released.
    mouse_drawing: bool,
    /// The finger that started the current touch stroke.
    active_touch: Option<u64>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// A mouse or touch stroke is being tracked.
    pub fn is_drawing(&self) -> bool {
        self.mouse_drawing || self.active_touch.is_some()
    }

    pub fn cursor_moved(&mut self, position: Point, canvas: Rect) -> Option<PointerEvent> {
        self.cursor = Some(position);
        if !self.mouse_drawing {
            return None;
        }
        if canvas.contains(position) {
            Some(PointerEvent::Move {
                client: position,
                source: PointerSource::Mouse,
            })
        } else {
            self.mouse_drawing = false;
            Some(PointerEvent::Leave)
        }
    }

    pub fn cursor_left(&mut self) -> Option<PointerEvent> {
        self.cursor = None;
        if std::mem::take(&mut self.mouse_drawing) {
            Some(PointerEvent::Leave)
        } else {
            None
        }
    }

    /// Left button press or release. Presses only start a stroke on the canvas.
    pub fn mouse_button(&mut self, pressed: bool, canvas: Rect) -> Option<PointerEvent> {
        if pressed {
            let client = self.cursor.filter(|p| canvas.contains(*p))?;
            self.mouse_drawing = true;
            Some(PointerEvent::Down {
                client,
                source: PointerSource::Mouse,
            })
        } else if std::mem::take(&mut self.mouse_drawing) {
            Some(PointerEvent::Up {
                source: PointerSource::Mouse,
            })
        } else {
            None
        }
    }

    /// Touch input. Only the first finger on the canvas draws.
    pub fn touch(
        &mut self,
        phase: TouchPhase,
        id: u64,
        position: Point,
        canvas: Rect,
    ) -> Option<PointerEvent> {
        let source = PointerSource::Touch(id);
        match phase {
            TouchPhase::Started => {
                if self.active_touch.is_some() || !canvas.contains(position) {
                    return None;
                }
                self.active_touch = Some(id);
                Some(PointerEvent::Down {
                    client: position,
                    source,
                })
            }
            TouchPhase::Moved => (self.active_touch == Some(id)).then_some(PointerEvent::Move {
                client: position,
                source,
            }),
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.active_touch != Some(id) {
                    return None;
                }
                self.active_touch = None;
                if phase == TouchPhase::Ended {
                    Some(PointerEvent::Up { source })
                } else {
                    Some(PointerEvent::Cancel)
                }
            }
        }
    }
}
