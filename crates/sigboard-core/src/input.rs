//! Pointer input and coordinate mapping.
//!
//! Mouse and touch both arrive as [`PointerEvent`]s in client (window)
//! coordinates. [`map_to_canvas`] converts them to bitmap coordinates using
//! the canvas element's on-screen bounds.

use kurbo::{Point, Rect};

/// Which device produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    Mouse,
    /// A touch contact; the id distinguishes fingers.
    Touch(u64),
}

/// A pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed or finger down.
    Down { client: Point, source: PointerSource },
    /// Pointer moved.
    Move { client: Point, source: PointerSource },
    /// Button released or finger lifted.
    Up { source: PointerSource },
    /// Pointer left the canvas.
    Leave,
    /// The platform cancelled the gesture.
    Cancel,
}

impl PointerEvent {
    /// Whether the host should suppress its default handling (scrolling,
    /// text selection) for this event.
    pub fn suppresses_default(&self) -> bool {
        matches!(self, PointerEvent::Down { .. } | PointerEvent::Move { .. })
    }
}

/// Convert a client position to canvas bitmap coordinates.
///
/// Returns the origin when the canvas is not mounted (`bounds` is `None`).
/// The result is not clamped; points outside the bitmap are kept as-is.
pub fn map_to_canvas(client: Point, bounds: Option<Rect>) -> Point {
    match bounds {
        Some(bounds) => Point::new(client.x - bounds.x0, client.y - bounds.y0),
        None => Point::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_to_canvas() {
        let bounds = Rect::new(10.0, 20.0, 110.0, 80.0);
        assert_eq!(
            map_to_canvas(Point::new(15.0, 25.0), Some(bounds)),
            Point::new(5.0, 5.0)
        );
    }

    #[test]
    fn test_map_outside_bounds_not_clamped() {
        let bounds = Rect::new(10.0, 20.0, 110.0, 80.0);
        assert_eq!(
            map_to_canvas(Point::new(0.0, 0.0), Some(bounds)),
            Point::new(-10.0, -20.0)
        );
    }

    #[test]
    fn test_map_unmounted() {
        assert_eq!(map_to_canvas(Point::new(15.0, 25.0), None), Point::ZERO);
    }

    #[test]
    fn test_suppresses_default() {
        let down = PointerEvent::Down {
            client: Point::ZERO,
            source: PointerSource::Mouse,
        };
        let moved = PointerEvent::Move {
            client: Point::ZERO,
            source: PointerSource::Touch(3),
        };
        assert!(down.suppresses_default());
        assert!(moved.suppresses_default());
        assert!(!PointerEvent::Up { source: PointerSource::Mouse }.suppresses_default());
        assert!(!PointerEvent::Leave.suppresses_default());
        assert!(!PointerEvent::Cancel.suppresses_default());
    }
}
