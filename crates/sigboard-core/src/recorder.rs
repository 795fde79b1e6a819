//! Stroke recorder: the idle/drawing state machine.

use crate::stroke::{Stroke, StrokeStyle};
use kurbo::Point;

/// State of the recorder.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RecorderState {
    /// Waiting for a press.
    #[default]
    Idle,
    /// Between press and release.
    Drawing {
        /// Points so far, starting with the press point.
        path: Vec<Point>,
        /// Style snapshotted at press time.
        style: StrokeStyle,
    },
}

/// A newly added line segment, to be drawn incrementally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub style: StrokeStyle,
}

/// Accumulates points between press and release.
#[derive(Debug, Clone, Default)]
pub struct StrokeRecorder {
    state: RecorderState,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, RecorderState::Drawing { .. })
    }

    /// Points of the stroke in progress (empty when idle).
    pub fn current_path(&self) -> &[Point] {
        match &self.state {
            RecorderState::Drawing { path, .. } => path,
            RecorderState::Idle => &[],
        }
    }

    /// Start a stroke at `point` with `style`.
    ///
    /// A stroke that is still open is finished first and returned.
    pub fn press(&mut self, point: Point, style: StrokeStyle) -> Option<Stroke> {
        let open = self.release();
        self.state = RecorderState::Drawing {
            path: vec![point],
            style,
        };
        open
    }

    /// Append `point` to the open stroke. Ignored while idle.
    pub fn extend(&mut self, point: Point) -> Option<Segment> {
        let RecorderState::Drawing { path, style } = &mut self.state else {
            return None;
        };
        let from = path.last().copied().unwrap_or(point);
        path.push(point);
        Some(Segment {
            from,
            to: point,
            style: *style,
        })
    }

    /// Finish the open stroke. Returns it when it has at least one point.
    pub fn release(&mut self) -> Option<Stroke> {
        match std::mem::take(&mut self.state) {
            RecorderState::Drawing { path, style } => Stroke::new(path, style),
            RecorderState::Idle => None,
        }
    }

    /// Drop the open stroke without committing it.
    pub fn discard(&mut self) {
        self.state = RecorderState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::PaletteColor;

    #[test]
    fn test_press_move_release() {
        let mut recorder = StrokeRecorder::new();
        assert!(recorder.press(Point::new(10.0, 10.0), StrokeStyle::default()).is_none());

        let segment = recorder.extend(Point::new(20.0, 10.0)).unwrap();
        assert_eq!(segment.from, Point::new(10.0, 10.0));
        assert_eq!(segment.to, Point::new(20.0, 10.0));
        recorder.extend(Point::new(30.0, 10.0));

        let stroke = recorder.release().unwrap();
        assert_eq!(
            stroke.path(),
            &[
                Point::new(10.0, 10.0),
                Point::new(20.0, 10.0),
                Point::new(30.0, 10.0)
            ]
        );
        assert!(!recorder.is_drawing());
    }

    #[test]
    fn test_idle_ignores_move_and_release() {
        let mut recorder = StrokeRecorder::new();
        assert!(recorder.extend(Point::new(1.0, 1.0)).is_none());
        assert!(recorder.release().is_none());
        assert_eq!(recorder.state(), &RecorderState::Idle);
    }

    #[test]
    fn test_press_only_commits_single_point() {
        let mut recorder = StrokeRecorder::new();
        recorder.press(Point::new(4.0, 4.0), StrokeStyle::default());
        let stroke = recorder.release().unwrap();
        assert_eq!(stroke.len(), 1);
    }

    #[test]
    fn test_press_while_drawing_commits_open_stroke() {
        let mut recorder = StrokeRecorder::new();
        recorder.press(Point::new(1.0, 1.0), StrokeStyle::default());
        recorder.extend(Point::new(2.0, 2.0));

        let open = recorder.press(Point::new(50.0, 50.0), StrokeStyle::default());
        assert_eq!(open.map(|s| s.len()), Some(2));
        assert_eq!(recorder.current_path(), &[Point::new(50.0, 50.0)]);
    }

    #[test]
    fn test_segments_use_press_style() {
        let style = StrokeStyle::new(PaletteColor::Green, 7.0);
        let mut recorder = StrokeRecorder::new();
        recorder.press(Point::ZERO, style);
        let segment = recorder.extend(Point::new(3.0, 4.0)).unwrap();
        assert_eq!(segment.style, style);
    }

    #[test]
    fn test_discard() {
        let mut recorder = StrokeRecorder::new();
        recorder.press(Point::ZERO, StrokeStyle::default());
        recorder.discard();
        assert!(recorder.release().is_none());
        assert!(recorder.current_path().is_empty());
    }
}
