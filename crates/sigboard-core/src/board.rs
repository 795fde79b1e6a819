//! The whiteboard component.
//!
//! [`Board`] owns the active style, the stroke history, the recorder and the
//! mounted drawing surface. All mutation goes through [`Board::update`].

use crate::config::BoardConfig;
use crate::history::History;
use crate::input::{PointerEvent, map_to_canvas};
use crate::recorder::{RecorderState, StrokeRecorder};
use crate::replay::{draw_stroke, replay};
use crate::resize::layout_canvas;
use crate::stroke::{Stroke, StrokeColor, StrokeStyle};
use crate::surface::{CanvasSize, DrawSurface};
use kurbo::{Point, Rect};

/// Inputs the board reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoardMessage {
    Pointer(PointerEvent),
    SetColor(StrokeColor),
    SetLineWidth(f64),
    /// Remove the most recent stroke.
    Undo,
    /// Remove every stroke, including one in progress.
    Clear,
    /// The container's layout box changed (client coordinates).
    Resize { container: Rect },
}

/// What the host should do after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardResponse {
    /// Suppress the platform's default handling of the input event.
    pub prevent_default: bool,
    /// The bitmap or history changed and should be presented.
    pub changed: bool,
}

impl BoardResponse {
    fn changed(changed: bool) -> Self {
        Self {
            prevent_default: false,
            changed,
        }
    }
}

/// Freehand whiteboard over a [`DrawSurface`].
#[derive(Debug)]
pub struct Board<S: DrawSurface> {
    config: BoardConfig,
    style: StrokeStyle,
    history: History,
    recorder: StrokeRecorder,
    surface: Option<S>,
    /// On-screen rectangle of the canvas, in client coordinates.
    bounds: Option<Rect>,
}

impl<S: DrawSurface> Default for Board<S> {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl<S: DrawSurface> Board<S> {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            style: config.default_style,
            config,
            history: History::new(),
            recorder: StrokeRecorder::new(),
            surface: None,
            bounds: None,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Style new strokes will be drawn with.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_drawing()
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn canvas_size(&self) -> Option<CanvasSize> {
        self.surface.as_ref().map(DrawSurface::size)
    }

    /// Attach a surface at the client origin and draw the history onto it.
    ///
    /// A zero-sized surface is grown to the configured fallback size.
    pub fn mount(&mut self, mut surface: S) {
        if surface.size().is_empty() {
            surface.resize(self.config.fallback_size);
        }
        let size = surface.size();
        self.bounds = Some(Rect::from_origin_size(Point::ZERO, size.to_size()));
        self.surface = Some(surface);
        self.redraw();
        log::debug!("Board mounted at {}x{}", size.width, size.height);
    }

    /// Detach the surface. A stroke in progress is dropped.
    pub fn unmount(&mut self) -> Option<S> {
        self.recorder.discard();
        self.bounds = None;
        self.surface.take()
    }

    /// Draw the history, then the stroke in progress, onto `target`.
    pub fn render_to<T: DrawSurface + ?Sized>(&self, target: &mut T) {
        render(target, &self.history, &self.recorder);
    }

    /// Apply one message.
    pub fn update(&mut self, message: BoardMessage) -> BoardResponse {
        match message {
            BoardMessage::Pointer(event) => self.handle_pointer(event),
            BoardMessage::SetColor(color) => {
                let changed = self.style.color != color;
                self.style.color = color;
                BoardResponse::changed(changed)
            }
            BoardMessage::SetLineWidth(width) => {
                let width = self.config.clamp_line_width(width);
                let changed = self.style.line_width != width;
                self.style.line_width = width;
                BoardResponse::changed(changed)
            }
            BoardMessage::Undo => BoardResponse::changed(self.undo()),
            BoardMessage::Clear => BoardResponse::changed(self.clear()),
            BoardMessage::Resize { container } => BoardResponse::changed(self.resize(container)),
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> BoardResponse {
        let mut response = BoardResponse {
            prevent_default: event.suppresses_default(),
            changed: false,
        };

        match event {
            PointerEvent::Down { client, .. } => {
                if !self.is_mounted() {
                    return response;
                }
                let point = map_to_canvas(client, self.bounds);
                if let Some(open) = self.recorder.press(point, self.style) {
                    self.commit(open);
                    response.changed = true;
                }
            }
            PointerEvent::Move { client, .. } => {
                if !self.is_mounted() {
                    return response;
                }
                let point = map_to_canvas(client, self.bounds);
                if let Some(segment) = self.recorder.extend(point) {
                    log::trace!("Segment {:?} -> {:?}", segment.from, segment.to);
                    self.redraw();
                    response.changed = true;
                }
            }
            PointerEvent::Up { .. } | PointerEvent::Leave | PointerEvent::Cancel => {
                if let Some(stroke) = self.recorder.release() {
                    self.commit(stroke);
                    response.changed = true;
                }
            }
        }

        response
    }

    fn commit(&mut self, stroke: Stroke) {
        log::debug!(
            "Committed stroke of {} points ({}, width {})",
            stroke.len(),
            stroke.style().color,
            stroke.style().line_width
        );
        self.history.push(stroke);
    }

    fn undo(&mut self) -> bool {
        if self.history.pop().is_none() {
            return false;
        }
        log::debug!("Undo, {} strokes left", self.history.len());
        self.redraw();
        true
    }

    fn clear(&mut self) -> bool {
        let had_content = !self.history.is_empty() || self.recorder.is_drawing();
        self.history.clear();
        self.recorder.discard();
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        log::debug!("Board cleared");
        had_content || self.is_mounted()
    }

    fn resize(&mut self, container: Rect) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let size = layout_canvas(container.size(), self.config.height_ratio);
        surface.resize(size);
        self.bounds = Some(Rect::from_origin_size(container.origin(), size.to_size()));
        log::debug!("Canvas resized to {}x{}", size.width, size.height);
        self.redraw();
        true
    }

    fn redraw(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            render(surface, &self.history, &self.recorder);
        }
    }
}

/// Replay `history`, then stroke the recorder's open path as one polyline.
fn render<T: DrawSurface + ?Sized>(target: &mut T, history: &History, recorder: &StrokeRecorder) {
    replay(target, history);
    if let RecorderState::Drawing { path, style } = recorder.state() {
        if let Some(open) = Stroke::new(path.clone(), *style) {
            draw_stroke(target, &open);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerSource;
    use crate::stroke::PaletteColor;
    use crate::surface::{RecordingSurface, SurfaceCommand};

    fn mounted() -> Board<RecordingSurface> {
        let mut board = Board::default();
        board.mount(RecordingSurface::new(CanvasSize::new(200, 100)));
        board
    }

    fn down(x: f64, y: f64) -> BoardMessage {
        BoardMessage::Pointer(PointerEvent::Down {
            client: Point::new(x, y),
            source: PointerSource::Mouse,
        })
    }

    fn moved(x: f64, y: f64) -> BoardMessage {
        BoardMessage::Pointer(PointerEvent::Move {
            client: Point::new(x, y),
            source: PointerSource::Mouse,
        })
    }

    fn up() -> BoardMessage {
        BoardMessage::Pointer(PointerEvent::Up {
            source: PointerSource::Mouse,
        })
    }

    fn draw_line(board: &mut Board<RecordingSurface>, from: (f64, f64), to: (f64, f64)) {
        board.update(down(from.0, from.1));
        board.update(moved(to.0, to.1));
        board.update(up());
    }

    #[test]
    fn test_single_stroke_scenario() {
        let mut board = mounted();
        board.update(down(10.0, 10.0));
        board.update(moved(20.0, 10.0));
        board.update(moved(30.0, 10.0));
        board.update(up());

        assert_eq!(board.history().len(), 1);
        let stroke = &board.history().strokes()[0];
        assert_eq!(
            stroke.path(),
            &[
                Point::new(10.0, 10.0),
                Point::new(20.0, 10.0),
                Point::new(30.0, 10.0)
            ]
        );
        assert_eq!(stroke.style().color.to_string(), "black");
        assert_eq!(stroke.style().line_width, 3.0);
    }

    #[test]
    fn test_n_sequences_give_n_strokes() {
        let mut board = mounted();
        for i in 0..7 {
            let y = i as f64 * 10.0;
            draw_line(&mut board, (5.0, y), (50.0, y));
        }
        assert_eq!(board.history().len(), 7);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut board = mounted();
        let response = board.update(BoardMessage::Undo);
        assert!(!response.changed);
        assert!(board.history().is_empty());
    }

    #[test]
    fn test_undo_removes_last_stroke() {
        let mut board = mounted();
        draw_line(&mut board, (10.0, 10.0), (90.0, 10.0));
        draw_line(&mut board, (10.0, 50.0), (90.0, 50.0));

        assert!(board.update(BoardMessage::Undo).changed);
        assert_eq!(board.history().len(), 1);
        assert_eq!(board.history().strokes()[0].first_point(), Point::new(10.0, 10.0));

        let visible = board.surface().unwrap().visible_strokes();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].points.as_slice(), board.history().strokes()[0].path());
    }

    #[test]
    fn test_style_applies_to_next_stroke() {
        let mut board = mounted();
        board.update(BoardMessage::SetColor(PaletteColor::Red.into()));
        board.update(BoardMessage::SetLineWidth(5.0));
        draw_line(&mut board, (1.0, 1.0), (9.0, 9.0));

        let style = board.history().strokes()[0].style();
        assert_eq!(style.color.to_string(), "red");
        assert_eq!(style.line_width, 5.0);
    }

    #[test]
    fn test_style_snapshot_at_press() {
        let mut board = mounted();
        board.update(down(1.0, 1.0));
        board.update(BoardMessage::SetColor(PaletteColor::Blue.into()));
        board.update(moved(9.0, 9.0));
        board.update(up());

        assert_eq!(
            board.history().strokes()[0].style().color,
            PaletteColor::Black.color()
        );
        assert_eq!(board.style().color, PaletteColor::Blue.color());
    }

    #[test]
    fn test_line_width_clamped() {
        let mut board: Board<RecordingSurface> = Board::default();
        board.update(BoardMessage::SetLineWidth(25.0));
        assert_eq!(board.style().line_width, 10.0);
        board.update(BoardMessage::SetLineWidth(0.0));
        assert_eq!(board.style().line_width, 1.0);
    }

    #[test]
    fn test_clear_after_three_strokes() {
        let mut board = mounted();
        for i in 0..3 {
            let y = 10.0 + i as f64 * 20.0;
            draw_line(&mut board, (10.0, y), (90.0, y));
        }
        board.update(down(5.0, 5.0));
        board.update(moved(6.0, 6.0));

        assert!(board.update(BoardMessage::Clear).changed);
        assert!(board.history().is_empty());
        assert!(!board.is_drawing());
        assert!(board.surface().unwrap().is_blank());

        board.update(up());
        assert!(board.history().is_empty());
    }

    #[test]
    fn test_pointer_prevent_default() {
        let mut board = mounted();
        assert!(board.update(down(1.0, 1.0)).prevent_default);
        assert!(board.update(moved(2.0, 2.0)).prevent_default);
        assert!(!board.update(up()).prevent_default);
    }

    #[test]
    fn test_move_while_idle_ignored() {
        let mut board = mounted();
        board.surface_mut().unwrap().take_commands();
        let response = board.update(moved(5.0, 5.0));
        assert!(!response.changed);
        assert!(board.surface().unwrap().commands().is_empty());
    }

    #[test]
    fn test_leave_and_cancel_end_stroke() {
        let mut board = mounted();
        board.update(down(1.0, 1.0));
        board.update(moved(2.0, 2.0));
        board.update(BoardMessage::Pointer(PointerEvent::Leave));
        board.update(down(3.0, 3.0));
        board.update(BoardMessage::Pointer(PointerEvent::Cancel));
        assert_eq!(board.history().len(), 2);
        assert_eq!(board.history().strokes()[1].len(), 1);
    }

    #[test]
    fn test_move_redraws_open_stroke_as_one_path() {
        let mut board = mounted();
        board.update(down(10.0, 10.0));
        board.update(moved(20.0, 10.0));
        board.surface_mut().unwrap().take_commands();
        board.update(moved(20.0, 30.0));

        let commands = board.surface().unwrap().commands();
        assert!(matches!(commands.first(), Some(SurfaceCommand::ClearRect(_))));
        assert_eq!(
            &commands[commands.len() - 4..],
            &[
                SurfaceCommand::MoveTo(Point::new(10.0, 10.0)),
                SurfaceCommand::LineTo(Point::new(20.0, 10.0)),
                SurfaceCommand::LineTo(Point::new(20.0, 30.0)),
                SurfaceCommand::Stroke,
            ]
        );
        assert_eq!(board.surface().unwrap().visible_strokes().len(), 1);
    }

    #[test]
    fn test_render_to_includes_open_stroke() {
        let mut board = mounted();
        draw_line(&mut board, (10.0, 10.0), (40.0, 10.0));
        board.update(down(10.0, 50.0));
        board.update(moved(60.0, 50.0));

        let mut target = RecordingSurface::new(CanvasSize::new(200, 100));
        board.render_to(&mut target);
        assert_eq!(
            target.visible_strokes(),
            board.surface().unwrap().visible_strokes()
        );
        assert_eq!(target.visible_strokes().len(), 2);
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn test_resize_keeps_absolute_coordinates() {
        let mut board = mounted();
        draw_line(&mut board, (10.0, 10.0), (40.0, 10.0));

        let response = board.update(BoardMessage::Resize {
            container: Rect::new(50.0, 20.0, 550.0, 520.0),
        });
        assert!(response.changed);
        assert_eq!(board.canvas_size(), Some(CanvasSize::new(500, 300)));
        assert_eq!(board.bounds(), Some(Rect::new(50.0, 20.0, 550.0, 320.0)));

        let visible = board.surface().unwrap().visible_strokes();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].points[0], Point::new(10.0, 10.0));

        // Client coordinates are now offset by the container origin
        board.update(down(60.0, 30.0));
        board.update(up());
        assert_eq!(board.history().strokes()[1].first_point(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_unmounted_board() {
        let mut board: Board<RecordingSurface> = Board::default();
        assert!(board.canvas_size().is_none());

        let response = board.update(down(1.0, 1.0));
        assert!(response.prevent_default);
        assert!(!board.is_drawing());
        assert!(!board.update(BoardMessage::Resize {
            container: Rect::new(0.0, 0.0, 100.0, 100.0)
        })
        .changed);
        assert!(!board.update(BoardMessage::Undo).changed);
    }

    #[test]
    fn test_undo_without_surface_still_mutates_history() {
        let mut board = mounted();
        draw_line(&mut board, (1.0, 1.0), (5.0, 5.0));
        draw_line(&mut board, (1.0, 9.0), (5.0, 9.0));
        let surface = board.unmount();
        assert!(surface.is_some());

        assert!(board.update(BoardMessage::Undo).changed);
        assert_eq!(board.history().len(), 1);

        board.mount(RecordingSurface::new(CanvasSize::new(20, 20)));
        assert_eq!(board.surface().unwrap().visible_strokes().len(), 1);
    }

    #[test]
    fn test_mount_uses_fallback_size() {
        let mut board = Board::default();
        board.mount(RecordingSurface::default());
        assert_eq!(board.canvas_size(), Some(CanvasSize::new(900, 400)));
    }
}
