//! History renderer.
//!
//! Rebuilds the bitmap from scratch: the history is the source of truth and
//! there is no incremental erase, so undo and resize both come through here.

use crate::history::History;
use crate::stroke::Stroke;
use crate::surface::DrawSurface;

/// Clear the whole surface and redraw every stroke in history order.
pub fn replay<S: DrawSurface + ?Sized>(surface: &mut S, history: &History) {
    surface.clear();
    for stroke in history {
        draw_stroke(surface, stroke);
    }
    log::trace!("Replayed {} strokes", history.len());
}

/// Draw one committed stroke as a single polyline.
pub fn draw_stroke<S: DrawSurface + ?Sized>(surface: &mut S, stroke: &Stroke) {
    surface.apply_style(stroke.style());
    surface.begin_path();
    surface.move_to(stroke.first_point());
    for point in &stroke.path()[1..] {
        surface.line_to(*point);
    }
    surface.stroke();
}
