//! CPU raster surface backed by a tiny-skia pixmap.

use kurbo::{BezPath, PathEl, Point, Rect};
use sigboard_core::{CanvasSize, DrawSurface, StrokeColor};
use thiserror::Error;
use tiny_skia::{
    BlendMode, Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

/// Canvas default miter limit.
const MITER_LIMIT: f32 = 10.0;

/// Errors from allocating a raster surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("Cannot allocate a {width}x{height} bitmap")]
    Allocation { width: u32, height: u32 },
}

/// An RGBA bitmap that implements [`DrawSurface`].
///
/// A zero-sized surface has no pixmap; drawing on it is a no-op.
pub struct PixmapSurface {
    size: CanvasSize,
    pixmap: Option<Pixmap>,
    path: BezPath,
    color: StrokeColor,
    line_width: f64,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("size", &self.size)
            .field("allocated", &self.pixmap.is_some())
            .field("color", &self.color)
            .field("line_width", &self.line_width)
            .finish()
    }
}

impl PixmapSurface {
    /// A transparent surface of `size`. Falls back to an unallocated surface
    /// when the bitmap cannot be created.
    pub fn new(size: CanvasSize) -> Self {
        Self::try_new(size).unwrap_or_else(|_| Self::unallocated(size))
    }

    /// Like [`PixmapSurface::new`], but fails instead of degrading.
    pub fn try_new(size: CanvasSize) -> Result<Self, SurfaceError> {
        let pixmap = allocate(size)?;
        Ok(Self {
            pixmap: Some(pixmap),
            ..Self::unallocated(size)
        })
    }

    fn unallocated(size: CanvasSize) -> Self {
        Self {
            size,
            pixmap: None,
            path: BezPath::new(),
            color: StrokeColor::BLACK,
            line_width: 1.0,
        }
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Straight-alpha RGBA8 bytes, row-major. Empty when unallocated.
    pub fn to_rgba(&self) -> Vec<u8> {
        let Some(pixmap) = &self.pixmap else {
            return Vec::new();
        };
        let mut rgba = Vec::with_capacity(pixmap.pixels().len() * 4);
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        rgba
    }

    /// Straight-alpha RGBA of one pixel, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pixmap = self.pixmap.as_ref()?;
        let c = pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap
            .as_ref()
            .is_none_or(|p| p.pixels().iter().all(|px| px.alpha() == 0))
    }

    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(self.color.r, self.color.g, self.color.b, self.color.a);
        paint.anti_alias = true;
        paint
    }
}

fn allocate(size: CanvasSize) -> Result<Pixmap, SurfaceError> {
    Pixmap::new(size.width, size.height).ok_or(SurfaceError::Allocation {
        width: size.width,
        height: size.height,
    })
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(a, b) => builder.quad_to(a.x as f32, a.y as f32, b.x as f32, b.y as f32),
            PathEl::CurveTo(a, b, c) => builder.cubic_to(
                a.x as f32, a.y as f32, b.x as f32, b.y as f32, c.x as f32, c.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

impl DrawSurface for PixmapSurface {
    fn size(&self) -> CanvasSize {
        self.size
    }

    fn resize(&mut self, size: CanvasSize) {
        self.size = size;
        self.pixmap = match allocate(size) {
            Ok(pixmap) => Some(pixmap),
            Err(e) => {
                if !size.is_empty() {
                    log::warn!("{}", e);
                }
                None
            }
        };
        self.path = BezPath::new();
    }

    fn clear_rect(&mut self, rect: Rect) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        if rect.intersect(self.size.to_rect()) == self.size.to_rect() {
            pixmap.fill(Color::TRANSPARENT);
            return;
        }
        let Some(region) = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        ) else {
            return;
        };
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        pixmap.fill_rect(region, &paint, Transform::identity(), None);
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point);
    }

    fn line_to(&mut self, point: Point) {
        if self.path.elements().is_empty() {
            self.path.move_to(point);
        } else {
            self.path.line_to(point);
        }
    }

    fn stroke(&mut self) {
        if self.pixmap.is_none() || self.line_width <= 0.0 {
            return;
        }
        // Move-only paths leave no mark
        let Some(path) = to_skia_path(&self.path) else {
            return;
        };
        let paint = self.paint();
        let stroke = Stroke {
            width: self.line_width as f32,
            miter_limit: MITER_LIMIT,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            dash: None,
        };
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn set_stroke_color(&mut self, color: StrokeColor) {
        self.color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigboard_core::{
        Board, BoardMessage, History, PaletteColor, PointerEvent, PointerSource,
        Stroke as BoardStroke, StrokeStyle, replay,
    };

    fn line(surface: &mut PixmapSurface, from: (f64, f64), to: (f64, f64)) {
        surface.begin_path();
        surface.move_to(Point::new(from.0, from.1));
        surface.line_to(Point::new(to.0, to.1));
        surface.stroke();
    }

    #[test]
    fn test_new_surface_is_blank() {
        let surface = PixmapSurface::new(CanvasSize::new(16, 16));
        assert!(surface.is_blank());
        assert_eq!(surface.to_rgba().len(), 16 * 16 * 4);
    }

    #[test]
    fn test_zero_size_surface() {
        assert_eq!(
            PixmapSurface::try_new(CanvasSize::new(0, 5)).unwrap_err(),
            SurfaceError::Allocation { width: 0, height: 5 }
        );

        let mut surface = PixmapSurface::new(CanvasSize::new(0, 5));
        line(&mut surface, (0.0, 0.0), (4.0, 4.0));
        assert!(surface.is_blank());
        assert!(surface.to_rgba().is_empty());
    }

    #[test]
    fn test_stroke_paints_color() {
        let mut surface = PixmapSurface::new(CanvasSize::new(40, 20));
        surface.set_stroke_color(PaletteColor::Red.color());
        surface.set_line_width(4.0);
        line(&mut surface, (0.0, 10.0), (40.0, 10.0));

        assert_eq!(surface.pixel(20, 10), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(20, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_move_only_path_draws_nothing() {
        let mut surface = PixmapSurface::new(CanvasSize::new(20, 20));
        surface.set_line_width(5.0);
        surface.begin_path();
        surface.move_to(Point::new(10.0, 10.0));
        surface.stroke();
        assert!(surface.is_blank());
    }

    #[test]
    fn test_clear_rect_partial_and_full() {
        let mut surface = PixmapSurface::new(CanvasSize::new(40, 40));
        surface.set_line_width(4.0);
        line(&mut surface, (0.0, 10.0), (40.0, 10.0));
        line(&mut surface, (0.0, 30.0), (40.0, 30.0));

        surface.clear_rect(Rect::new(0.0, 0.0, 40.0, 20.0));
        assert_eq!(surface.pixel(20, 10), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(20, 30).map(|p| p[3]), Some(255));

        surface.clear();
        assert!(surface.is_blank());
    }

    #[test]
    fn test_resize_clears_bitmap() {
        let mut surface = PixmapSurface::new(CanvasSize::new(20, 20));
        surface.set_line_width(4.0);
        line(&mut surface, (0.0, 10.0), (20.0, 10.0));
        surface.resize(CanvasSize::new(30, 10));

        assert_eq!(surface.size(), CanvasSize::new(30, 10));
        assert!(surface.is_blank());
    }

    #[test]
    fn test_replay_is_idempotent_on_pixels() {
        let mut history = History::new();
        let style = StrokeStyle::new(PaletteColor::Blue, 3.0);
        history.push(
            BoardStroke::new(
                vec![Point::new(2.0, 2.0), Point::new(30.0, 15.0), Point::new(5.0, 28.0)],
                style,
            )
            .unwrap(),
        );
        history.push(
            BoardStroke::new(
                vec![Point::new(0.0, 16.0), Point::new(32.0, 16.0)],
                StrokeStyle::default(),
            )
            .unwrap(),
        );

        let mut surface = PixmapSurface::new(CanvasSize::new(32, 32));
        replay(&mut surface, &history);
        let once = surface.to_rgba();
        replay(&mut surface, &history);
        assert_eq!(surface.to_rgba(), once);
        assert!(!surface.is_blank());
    }

    #[test]
    fn test_undo_matches_fresh_replay() {
        let mut board = Board::default();
        board.mount(PixmapSurface::new(CanvasSize::new(60, 60)));
        for (y, color) in [(15.0, PaletteColor::Green), (45.0, PaletteColor::Orange)] {
            board.update(BoardMessage::SetColor(color.into()));
            board.update(BoardMessage::Pointer(PointerEvent::Down {
                client: Point::new(5.0, y),
                source: PointerSource::Mouse,
            }));
            board.update(BoardMessage::Pointer(PointerEvent::Move {
                client: Point::new(55.0, y),
                source: PointerSource::Mouse,
            }));
            board.update(BoardMessage::Pointer(PointerEvent::Up {
                source: PointerSource::Mouse,
            }));
        }
        board.update(BoardMessage::Undo);

        let mut fresh = PixmapSurface::new(CanvasSize::new(60, 60));
        replay(&mut fresh, board.history());

        let surface = board.surface().unwrap();
        assert_eq!(surface.to_rgba(), fresh.to_rgba());
        assert_eq!(surface.pixel(30, 45), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(30, 15), Some([0, 128, 0, 255]));
    }

    #[test]
    fn test_live_corner_matches_fresh_replay() {
        let mut board = Board::default();
        board.mount(PixmapSurface::new(CanvasSize::new(60, 60)));
        board.update(BoardMessage::SetLineWidth(10.0));
        board.update(BoardMessage::Pointer(PointerEvent::Down {
            client: Point::new(5.0, 30.0),
            source: PointerSource::Mouse,
        }));
        for (x, y) in [(30.0, 30.0), (30.0, 55.0)] {
            board.update(BoardMessage::Pointer(PointerEvent::Move {
                client: Point::new(x, y),
                source: PointerSource::Mouse,
            }));
        }
        let live = board.surface().unwrap();
        assert_eq!(live.pixel(33, 27), Some([0, 0, 0, 255]));
        let in_progress = live.to_rgba();

        board.update(BoardMessage::Pointer(PointerEvent::Up {
            source: PointerSource::Mouse,
        }));
        let mut fresh = PixmapSurface::new(CanvasSize::new(60, 60));
        replay(&mut fresh, board.history());

        assert_eq!(in_progress, fresh.to_rgba());
        assert_eq!(board.surface().unwrap().to_rgba(), fresh.to_rgba());
    }
}
