//! Drawing surface abstraction.
//!
//! The board draws through the minimal immediate-mode capability set of a 2D
//! canvas context: clear a region, build a path, stroke it with the current
//! color and width. Backends live in `sigboard-render`; [`RecordingSurface`]
//! keeps a command log instead of pixels.

use crate::stroke::{StrokeColor, StrokeStyle};
use kurbo::{Point, Rect, Size};

/// Bitmap dimensions in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (nothing can be drawn).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The full bitmap as a rectangle at the origin.
    pub fn to_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    pub fn to_size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Immediate-mode 2D drawing target.
pub trait DrawSurface {
    /// Current bitmap size.
    fn size(&self) -> CanvasSize;

    /// Change the bitmap size. The bitmap is blank afterwards.
    fn resize(&mut self, size: CanvasSize);

    /// Make every pixel inside `rect` transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Discard the current path.
    fn begin_path(&mut self);

    /// Start a new subpath at `point`.
    fn move_to(&mut self, point: Point);

    /// Add a straight segment from the current point to `point`.
    fn line_to(&mut self, point: Point);

    /// Stroke the current path with the current color and line width.
    fn stroke(&mut self);

    fn set_stroke_color(&mut self, color: StrokeColor);

    fn set_line_width(&mut self, width: f64);

    /// Clear the whole bitmap.
    fn clear(&mut self) {
        let rect = self.size().to_rect();
        self.clear_rect(rect);
    }

    /// Set both color and width from a stroke style.
    fn apply_style(&mut self, style: &StrokeStyle) {
        self.set_stroke_color(style.color);
        self.set_line_width(style.line_width);
    }
}

impl<S: DrawSurface + ?Sized> DrawSurface for Box<S> {
    fn size(&self) -> CanvasSize {
        (**self).size()
    }

    fn resize(&mut self, size: CanvasSize) {
        (**self).resize(size)
    }

    fn clear_rect(&mut self, rect: Rect) {
        (**self).clear_rect(rect)
    }

    fn begin_path(&mut self) {
        (**self).begin_path()
    }

    fn move_to(&mut self, point: Point) {
        (**self).move_to(point)
    }

    fn line_to(&mut self, point: Point) {
        (**self).line_to(point)
    }

    fn stroke(&mut self) {
        (**self).stroke()
    }

    fn set_stroke_color(&mut self, color: StrokeColor) {
        (**self).set_stroke_color(color)
    }

    fn set_line_width(&mut self, width: f64) {
        (**self).set_line_width(width)
    }
}

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    Resize(CanvasSize),
    ClearRect(Rect),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    Stroke,
    SetStrokeColor(StrokeColor),
    SetLineWidth(f64),
}

/// A polyline that ended up on the bitmap, as reconstructed from the log.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleStroke {
    pub points: Vec<Point>,
    pub style: StrokeStyle,
}

/// Surface that records every call instead of rasterizing.
///
/// [`RecordingSurface::visible_strokes`] replays the log the way a canvas
/// would: full clears and resizes wipe everything, move-only subpaths leave
/// no mark.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: CanvasSize,
    commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Take the log, leaving it empty.
    pub fn take_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Polylines currently visible on the simulated bitmap, oldest first.
    pub fn visible_strokes(&self) -> Vec<VisibleStroke> {
        let full = self.size.to_rect();
        let mut visible: Vec<VisibleStroke> = Vec::new();
        let mut subpaths: Vec<Vec<Point>> = Vec::new();
        let mut style = StrokeStyle::default();

        for command in &self.commands {
            match command {
                SurfaceCommand::Resize(_) => visible.clear(),
                SurfaceCommand::ClearRect(rect) => {
                    if rect.intersect(full) == full {
                        visible.clear();
                    } else {
                        visible.retain(|s| s.points.iter().all(|p| !rect.contains(*p)));
                    }
                }
                SurfaceCommand::BeginPath => subpaths.clear(),
                SurfaceCommand::MoveTo(p) => subpaths.push(vec![*p]),
                SurfaceCommand::LineTo(p) => match subpaths.last_mut() {
                    Some(current) => current.push(*p),
                    // Canvas semantics: lineTo without a current point acts as moveTo
                    None => subpaths.push(vec![*p]),
                },
                SurfaceCommand::Stroke => {
                    for points in subpaths.iter().filter(|p| p.len() >= 2) {
                        visible.push(VisibleStroke {
                            points: points.clone(),
                            style,
                        });
                    }
                }
                SurfaceCommand::SetStrokeColor(color) => style.color = *color,
                SurfaceCommand::SetLineWidth(width) => style.line_width = *width,
            }
        }

        visible
    }

    /// True when nothing is visible on the simulated bitmap.
    pub fn is_blank(&self) -> bool {
        self.visible_strokes().is_empty()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> CanvasSize {
        self.size
    }

    fn resize(&mut self, size: CanvasSize) {
        self.size = size;
        self.commands.push(SurfaceCommand::Resize(size));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(SurfaceCommand::ClearRect(rect));
    }

    fn begin_path(&mut self) {
        self.commands.push(SurfaceCommand::BeginPath);
    }

    fn move_to(&mut self, point: Point) {
        self.commands.push(SurfaceCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.commands.push(SurfaceCommand::LineTo(point));
    }

    fn stroke(&mut self) {
        self.commands.push(SurfaceCommand::Stroke);
    }

    fn set_stroke_color(&mut self, color: StrokeColor) {
        self.commands.push(SurfaceCommand::SetStrokeColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(SurfaceCommand::SetLineWidth(width));
    }
}
