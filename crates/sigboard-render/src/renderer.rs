//! Renderer trait abstraction.

use kurbo::{Rect, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Page color behind the board.
    pub background_color: Color,
    /// Where the board bitmap sits, in logical pixels.
    pub canvas_rect: Rect,
    /// Color of the frame drawn around the board.
    pub border_color: Color,
    /// Frame width in logical pixels; zero disables it.
    pub border_width: f64,
}

impl RenderContext {
    /// Create a new render context.
    pub fn new(viewport_size: Size, canvas_rect: Rect) -> Self {
        Self {
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::WHITE,
            canvas_rect,
            border_color: Color::BLACK,
            border_width: 1.0,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the board frame.
    pub fn with_border(mut self, color: Color, width: f64) -> Self {
        self.border_color = color;
        self.border_width = width;
        self
    }

    /// Viewport in logical pixels.
    pub fn logical_viewport(&self) -> Rect {
        let scale = if self.scale_factor > 0.0 { self.scale_factor } else { 1.0 };
        Rect::new(
            0.0,
            0.0,
            self.viewport_size.width / scale,
            self.viewport_size.height / scale,
        )
    }
}

/// Trait for rendering backends.
///
/// A backend composes one frame from the board's drawing layer plus the page
/// chrome described by a [`RenderContext`].
pub trait Renderer {
    /// What the board draws into.
    type Layer;

    /// Build the scene/command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext, board: &Self::Layer);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
