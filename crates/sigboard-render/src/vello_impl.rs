//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Stroke};
use peniko::{Color, Fill};
use sigboard_core::{CanvasSize, DrawSurface, StrokeColor};
use vello::wgpu;
use vello::{AaConfig, RenderParams, Scene};

/// Board surface that records strokes into a Vello scene.
///
/// The scene is in bitmap coordinates; [`VelloRenderer`] places it on the
/// page. Full clears reset the scene, partial clears paint the background.
pub struct SceneSurface {
    scene: Scene,
    size: CanvasSize,
    path: BezPath,
    color: Color,
    line_width: f64,
    background: Color,
}

impl Default for SceneSurface {
    fn default() -> Self {
        Self::new(CanvasSize::default())
    }
}

impl SceneSurface {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            scene: Scene::new(),
            size,
            path: BezPath::new(),
            color: Color::BLACK,
            line_width: 1.0,
            background: Color::WHITE,
        }
    }

    /// Color used to erase partial regions.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// The recorded scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

impl DrawSurface for SceneSurface {
    fn size(&self) -> CanvasSize {
        self.size
    }

    fn resize(&mut self, size: CanvasSize) {
        self.size = size;
        self.scene.reset();
        self.path = BezPath::new();
    }

    fn clear_rect(&mut self, rect: Rect) {
        let full = self.size.to_rect();
        if rect.intersect(full) == full {
            self.scene.reset();
        } else {
            self.scene
                .fill(Fill::NonZero, Affine::IDENTITY, self.background, None, &rect);
        }
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
        // Move-only paths leave no mark
        if self.path.segments().next().is_none() || self.line_width <= 0.0 {
            return;
        }
        let stroke = Stroke::new(self.line_width)
            .with_caps(Cap::Butt)
            .with_join(Join::Miter)
            .with_miter_limit(10.0);
        self.scene
            .stroke(&stroke, Affine::IDENTITY, self.color, None, &self.path);
    }

    fn set_stroke_color(&mut self, color: StrokeColor) {
        self.color = color.into();
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }
}

/// Vello-based renderer for the page around the board.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take the built scene, leaving an empty one.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Create the GPU renderer for `device`.
    pub fn create_gpu_renderer(device: &wgpu::Device) -> RenderResult<vello::Renderer> {
        vello::Renderer::new(device, vello::RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))
    }

    /// Render the built scene into `view` (must be `Rgba8Unorm` with storage binding).
    pub fn render_to_texture(
        &self,
        renderer: &mut vello::Renderer,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        size: CanvasSize,
        base_color: Color,
    ) -> RenderResult<()> {
        let params = RenderParams {
            base_color,
            width: size.width,
            height: size.height,
            antialiasing_method: AaConfig::Area,
        };
        renderer
            .render_to_texture(device, queue, &self.scene, view, &params)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))
    }
}

impl Renderer for VelloRenderer {
    type Layer = SceneSurface;

    fn build_scene(&mut self, ctx: &RenderContext, board: &SceneSurface) {
        self.scene.reset();

        let page = Affine::scale(ctx.scale_factor);
        let viewport = ctx.logical_viewport();
        self.scene
            .fill(Fill::NonZero, page, ctx.background_color, None, &viewport);

        let canvas = ctx.canvas_rect;
        let board_transform = page * Affine::translate(canvas.origin().to_vec2());
        self.scene.push_clip_layer(page, &canvas);
        self.scene.append(board.scene(), Some(board_transform));
        self.scene.pop_layer();

        if ctx.border_width > 0.0 {
            // Frame sits just outside the bitmap
            let half = ctx.border_width / 2.0;
            let frame = canvas.inflate(half, half);
            self.scene.stroke(
                &Stroke::new(ctx.border_width),
                page,
                ctx.border_color,
                None,
                &frame,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_surface_tracks_size() {
        let mut surface = SceneSurface::new(CanvasSize::new(100, 60));
        assert_eq!(surface.size(), CanvasSize::new(100, 60));
        surface.resize(CanvasSize::new(40, 20));
        assert_eq!(surface.size(), CanvasSize::new(40, 20));
    }

    #[test]
    fn test_scene_surface_accepts_commands() {
        let mut surface = SceneSurface::new(CanvasSize::new(100, 60));
        surface.set_stroke_color(StrokeColor::rgb(255, 0, 0));
        surface.set_line_width(4.0);
        surface.begin_path();
        surface.move_to(Point::new(1.0, 1.0));
        surface.line_to(Point::new(50.0, 30.0));
        surface.stroke();
        surface.clear_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        surface.clear();

        let mut renderer = VelloRenderer::new();
        let ctx = RenderContext::new(
            kurbo::Size::new(200.0, 200.0),
            Rect::new(10.0, 10.0, 110.0, 70.0),
        );
        renderer.build_scene(&ctx, &surface);
        let _scene = renderer.take_scene();
        assert!(renderer.scene().encoding().is_empty());
    }
}
