//! Board configuration.

use crate::stroke::{PaletteColor, StrokeStyle};
use crate::surface::CanvasSize;

/// Bitmap width used until the first resize.
pub const DEFAULT_CANVAS_WIDTH: u32 = 900;
/// Bitmap height used until the first resize.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 400;
/// Canvas height as a fraction of the container height.
pub const CANVAS_HEIGHT_RATIO: f64 = 0.6;
pub const MIN_LINE_WIDTH: f64 = 1.0;
pub const MAX_LINE_WIDTH: f64 = 10.0;
/// File name stem for exported images and documents.
pub const EXPORT_STEM: &str = "signature";

/// Tunables for a [`Board`](crate::Board).
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// Style in effect when the board is created.
    pub default_style: StrokeStyle,
    pub min_line_width: f64,
    pub max_line_width: f64,
    /// Swatches offered by the controls.
    pub palette: Vec<PaletteColor>,
    pub height_ratio: f64,
    /// Size of the bitmap before the first container resize.
    pub fallback_size: CanvasSize,
    pub export_stem: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_style: StrokeStyle::default(),
            min_line_width: MIN_LINE_WIDTH,
            max_line_width: MAX_LINE_WIDTH,
            palette: PaletteColor::ALL.to_vec(),
            height_ratio: CANVAS_HEIGHT_RATIO,
            fallback_size: CanvasSize::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            export_stem: EXPORT_STEM.to_string(),
        }
    }
}

impl BoardConfig {
    pub fn with_default_style(mut self, style: StrokeStyle) -> Self {
        self.default_style = style;
        self
    }

    pub fn with_line_width_range(mut self, min: f64, max: f64) -> Self {
        self.min_line_width = min.min(max);
        self.max_line_width = max.max(min);
        self
    }

    pub fn with_height_ratio(mut self, ratio: f64) -> Self {
        self.height_ratio = ratio;
        self
    }

    pub fn with_fallback_size(mut self, size: CanvasSize) -> Self {
        self.fallback_size = size;
        self
    }

    pub fn with_export_stem(mut self, stem: impl Into<String>) -> Self {
        self.export_stem = stem.into();
        self
    }

    /// Clamp a requested width into the allowed range. NaN maps to the minimum.
    pub fn clamp_line_width(&self, width: f64) -> f64 {
        if width.is_nan() {
            return self.min_line_width;
        }
        width.clamp(self.min_line_width, self.max_line_width)
    }

    /// Export file name for the given extension, e.g. `signature.png`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.export_stem, extension)
    }
}
