//! Canvas sizing from the container's layout box.

use crate::surface::CanvasSize;
use kurbo::Size;

/// Bitmap size for a container: full width, `height_ratio` of the height.
///
/// Both sides are truncated to whole pixels; negative or NaN inputs give zero.
pub fn layout_canvas(container: Size, height_ratio: f64) -> CanvasSize {
    CanvasSize::new(
        to_pixels(container.width),
        to_pixels(container.height * height_ratio),
    )
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.trunc().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_canvas() {
        assert_eq!(
            layout_canvas(Size::new(1000.0, 800.0), 0.6),
            CanvasSize::new(1000, 480)
        );
    }

    #[test]
    fn test_layout_truncates() {
        assert_eq!(
            layout_canvas(Size::new(333.9, 101.0), 0.6),
            CanvasSize::new(333, 60)
        );
    }

    #[test]
    fn test_layout_degenerate() {
        assert_eq!(
            layout_canvas(Size::new(-5.0, f64::NAN), 0.6),
            CanvasSize::new(0, 0)
        );
    }
}
