//! Stroke data model: colors, styles and committed strokes.

use kurbo::Point;
use peniko::Color;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("Unknown color name: {0}")]
    UnknownName(String),
    #[error("Malformed hex color: {0}")]
    MalformedHex(String),
}

/// The fixed swatch palette offered by the board controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteColor {
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    #[default]
    Black,
}

impl PaletteColor {
    /// All swatches, in the order the controls show them.
    pub const ALL: [PaletteColor; 6] = [
        PaletteColor::Red,
        PaletteColor::Blue,
        PaletteColor::Green,
        PaletteColor::Yellow,
        PaletteColor::Orange,
        PaletteColor::Black,
    ];

    /// Lowercase CSS name of this swatch.
    pub fn name(self) -> &'static str {
        match self {
            PaletteColor::Red => "red",
            PaletteColor::Blue => "blue",
            PaletteColor::Green => "green",
            PaletteColor::Yellow => "yellow",
            PaletteColor::Orange => "orange",
            PaletteColor::Black => "black",
        }
    }

    /// Look up a swatch by its CSS name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    /// The ink color strokes are drawn with (CSS named-color values).
    pub const fn color(self) -> StrokeColor {
        match self {
            PaletteColor::Red => StrokeColor::rgb(255, 0, 0),
            PaletteColor::Blue => StrokeColor::rgb(0, 0, 255),
            PaletteColor::Green => StrokeColor::rgb(0, 128, 0),
            PaletteColor::Yellow => StrokeColor::rgb(255, 255, 0),
            PaletteColor::Orange => StrokeColor::rgb(255, 165, 0),
            PaletteColor::Black => StrokeColor::BLACK,
        }
    }
}

/// Stroke color as straight (non-premultiplied) RGBA8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrokeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl StrokeColor {
    pub const BLACK: StrokeColor = StrokeColor::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// The palette swatch with exactly this value, if any.
    pub fn palette(&self) -> Option<PaletteColor> {
        PaletteColor::ALL.into_iter().find(|c| c.color() == *self)
    }

    fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let malformed = || ColorParseError::MalformedHex(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(malformed)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }

        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| malformed());
        let nibble = |i: usize| {
            u8::from_str_radix(&digits[i..i + 1], 16)
                .map(|n| n * 17)
                .map_err(|_| malformed())
        };

        match digits.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(malformed()),
        }
    }
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<PaletteColor> for StrokeColor {
    fn from(color: PaletteColor) -> Self {
        color.color()
    }
}

impl From<StrokeColor> for Color {
    fn from(color: StrokeColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl FromStr for StrokeColor {
    type Err = ColorParseError;

    /// Accepts a palette name or `#rgb`, `#rrggbb`, `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            return Self::parse_hex(s);
        }
        PaletteColor::from_name(s)
            .map(PaletteColor::color)
            .ok_or_else(|| ColorParseError::UnknownName(s.to_string()))
    }
}

impl fmt::Display for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(named) = self.palette() {
            return f.write_str(named.name());
        }
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Color and width of one stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: StrokeColor,
    /// Line width in canvas pixels.
    pub line_width: f64,
}

impl StrokeStyle {
    pub fn new(color: impl Into<StrokeColor>, line_width: f64) -> Self {
        Self {
            color: color.into(),
            line_width,
        }
    }

    pub fn with_color(mut self, color: impl Into<StrokeColor>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(StrokeColor::BLACK, 3.0)
    }
}

/// One committed freehand stroke. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    path: Vec<Point>,
    style: StrokeStyle,
}

impl Stroke {
    /// Build a stroke, or `None` when `path` has no points.
    pub fn new(path: Vec<Point>, style: StrokeStyle) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(Self { path, style })
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Where the stroke starts.
    pub fn first_point(&self) -> Point {
        self.path[0]
    }

    /// Number of points in the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_rejects_empty_path() {
        assert!(Stroke::new(Vec::new(), StrokeStyle::default()).is_none());

        let stroke = Stroke::new(vec![Point::new(1.0, 2.0)], StrokeStyle::default()).unwrap();
        assert_eq!(stroke.len(), 1);
        assert_eq!(stroke.first_point(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_default_style() {
        let style = StrokeStyle::default();
        assert_eq!(style.color, StrokeColor::BLACK);
        assert_eq!(style.color.to_string(), "black");
        assert!((style.line_width - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_palette_names() {
        for swatch in PaletteColor::ALL {
            let parsed: StrokeColor = swatch.name().parse().unwrap();
            assert_eq!(parsed, swatch.color());
            assert_eq!(parsed.palette(), Some(swatch));
        }
        let shouted: StrokeColor = " RED ".parse().unwrap();
        assert_eq!(shouted, PaletteColor::Red.color());
    }

    #[test]
    fn test_parse_hex() {
        let short: StrokeColor = "#f00".parse().unwrap();
        assert_eq!(short, StrokeColor::rgb(255, 0, 0));

        let long: StrokeColor = "#1a2B3c".parse().unwrap();
        assert_eq!(long, StrokeColor::rgb(0x1a, 0x2b, 0x3c));

        let alpha: StrokeColor = "#10203080".parse().unwrap();
        assert_eq!(alpha.a, 0x80);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "purple".parse::<StrokeColor>(),
            Err(ColorParseError::UnknownName(_))
        ));
        assert!(matches!(
            "#12345".parse::<StrokeColor>(),
            Err(ColorParseError::MalformedHex(_))
        ));
        assert!(matches!(
            "#gggggg".parse::<StrokeColor>(),
            Err(ColorParseError::MalformedHex(_))
        ));
    }

    #[test]
    fn test_display_falls_back_to_hex() {
        assert_eq!(StrokeColor::rgb(0x12, 0x34, 0x56).to_string(), "#123456");
        assert_eq!(StrokeColor::new(1, 2, 3, 4).to_string(), "#01020304");
        assert_eq!(PaletteColor::Orange.color().to_string(), "orange");
    }
}
